//! TfL unified API HTTP client.
//!
//! Provides async methods for the handful of endpoints the CLI uses.
//! Handles authentication, bounded concurrency, error mapping and
//! conversion to domain types.

use std::sync::Arc;

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::departures::TransitApi;
use crate::domain::{
    Arrival, Direction, Disruption, LineStatus, Station, StopDetails, TimetableDocument,
};

use super::convert::{
    convert_disruptions, convert_line_statuses, convert_predictions, convert_search,
    convert_stop_point, convert_timetable,
};
use super::error::TflError;
use super::types::{
    DisruptionDto, LineStatusDto, Prediction, SearchResponse, StopPointDto, TimetableResponse,
};

/// Default base URL for the TfL unified API.
pub const DEFAULT_BASE_URL: &str = "https://api.tfl.gov.uk";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Modes searched for stations.
const SEARCH_MODES: &str = "tube,elizabeth-line,dlr,overground,national-rail";

/// Modes whose line statuses are reported.
const STATUS_MODES: &str = "tube,elizabeth-line,dlr,overground";

/// Modes whose disruptions are reported.
const DISRUPTION_MODES: &str = "tube";

/// Configuration for the TfL client.
#[derive(Debug, Clone)]
pub struct TflConfig {
    /// Application key. The API works without one, at a lower rate limit.
    pub app_key: Option<String>,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TflConfig {
    /// Create a new config, treating a blank key as no key.
    pub fn new(app_key: Option<String>) -> Self {
        Self {
            app_key: app_key.filter(|k| !k.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// TfL unified API client.
///
/// Uses a semaphore to limit concurrent requests; timetable lookups for a
/// busy interchange fan out to a dozen or more calls.
#[derive(Debug, Clone)]
pub struct TflClient {
    http: reqwest::Client,
    base_url: Url,
    app_key: Option<String>,
    semaphore: Arc<Semaphore>,
}

impl TflClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TflConfig) -> Result<Self, TflError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| TflError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(TflError::InvalidUrl(config.base_url));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("tfl-cli/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            app_key: config.app_key,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Whether an application key is configured.
    pub fn has_key(&self) -> bool {
        self.app_key.is_some()
    }

    /// Search for stations by name.
    pub async fn search_stop_points(&self, query: &str) -> Result<Vec<Station>, TflError> {
        let response: SearchResponse = self
            .get_json(&["StopPoint", "Search", query], &[("modes", SEARCH_MODES)])
            .await?;
        Ok(convert_search(&response))
    }

    /// Live predictions for every line at a stop.
    pub async fn arrivals_at_stop(&self, stop_id: &str) -> Result<Vec<Arrival>, TflError> {
        let predictions: Vec<Prediction> = self
            .get_json(&["StopPoint", stop_id, "Arrivals"], &[])
            .await?;
        Ok(convert_predictions(&predictions))
    }

    /// Live predictions for one line at a stop.
    pub async fn line_arrivals(
        &self,
        line_id: &str,
        stop_id: &str,
    ) -> Result<Vec<Arrival>, TflError> {
        let predictions: Vec<Prediction> = self
            .get_json(&["Line", line_id, "Arrivals", stop_id], &[])
            .await?;
        Ok(convert_predictions(&predictions))
    }

    /// Stop point details: served lines and child stops.
    pub async fn stop_point(&self, stop_id: &str) -> Result<StopDetails, TflError> {
        let dto: StopPointDto = self.get_json(&["StopPoint", stop_id], &[]).await?;
        convert_stop_point(&dto).map_err(|e| TflError::Json {
            message: e.to_string(),
            body: None,
        })
    }

    /// Static timetable for one line and direction from a stop.
    ///
    /// Lines without a published timetable answer 404 or return no
    /// timetable section; both come back as `Ok(None)`.
    pub async fn line_timetable(
        &self,
        line_id: &str,
        stop_id: &str,
        direction: Direction,
    ) -> Result<Option<TimetableDocument>, TflError> {
        let result: Result<TimetableResponse, TflError> = self
            .get_json(
                &["Line", line_id, "Timetable", stop_id],
                &[("direction", direction.as_str())],
            )
            .await;

        match result {
            Ok(response) => Ok(convert_timetable(&response)),
            Err(TflError::NotFound(path)) => {
                debug!(%path, "no published timetable");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Current status of tube, Elizabeth line, DLR and Overground lines.
    pub async fn line_statuses(&self) -> Result<Vec<LineStatus>, TflError> {
        let dtos: Vec<LineStatusDto> = self
            .get_json(&["Line", "Mode", STATUS_MODES, "Status"], &[])
            .await?;
        Ok(convert_line_statuses(&dtos))
    }

    /// Current disruptions on the tube network.
    pub async fn disruptions(&self) -> Result<Vec<Disruption>, TflError> {
        let dtos: Vec<DisruptionDto> = self
            .get_json(&["Line", "Mode", DISRUPTION_MODES, "Disruption"], &[])
            .await?;
        Ok(convert_disruptions(&dtos))
    }

    /// Check that the configured key is accepted by the API.
    pub async fn validate_key(&self) -> Result<(), TflError> {
        let _modes: serde_json::Value = self.get_json(&["Line", "Meta", "Modes"], &[]).await?;
        Ok(())
    }

    /// Build the URL for a path given as raw segments; each segment is
    /// percent-encoded.
    fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, TflError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TflError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);

        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            if let Some(key) = &self.app_key {
                pairs.append_pair("app_key", key);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }

        Ok(url)
    }

    /// GET a path and deserialize the JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, TflError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| TflError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = self.url(segments, query)?;
        let path = url.path().to_string();
        debug!(%path, "GET");

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TflError::Unauthorized);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TflError::RateLimited);
        }

        if status == StatusCode::NOT_FOUND {
            return Err(TflError::NotFound(path));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TflError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| TflError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

impl TransitApi for TflClient {
    async fn search_stations(&self, query: &str) -> Result<Vec<Station>, TflError> {
        self.search_stop_points(query).await
    }

    async fn live_arrivals(
        &self,
        stop_id: &str,
        line_id: Option<&str>,
    ) -> Result<Vec<Arrival>, TflError> {
        match line_id {
            Some(line_id) => self.line_arrivals(line_id, stop_id).await,
            None => self.arrivals_at_stop(stop_id).await,
        }
    }

    async fn stop_details(&self, stop_id: &str) -> Result<StopDetails, TflError> {
        self.stop_point(stop_id).await
    }

    async fn timetable(
        &self,
        line_id: &str,
        stop_id: &str,
        direction: Direction,
    ) -> Result<Option<TimetableDocument>, TflError> {
        self.line_timetable(line_id, stop_id, direction).await
    }
}
