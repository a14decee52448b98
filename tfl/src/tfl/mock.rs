//! Mock TfL client for use without API access.
//!
//! Loads captured API responses from a directory and serves them as if
//! they were live. The layout mirrors the endpoints:
//!
//! ```text
//! search.json                               stop point search (any query)
//! arrivals/{stopId}.json                    live predictions at a stop
//! stoppoints/{stopId}.json                  stop point details
//! timetables/{lineId}_{stopId}_{dir}.json   timetable, dir = inbound|outbound
//! status.json                               line statuses (optional)
//! disruptions.json                          disruptions (optional)
//! ```
//!
//! Captured predictions go stale immediately, so their expected arrival is
//! recomputed from `timeToStation` at the moment they are served.

use std::collections::HashMap;
use std::path::Path;

use chrono::{Duration, Local};
use serde::de::DeserializeOwned;

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

/// Mock TfL client that serves data from JSON files.
#[derive(Debug, Clone)]
pub struct MockTflClient {
    search: SearchResponse,
    arrivals: HashMap<String, Vec<Prediction>>,
    stop_points: HashMap<String, StopPointDto>,
    /// Keyed by `{lineId}_{stopId}_{direction}`.
    timetables: HashMap<String, TimetableResponse>,
    statuses: Vec<LineStatusDto>,
    disruptions: Vec<DisruptionDto>,
}

impl MockTflClient {
    /// Load mock data from a directory.
    ///
    /// `search.json` is required; everything else is optional.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, TflError> {
        let data_dir = data_dir.as_ref();

        let search: SearchResponse = read_json(&data_dir.join("search.json"))?;
        let arrivals = read_dir_json(&data_dir.join("arrivals"))?;
        let stop_points = read_dir_json(&data_dir.join("stoppoints"))?;
        let timetables = read_dir_json(&data_dir.join("timetables"))?;

        let statuses = read_optional_json(&data_dir.join("status.json"))?.unwrap_or_default();
        let disruptions =
            read_optional_json(&data_dir.join("disruptions.json"))?.unwrap_or_default();

        Ok(Self {
            search,
            arrivals,
            stop_points,
            timetables,
            statuses,
            disruptions,
        })
    }

    /// Mock data has no key to check.
    pub fn has_key(&self) -> bool {
        true
    }

    pub async fn validate_key(&self) -> Result<(), TflError> {
        Ok(())
    }

    pub async fn line_statuses(&self) -> Result<Vec<LineStatus>, TflError> {
        Ok(convert_line_statuses(&self.statuses))
    }

    pub async fn disruptions(&self) -> Result<Vec<Disruption>, TflError> {
        Ok(convert_disruptions(&self.disruptions))
    }
}

impl TransitApi for MockTflClient {
    async fn search_stations(&self, _query: &str) -> Result<Vec<Station>, TflError> {
        Ok(convert_search(&self.search))
    }

    async fn live_arrivals(
        &self,
        stop_id: &str,
        line_id: Option<&str>,
    ) -> Result<Vec<Arrival>, TflError> {
        let predictions = self
            .arrivals
            .get(stop_id)
            .ok_or_else(|| TflError::NotFound(format!("no mock arrivals for {stop_id}")))?;

        let now = Local::now();
        let arrivals = convert_predictions(predictions)
            .into_iter()
            .filter(|a| line_id.is_none_or(|line| a.line_id.eq_ignore_ascii_case(line)))
            .map(|mut a| {
                a.expected_arrival = now + Duration::seconds(a.time_to_station_secs);
                a
            })
            .collect();

        Ok(arrivals)
    }

    async fn stop_details(&self, stop_id: &str) -> Result<StopDetails, TflError> {
        let dto = self
            .stop_points
            .get(stop_id)
            .ok_or_else(|| TflError::NotFound(format!("no mock stop point {stop_id}")))?;

        convert_stop_point(dto).map_err(|e| TflError::MockData(e.to_string()))
    }

    async fn timetable(
        &self,
        line_id: &str,
        stop_id: &str,
        direction: Direction,
    ) -> Result<Option<TimetableDocument>, TflError> {
        let key = format!("{line_id}_{stop_id}_{direction}");
        Ok(self.timetables.get(&key).and_then(convert_timetable))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, TflError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| TflError::MockData(format!("failed to read {}: {e}", path.display())))?;

    serde_json::from_str(&json)
        .map_err(|e| TflError::MockData(format!("failed to parse {}: {e}", path.display())))
}

fn read_optional_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, TflError> {
    if path.is_file() {
        read_json(path).map(Some)
    } else {
        Ok(None)
    }
}

/// Read every `.json` file in a directory, keyed by file stem. A missing
/// directory yields an empty map.
fn read_dir_json<T: DeserializeOwned>(dir: &Path) -> Result<HashMap<String, T>, TflError> {
    let mut items = HashMap::new();

    if !dir.is_dir() {
        return Ok(items);
    }

    let entries = std::fs::read_dir(dir)
        .map_err(|e| TflError::MockData(format!("failed to read {}: {e}", dir.display())))?;

    for entry in entries {
        let entry = entry
            .map_err(|e| TflError::MockData(format!("failed to read directory entry: {e}")))?;

        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| TflError::MockData(format!("invalid filename: {}", path.display())))?;

        items.insert(stem.to_string(), read_json(&path)?);
    }

    Ok(items)
}
