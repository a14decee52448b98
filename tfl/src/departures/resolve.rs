//! Departure resolution: station lookup, source selection and filtering.

use std::fmt;

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::domain::{Arrival, Station};
use crate::stations::select_best_match;
use crate::tfl::TflError;

use super::config::DeparturesConfig;
use super::filter;
use super::provider::TransitApi;
use super::timetable::TimetableReconstructor;

/// Error from departure resolution.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The station search returned nothing
    #[error("no stations found matching '{0}'")]
    NoStations(String),

    /// A required API call failed
    #[error(transparent)]
    Transport(#[from] TflError),
}

/// Request for a departure board.
#[derive(Debug, Clone, Default)]
pub struct ResolutionRequest {
    /// Free-text station name.
    pub station_query: String,

    /// Restrict to one line (id or name).
    pub line_filter: Option<String>,

    /// Words that must all appear in line, destination or platform.
    pub match_filter: Option<String>,

    /// Earliest departure of interest. `None` means now.
    pub target_time: Option<DateTime<Local>>,

    /// Maximum number of departures; zero means no limit.
    pub limit: Option<usize>,
}

impl ResolutionRequest {
    pub fn new(station_query: impl Into<String>) -> Self {
        Self {
            station_query: station_query.into(),
            ..Self::default()
        }
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.line_filter = non_blank(line.into());
        self
    }

    pub fn with_match(mut self, filter: impl Into<String>) -> Self {
        self.match_filter = non_blank(filter.into());
        self
    }

    pub fn with_target_time(mut self, target: DateTime<Local>) -> Self {
        self.target_time = Some(target);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Where the departures on a board came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalSource {
    /// Live predictions.
    Live,

    /// Reconstructed from static timetables.
    Timetable,

    /// Timetable reconstruction found nothing; live predictions instead.
    LiveFallback,
}

impl ArrivalSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArrivalSource::Live => "live",
            ArrivalSource::Timetable => "timetable",
            ArrivalSource::LiveFallback => "live-fallback",
        }
    }
}

impl fmt::Display for ArrivalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-fatal notice attached to a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// A later time was requested but no timetable covered it.
    TimetableUnavailable,
}

impl Advisory {
    pub fn message(&self) -> &'static str {
        match self {
            Advisory::TimetableUnavailable => {
                "Timetable unavailable for this line. Real-time data only covers ~30 minutes ahead."
            }
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A resolved departure board.
#[derive(Debug, Clone)]
pub struct DepartureBoard {
    pub station: Station,

    /// Filtered departures, ordered by expected departure.
    pub arrivals: Vec<Arrival>,

    pub source: ArrivalSource,

    pub advisory: Option<Advisory>,
}

/// Arrivals chosen for a stop before match filtering and limiting.
#[derive(Debug, Clone)]
pub struct SelectedArrivals {
    pub arrivals: Vec<Arrival>,
    pub source: ArrivalSource,
    pub advisory: Option<Advisory>,
}

/// Which data source a request should start from.
///
/// Live predictions are used when no target is given or the target is
/// within the live horizon; anything later starts from the timetable.
pub fn choose_source(
    target: Option<DateTime<Local>>,
    now: DateTime<Local>,
    config: &DeparturesConfig,
) -> ArrivalSource {
    match target {
        Some(t) if t - now > config.live_horizon() => ArrivalSource::Timetable,
        _ => ArrivalSource::Live,
    }
}

/// Resolves departure boards against a transit API.
pub struct DepartureResolver<'a, A> {
    api: &'a A,
    config: &'a DeparturesConfig,
}

impl<'a, A: TransitApi> DepartureResolver<'a, A> {
    pub fn new(api: &'a A, config: &'a DeparturesConfig) -> Self {
        Self { api, config }
    }

    /// Resolve a full departure board.
    pub async fn resolve(
        &self,
        request: &ResolutionRequest,
        now: DateTime<Local>,
    ) -> Result<DepartureBoard, ResolveError> {
        let station = self.find_station(&request.station_query).await?;

        let selected = self
            .select_arrivals(
                &station.id,
                request.line_filter.as_deref(),
                request.target_time,
                now,
            )
            .await?;

        let arrivals = filter::apply(
            selected.arrivals,
            request.match_filter.as_deref(),
            None,
            request.limit,
        );

        info!(
            station = %station,
            source = %selected.source,
            departures = arrivals.len(),
            "resolved departure board"
        );

        Ok(DepartureBoard {
            station,
            arrivals,
            source: selected.source,
            advisory: selected.advisory,
        })
    }

    /// Best station for a free-text query.
    pub async fn find_station(&self, query: &str) -> Result<Station, ResolveError> {
        let candidates = self.api.search_stations(query).await?;

        let station = select_best_match(&candidates, query)
            .cloned()
            .ok_or_else(|| ResolveError::NoStations(query.to_string()))?;

        debug!(
            query,
            candidates = candidates.len(),
            station = %station,
            "selected station"
        );
        Ok(station)
    }

    /// Departures at a stop from the appropriate source, ordered and cut
    /// at `target` when one is given.
    pub async fn select_arrivals(
        &self,
        stop_id: &str,
        line: Option<&str>,
        target: Option<DateTime<Local>>,
        now: DateTime<Local>,
    ) -> Result<SelectedArrivals, TflError> {
        if let (ArrivalSource::Timetable, Some(min_time)) =
            (choose_source(target, now, self.config), target)
        {
            let reconstruction = TimetableReconstructor::new(self.api, self.config)
                .reconstruct(stop_id, line, min_time, now)
                .await?;

            if !reconstruction.arrivals.is_empty() {
                return Ok(SelectedArrivals {
                    arrivals: reconstruction.arrivals,
                    source: ArrivalSource::Timetable,
                    advisory: None,
                });
            }

            debug!(stop = %stop_id, "no timetabled departures, falling back to live");
            // The filter may be a partial name, so fetch every line and keep
            // the ones it matched at this stop.
            let mut arrivals = self.live(stop_id, None, target).await?;
            if line.is_some() {
                let lines = &reconstruction.lines;
                arrivals.retain(|a| {
                    lines
                        .iter()
                        .any(|l| l.line_id.eq_ignore_ascii_case(&a.line_id))
                });
            }
            return Ok(SelectedArrivals {
                arrivals,
                source: ArrivalSource::LiveFallback,
                advisory: Some(Advisory::TimetableUnavailable),
            });
        }

        let arrivals = self.live(stop_id, line, target).await?;
        Ok(SelectedArrivals {
            arrivals,
            source: ArrivalSource::Live,
            advisory: None,
        })
    }

    /// Live predictions, exact-line filtered for a line-scoped fetch and cut
    /// at `target`.
    async fn live(
        &self,
        stop_id: &str,
        line: Option<&str>,
        target: Option<DateTime<Local>>,
    ) -> Result<Vec<Arrival>, TflError> {
        let mut arrivals = self.api.live_arrivals(stop_id, line).await?;
        debug!(stop = %stop_id, line, predictions = arrivals.len(), "fetched live arrivals");

        if let Some(line) = line {
            arrivals = filter::filter_by_line(arrivals, line);
        }
        if let Some(min_time) = target {
            arrivals = filter::filter_by_time(arrivals, min_time);
        }

        filter::sort_by_departure(&mut arrivals);
        Ok(arrivals)
    }
}
