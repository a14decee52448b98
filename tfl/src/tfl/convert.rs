//! Conversion from TfL DTOs to domain types.
//!
//! Malformed entries inside an otherwise valid response (a prediction with
//! an unreadable timestamp, a journey with a non-numeric hour) are logged
//! and skipped rather than failing the whole response.

use chrono::{DateTime, Local, NaiveDateTime};
use tracing::warn;

use crate::domain::{
    Arrival, ChildStop, Disruption, KnownJourney, LineRef, LineStatus, Route, Schedule, Station,
    StationInterval, StatusEntry, StopDetails, TimetableDocument, TimetableStation,
};

use super::types::{
    DisruptionDto, Identifier, KnownJourneyDto, LineStatusDto, Prediction, SearchResponse,
    StationIntervalDto, StopPointDto, TimetableResponse, TimetableRouteDto,
};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Failed to parse a timestamp
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Failed to parse a number sent as a string
    #[error("invalid number in {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Convert a stop point search response to candidate stations, keeping the
/// API's relevance order.
pub fn convert_search(response: &SearchResponse) -> Vec<Station> {
    response
        .matches
        .iter()
        .map(|m| Station {
            id: m.id.clone(),
            name: m.name.clone(),
            zone: m.zone.clone().filter(|z| !z.is_empty()),
            modes: m.modes.iter().cloned().collect(),
        })
        .collect()
}

/// Convert live predictions, skipping any that cannot be read.
pub fn convert_predictions(predictions: &[Prediction]) -> Vec<Arrival> {
    predictions
        .iter()
        .filter_map(|p| match convert_prediction(p) {
            Ok(arrival) => Some(arrival),
            Err(e) => {
                warn!(line = %p.line_id, error = %e, "skipping prediction");
                None
            }
        })
        .collect()
}

/// Convert a single live prediction.
pub fn convert_prediction(p: &Prediction) -> Result<Arrival, ConversionError> {
    let expected_arrival = parse_timestamp(&p.expected_arrival)?;

    let destination_name = non_empty(p.destination_name.as_deref())
        .or_else(|| non_empty(p.towards.as_deref()))
        .unwrap_or("Unknown")
        .to_string();

    Ok(Arrival {
        line_id: p.line_id.clone(),
        line_name: p.line_name.clone(),
        destination_name,
        platform_name: non_empty(p.platform_name.as_deref())
            .filter(|name| *name != "null")
            .map(String::from),
        expected_arrival,
        time_to_station_secs: p.time_to_station,
    })
}

/// Parse an API timestamp into local time.
///
/// The API normally sends RFC 3339 with a `Z` suffix but occasionally drops
/// the offset; those are taken as UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Local>, ConversionError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Local));
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc().with_timezone(&Local))
        .map_err(|_| ConversionError::InvalidTimestamp(s.to_string()))
}

/// Convert a stop point detail response.
pub fn convert_stop_point(dto: &StopPointDto) -> Result<StopDetails, ConversionError> {
    let id = stop_point_id(dto).ok_or(ConversionError::MissingField("id"))?;

    let children = dto
        .children
        .iter()
        .filter_map(|child| {
            let Some(child_id) = stop_point_id(child) else {
                warn!(parent = %id, "skipping child stop without an id");
                return None;
            };
            Some(ChildStop {
                id: child_id.to_string(),
                name: child.common_name.clone(),
                lines: convert_lines(&child.lines),
            })
        })
        .collect();

    Ok(StopDetails {
        id: id.to_string(),
        name: dto.common_name.clone(),
        lines: convert_lines(&dto.lines),
        children,
    })
}

fn stop_point_id(dto: &StopPointDto) -> Option<&str> {
    non_empty(dto.id.as_deref()).or_else(|| non_empty(dto.naptan_id.as_deref()))
}

fn convert_lines(lines: &[Identifier]) -> Vec<LineRef> {
    lines
        .iter()
        .map(|line| LineRef::new(line.id.clone(), line.name.clone()))
        .collect()
}

/// Convert a timetable response.
///
/// Returns `None` when the response carries no timetable at all, which is
/// how the API answers for lines without a published schedule.
pub fn convert_timetable(response: &TimetableResponse) -> Option<TimetableDocument> {
    let timetable = response.timetable.as_ref()?;

    let stations = response
        .stations
        .iter()
        .map(|s| TimetableStation {
            id: s.id.clone(),
            name: s.name.clone(),
        })
        .collect();

    let routes = timetable
        .routes
        .iter()
        .map(|route| convert_route(route, &response.line_id))
        .collect();

    Some(TimetableDocument {
        line_id: response.line_id.clone(),
        line_name: response.line_name.clone(),
        direction: response.direction.clone(),
        stations,
        routes,
    })
}

fn convert_route(route: &TimetableRouteDto, line_id: &str) -> Route {
    let station_intervals = route
        .station_intervals
        .iter()
        .filter_map(|si| match convert_station_interval(si) {
            Ok(interval) => Some(interval),
            Err(e) => {
                warn!(line = %line_id, error = %e, "skipping station interval");
                None
            }
        })
        .collect();

    let schedules = route
        .schedules
        .iter()
        .map(|schedule| Schedule {
            name: schedule.name.clone(),
            known_journeys: schedule
                .known_journeys
                .iter()
                .filter_map(|journey| match convert_known_journey(journey) {
                    Ok(journey) => Some(journey),
                    Err(e) => {
                        warn!(
                            line = %line_id,
                            schedule = %schedule.name,
                            error = %e,
                            "skipping known journey"
                        );
                        None
                    }
                })
                .collect(),
        })
        .collect();

    Route {
        station_intervals,
        schedules,
    }
}

fn convert_station_interval(si: &StationIntervalDto) -> Result<StationInterval, ConversionError> {
    Ok(StationInterval {
        id: parse_number("stationIntervals.id", &si.id)?,
        stop_ids: si.intervals.iter().map(|i| i.stop_id.clone()).collect(),
    })
}

/// Timetables run past midnight into the next service day, never further.
const MAX_JOURNEY_HOUR: u32 = 48;

fn convert_known_journey(journey: &KnownJourneyDto) -> Result<KnownJourney, ConversionError> {
    let hour: u32 = parse_number("knownJourneys.hour", &journey.hour)?;
    let minute: u32 = parse_number("knownJourneys.minute", &journey.minute)?;

    if hour >= MAX_JOURNEY_HOUR {
        return Err(ConversionError::InvalidNumber {
            field: "knownJourneys.hour",
            value: journey.hour.clone(),
        });
    }
    if minute > 59 {
        return Err(ConversionError::InvalidNumber {
            field: "knownJourneys.minute",
            value: journey.minute.clone(),
        });
    }

    Ok(KnownJourney {
        hour,
        minute,
        interval_id: journey.interval_id,
    })
}

fn parse_number<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
) -> Result<T, ConversionError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConversionError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

/// Convert line status reports.
pub fn convert_line_statuses(dtos: &[LineStatusDto]) -> Vec<LineStatus> {
    dtos.iter()
        .map(|dto| LineStatus {
            id: dto.id.clone(),
            name: dto.name.clone(),
            statuses: dto
                .line_statuses
                .iter()
                .map(|s| StatusEntry {
                    severity: s.status_severity,
                    description: s.status_severity_description.clone(),
                    reason: s.reason.clone().filter(|r| !r.trim().is_empty()),
                })
                .collect(),
        })
        .collect()
}

/// Convert disruption notices.
pub fn convert_disruptions(dtos: &[DisruptionDto]) -> Vec<Disruption> {
    dtos.iter()
        .map(|dto| Disruption {
            category: dto.category.clone(),
            category_description: dto.category_description.clone(),
            description: dto.description.clone(),
        })
        .collect()
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
