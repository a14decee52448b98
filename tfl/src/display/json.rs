//! JSON output for scripting.

use std::io::{self, Write};

use serde::Serialize;

use crate::domain::{Arrival, Disruption, LineStatus, Station};

/// A departure in JSON output.
#[derive(Debug, Serialize)]
pub struct ArrivalJson {
    /// Line display name
    pub line: String,

    pub line_id: String,

    pub destination: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    pub time_to_station_seconds: i64,

    pub minutes_away: i64,

    /// Local departure time as HH:MM
    pub expected_arrival: String,
}

#[derive(Debug, Serialize)]
pub struct DeparturesOutput {
    pub station: String,
    pub arrivals: Vec<ArrivalJson>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct StationJson {
    pub id: String,
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,

    pub modes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StationsOutput {
    pub stations: Vec<StationJson>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct LineStatusJson {
    pub line: String,
    pub line_id: String,
    pub status: String,
    pub severity: i32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub lines: Vec<LineStatusJson>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct DisruptionJson {
    /// Human-readable category
    pub category: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct DisruptionsOutput {
    pub disruptions: Vec<DisruptionJson>,
    pub count: usize,
}

/// Result of an API key check.
#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Conversion implementations
// ============================================================================

impl ArrivalJson {
    pub fn from_arrival(arrival: &Arrival) -> Self {
        Self {
            line: arrival.line_name.clone(),
            line_id: arrival.line_id.clone(),
            destination: arrival.destination_name.clone(),
            platform: arrival.platform_name.clone(),
            time_to_station_seconds: arrival.time_to_station_secs,
            minutes_away: arrival.minutes_away(),
            expected_arrival: arrival.expected_arrival.format("%H:%M").to_string(),
        }
    }
}

impl DeparturesOutput {
    pub fn new(station: &str, arrivals: &[Arrival]) -> Self {
        Self {
            station: station.to_string(),
            arrivals: arrivals.iter().map(ArrivalJson::from_arrival).collect(),
            count: arrivals.len(),
        }
    }
}

impl StationsOutput {
    pub fn new(stations: &[Station]) -> Self {
        Self {
            stations: stations
                .iter()
                .map(|s| StationJson {
                    id: s.id.clone(),
                    name: s.name.clone(),
                    zone: s.zone.clone(),
                    modes: s.modes.iter().cloned().collect(),
                })
                .collect(),
            count: stations.len(),
        }
    }
}

impl StatusOutput {
    /// Lines without a reported status are left out.
    pub fn new(lines: &[LineStatus]) -> Self {
        let lines: Vec<LineStatusJson> = lines
            .iter()
            .filter_map(|line| {
                line.current().map(|status| LineStatusJson {
                    line: line.name.clone(),
                    line_id: line.id.clone(),
                    status: status.description.clone(),
                    severity: status.severity,
                    reason: status.reason.clone(),
                })
            })
            .collect();

        Self {
            count: lines.len(),
            lines,
        }
    }
}

impl DisruptionsOutput {
    pub fn new(disruptions: &[Disruption]) -> Self {
        Self {
            disruptions: disruptions
                .iter()
                .map(|d| DisruptionJson {
                    category: d.category_description.clone(),
                    description: d.description.clone(),
                })
                .collect(),
            count: disruptions.len(),
        }
    }
}

impl CheckResult {
    pub fn valid() -> Self {
        Self {
            valid: true,
            message: "API key is valid".to_string(),
            error: None,
        }
    }

    pub fn missing_key() -> Self {
        Self {
            valid: false,
            message: "No API key configured".to_string(),
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            valid: false,
            message: "API key validation failed".to_string(),
            error: Some(error.to_string()),
        }
    }
}

/// Pretty-print `value` followed by a newline.
pub fn write_json<T: Serialize>(out: &mut impl Write, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}
