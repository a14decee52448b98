//! TfL unified API response DTOs.
//!
//! These types map directly to the JSON the API returns. The API omits
//! fields freely and adds new ones often, so almost everything is optional
//! and unknown fields are ignored.

use serde::Deserialize;

/// Response from `GET /StopPoint/Search/{query}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// The query as the API understood it.
    pub query: Option<String>,

    /// Total number of matches.
    pub total: Option<u32>,

    /// Matches in relevance order.
    #[serde(default)]
    pub matches: Vec<SearchMatch>,
}

/// One stop point search match.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    /// Stop point or hub id.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Fare zone, e.g. "1" or "2+3".
    pub zone: Option<String>,

    /// Modes serving the stop.
    #[serde(default)]
    pub modes: Vec<String>,

    /// Id of the outermost parent stop.
    pub top_most_parent_id: Option<String>,
}

/// A live arrival prediction from `GET /StopPoint/{id}/Arrivals` or
/// `GET /Line/{line}/Arrivals/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Prediction id.
    pub id: Option<String>,

    /// Stop point the prediction is for.
    pub naptan_id: Option<String>,

    /// Station name at the stop point.
    pub station_name: Option<String>,

    /// Line code, e.g. "central".
    pub line_id: String,

    /// Line display name, e.g. "Central".
    pub line_name: String,

    /// Platform, e.g. "Westbound - Platform 1".
    pub platform_name: Option<String>,

    /// "inbound" or "outbound", when known.
    pub direction: Option<String>,

    /// Destination display name. Missing for some trains.
    pub destination_name: Option<String>,

    /// Free-text "towards" label, used when there is no destination.
    pub towards: Option<String>,

    /// Seconds until the vehicle reaches the stop.
    #[serde(default)]
    pub time_to_station: i64,

    /// Predicted arrival (ISO 8601, UTC).
    pub expected_arrival: String,

    /// Mode name, e.g. "tube".
    pub mode_name: Option<String>,
}

/// A stop point from `GET /StopPoint/{id}`.
///
/// The API sends both `id` and `naptanId` on most stop points and only one
/// of them on some children, so both are kept.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPointDto {
    pub id: Option<String>,

    pub naptan_id: Option<String>,

    /// Display name.
    #[serde(default)]
    pub common_name: String,

    /// Modes serving the stop.
    #[serde(default)]
    pub modes: Vec<String>,

    /// Lines serving the stop.
    #[serde(default)]
    pub lines: Vec<Identifier>,

    /// Child stops (per-mode stations under a hub, platforms under a station).
    #[serde(default)]
    pub children: Vec<StopPointDto>,
}

/// A reference to another API entity (here always a line).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Response from `GET /Line/{line}/Timetable/{id}?direction=...`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableResponse {
    pub line_id: String,

    pub line_name: String,

    /// Declared direction, e.g. "inbound".
    #[serde(default)]
    pub direction: String,

    /// Stations referenced by this timetable.
    #[serde(default)]
    pub stations: Vec<TimetableStationDto>,

    /// The timetable proper. Absent for lines without a published one.
    pub timetable: Option<TimetableDto>,
}

/// Station entry in a timetable response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableStationDto {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableDto {
    /// Stop the timetable was requested from.
    pub departure_stop_id: Option<String>,

    #[serde(default)]
    pub routes: Vec<TimetableRouteDto>,
}

/// One route variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableRouteDto {
    #[serde(default)]
    pub station_intervals: Vec<StationIntervalDto>,

    #[serde(default)]
    pub schedules: Vec<ScheduleDto>,
}

/// Stops reachable from the departure stop; ids are numeric strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationIntervalDto {
    pub id: String,

    #[serde(default)]
    pub intervals: Vec<IntervalDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalDto {
    pub stop_id: String,

    /// Minutes from the departure stop.
    pub time_to_arrival: Option<f64>,
}

/// A day-type group such as "Monday - Friday".
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDto {
    pub name: String,

    #[serde(default)]
    pub known_journeys: Vec<KnownJourneyDto>,
}

/// A scheduled journey. Hour and minute arrive as strings ("5", "07").
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownJourneyDto {
    pub hour: String,
    pub minute: String,
    pub interval_id: i64,
}

/// A line status report from `GET /Line/Mode/{modes}/Status`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStatusDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub line_statuses: Vec<LineStatusEntryDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStatusEntryDto {
    pub status_severity: i32,
    pub status_severity_description: String,
    pub reason: Option<String>,
}

/// A disruption from `GET /Line/Mode/{modes}/Disruption`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisruptionDto {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub category_description: String,
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_search_response() {
        let json = r#"{
            "$type": "Tfl.Api.Presentation.Entities.SearchResponse, Tfl.Api.Presentation.Entities",
            "query": "paddington",
            "total": 2,
            "matches": [
                {
                    "id": "HUBPAD",
                    "name": "Paddington",
                    "modes": ["bus", "elizabeth-line", "national-rail", "tube"],
                    "zone": "1",
                    "lat": 51.516581,
                    "lon": -0.175689
                },
                {
                    "id": "940GZZLUPAH",
                    "name": "Paddington (H&C Line)-Underground",
                    "modes": ["tube"]
                }
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.total, Some(2));
        assert_eq!(response.matches.len(), 2);
        assert_eq!(response.matches[0].id, "HUBPAD");
        assert_eq!(response.matches[0].zone.as_deref(), Some("1"));
        assert_eq!(response.matches[0].modes.len(), 4);
        assert!(response.matches[1].zone.is_none());
    }

    #[test]
    fn deserialize_empty_search() {
        let json = r#"{"query": "zzz", "total": 0}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(response.matches.is_empty());
    }

    #[test]
    fn deserialize_prediction() {
        let json = r#"{
            "id": "-1234",
            "naptanId": "940GZZLUPAC",
            "stationName": "Paddington Underground Station",
            "lineId": "bakerloo",
            "lineName": "Bakerloo",
            "platformName": "Southbound - Platform 1",
            "direction": "inbound",
            "destinationName": "Elephant & Castle Underground Station",
            "towards": "Elephant and Castle",
            "timeToStation": 94,
            "expectedArrival": "2024-03-15T12:01:34Z",
            "modeName": "tube"
        }"#;

        let prediction: Prediction = serde_json::from_str(json).unwrap();

        assert_eq!(prediction.line_id, "bakerloo");
        assert_eq!(prediction.time_to_station, 94);
        assert_eq!(
            prediction.platform_name.as_deref(),
            Some("Southbound - Platform 1")
        );
        assert_eq!(prediction.expected_arrival, "2024-03-15T12:01:34Z");
    }

    #[test]
    fn deserialize_stop_point_with_children() {
        let json = r#"{
            "naptanId": "HUBLST",
            "id": "HUBLST",
            "commonName": "Liverpool Street",
            "modes": ["tube", "elizabeth-line"],
            "lines": [
                {"id": "elizabeth", "name": "Elizabeth line", "type": "Line"}
            ],
            "children": [
                {
                    "naptanId": "940GZZLULVT",
                    "commonName": "Liverpool Street Underground Station",
                    "lines": [
                        {"id": "central", "name": "Central", "type": "Line"},
                        {"id": "circle", "name": "Circle", "type": "Line"}
                    ]
                }
            ]
        }"#;

        let stop: StopPointDto = serde_json::from_str(json).unwrap();

        assert_eq!(stop.id.as_deref(), Some("HUBLST"));
        assert_eq!(stop.lines.len(), 1);
        assert_eq!(stop.children.len(), 1);
        assert!(stop.children[0].id.is_none());
        assert_eq!(stop.children[0].naptan_id.as_deref(), Some("940GZZLULVT"));
        assert_eq!(stop.children[0].lines[1].name, "Circle");
        assert!(stop.children[0].children.is_empty());
    }

    #[test]
    fn deserialize_timetable() {
        let json = r#"{
            "lineId": "central",
            "lineName": "Central",
            "direction": "outbound",
            "stations": [
                {"id": "940GZZLUEBY", "name": "Ealing Broadway Underground Station"}
            ],
            "timetable": {
                "departureStopId": "940GZZLULVT",
                "routes": [
                    {
                        "stationIntervals": [
                            {
                                "id": "0",
                                "intervals": [
                                    {"stopId": "940GZZLUBNK", "timeToArrival": 2.0},
                                    {"stopId": "940GZZLUEBY", "timeToArrival": 31.0}
                                ]
                            }
                        ],
                        "schedules": [
                            {
                                "name": "Monday - Friday",
                                "knownJourneys": [
                                    {"hour": "5", "minute": "31", "intervalId": 0}
                                ]
                            }
                        ]
                    }
                ]
            }
        }"#;

        let response: TimetableResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.direction, "outbound");
        let timetable = response.timetable.unwrap();
        let route = &timetable.routes[0];
        assert_eq!(route.station_intervals[0].intervals.len(), 2);
        assert_eq!(route.schedules[0].known_journeys[0].hour, "5");
        assert_eq!(route.schedules[0].known_journeys[0].interval_id, 0);
    }

    #[test]
    fn deserialize_timetable_without_schedule() {
        let json = r#"{"lineId": "elizabeth", "lineName": "Elizabeth line", "stations": []}"#;
        let response: TimetableResponse = serde_json::from_str(json).unwrap();
        assert!(response.timetable.is_none());
        assert_eq!(response.direction, "");
    }

    #[test]
    fn deserialize_line_status() {
        let json = r#"[{
            "id": "central",
            "name": "Central",
            "lineStatuses": [
                {"statusSeverity": 10, "statusSeverityDescription": "Good Service"}
            ]
        }]"#;

        let statuses: Vec<LineStatusDto> = serde_json::from_str(json).unwrap();
        assert_eq!(statuses[0].line_statuses[0].status_severity, 10);
        assert!(statuses[0].line_statuses[0].reason.is_none());
    }

    #[test]
    fn deserialize_disruption() {
        let json = r#"[{
            "category": "RealTime",
            "categoryDescription": "RealTime",
            "description": "Central Line: Minor delays due to an earlier signal failure."
        }]"#;

        let disruptions: Vec<DisruptionDto> = serde_json::from_str(json).unwrap();
        assert_eq!(disruptions[0].category, "RealTime");
    }
}
