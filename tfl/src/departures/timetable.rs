//! Departures reconstructed from static timetables.
//!
//! Live predictions only reach about half an hour ahead. For later
//! requests the resolver rebuilds a departure list from the published
//! timetables of every line at the stop:
//!
//! 1. enumerate the lines at the stop and its child stops,
//! 2. fetch inbound and outbound timetables once per line,
//! 3. merge station names across every fetched document,
//! 4. map each station interval to the name of its last stop,
//! 5. keep today's journeys that fall inside the requested window.
//!
//! A timetable that cannot be fetched is skipped; partial data still
//! produces a useful board.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Local, Weekday};
use futures::future::join_all;
use tracing::{debug, info};

use crate::domain::{Arrival, Direction, LineRef, Route, StopDetails, TimetableDocument, local_at};
use crate::stations::StationNames;
use crate::tfl::TflError;

use super::config::DeparturesConfig;
use super::provider::TransitApi;

/// A line served at a particular stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineStop {
    pub line_id: String,
    pub line_name: String,
    pub stop_id: String,
}

/// Result of timetable reconstruction.
#[derive(Debug, Clone)]
pub struct Reconstruction {
    /// Scheduled departures, ordered by departure time.
    pub arrivals: Vec<Arrival>,

    /// Lines at the stop that passed the line filter.
    pub lines: Vec<LineStop>,

    /// Timetable documents fetched successfully.
    pub documents: usize,

    /// Fetches answered with "no published timetable".
    pub unavailable: usize,

    /// Fetches that failed and were skipped.
    pub failed: usize,
}

/// Inclusive range of acceptable departure times.
#[derive(Debug, Clone, Copy)]
pub struct TimeWindow {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Local>, end: DateTime<Local>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, t: DateTime<Local>) -> bool {
        t >= self.start && t <= self.end
    }
}

/// Rebuilds departure lists from static timetables.
pub struct TimetableReconstructor<'a, A> {
    api: &'a A,
    config: &'a DeparturesConfig,
}

impl<'a, A: TransitApi> TimetableReconstructor<'a, A> {
    pub fn new(api: &'a A, config: &'a DeparturesConfig) -> Self {
        Self { api, config }
    }

    /// Scheduled departures from `stop_id` between `min_time` and the
    /// configured lookahead after it.
    ///
    /// Fails only if the stop itself cannot be looked up. Individual
    /// timetable fetches that fail are counted and skipped.
    pub async fn reconstruct(
        &self,
        stop_id: &str,
        line_filter: Option<&str>,
        min_time: DateTime<Local>,
        now: DateTime<Local>,
    ) -> Result<Reconstruction, TflError> {
        let details = self.api.stop_details(stop_id).await?;
        let lines = distinct_lines(line_stops(&details, line_filter));

        debug!(
            stop = %stop_id,
            lines = ?lines.iter().map(|l| l.line_id.as_str()).collect::<Vec<_>>(),
            "fetching timetables"
        );

        let requests: Vec<(&LineStop, Direction)> = lines
            .iter()
            .flat_map(|line| Direction::BOTH.map(|direction| (line, direction)))
            .collect();

        let mut documents = Vec::new();
        let mut unavailable = 0;
        let mut failed = 0;

        for batch in requests.chunks(self.config.batch_size()) {
            let futures: Vec<_> = batch
                .iter()
                .map(|&(line, direction)| async move {
                    let result = self
                        .api
                        .timetable(&line.line_id, &line.stop_id, direction)
                        .await;
                    (line, direction, result)
                })
                .collect();

            for (line, direction, result) in join_all(futures).await {
                match result {
                    Ok(Some(doc)) => documents.push(doc),
                    Ok(None) => {
                        unavailable += 1;
                        debug!(
                            line = %line.line_id,
                            stop = %line.stop_id,
                            %direction,
                            "no published timetable"
                        );
                    }
                    Err(e) => {
                        failed += 1;
                        debug!(
                            line = %line.line_id,
                            stop = %line.stop_id,
                            %direction,
                            error = %e,
                            "timetable fetch failed, skipping"
                        );
                    }
                }
            }
        }

        let names = merge_station_names(&documents);
        let window = TimeWindow::new(min_time, min_time + self.config.lookahead());

        let mut arrivals: Vec<Arrival> = documents
            .iter()
            .flat_map(|doc| arrivals_from_document(doc, &names, window, now))
            .collect();
        arrivals.sort_by_key(|a| a.expected_arrival);

        info!(
            stop = %stop_id,
            documents = documents.len(),
            unavailable,
            failed,
            departures = arrivals.len(),
            "reconstructed departures from timetables"
        );

        Ok(Reconstruction {
            arrivals,
            lines,
            documents: documents.len(),
            unavailable,
            failed,
        })
    }
}

/// Every (line, stop) pair at a stop that passes the line filter.
///
/// Child stops come first, then the stop itself; a hub typically lists the
/// tube lines under its tube child and rail lines on itself.
pub fn line_stops(details: &StopDetails, line_filter: Option<&str>) -> Vec<LineStop> {
    let passes = |line: &LineRef| line_filter.is_none_or(|f| line.matches_filter(f));

    let children = details.children.iter().flat_map(|child| {
        child
            .lines
            .iter()
            .filter(|&line| passes(line))
            .map(|line| LineStop {
                line_id: line.id.clone(),
                line_name: line.name.clone(),
                stop_id: child.id.clone(),
            })
    });

    let own = details
        .lines
        .iter()
        .filter(|&line| passes(line))
        .map(|line| LineStop {
            line_id: line.id.clone(),
            line_name: line.name.clone(),
            stop_id: details.id.clone(),
        });

    children.chain(own).collect()
}

/// Keep the first stop found for each line.
pub fn distinct_lines(line_stops: Vec<LineStop>) -> Vec<LineStop> {
    let mut seen = HashSet::new();
    line_stops
        .into_iter()
        .filter(|ls| seen.insert(ls.line_id.clone()))
        .collect()
}

/// Station names from every document, normalised for display.
pub fn merge_station_names(documents: &[TimetableDocument]) -> StationNames {
    let mut names = StationNames::new();
    for doc in documents {
        for station in &doc.stations {
            names.insert(station.id.clone(), &station.name);
        }
    }
    names
}

/// Whether a free-text schedule name ("Monday - Friday", "Saturday (also
/// Good Friday)") covers the given weekday.
///
/// The API has no structured day type, so this follows its naming
/// conventions: Monday to Thursday match any name mentioning Monday, which
/// covers both "Monday - Thursday" and "Monday - Friday".
pub fn schedule_matches_day(schedule_name: &str, day: Weekday) -> bool {
    let name = schedule_name.to_lowercase();

    match day {
        Weekday::Sat => name.contains("saturday"),
        Weekday::Sun => name.contains("sunday"),
        Weekday::Fri => {
            name.contains("friday") || (name.contains("monday") && name.contains("friday"))
        }
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu => name.contains("monday"),
    }
}

/// Interval id → destination name for one route variant.
pub fn interval_destinations(route: &Route, names: &StationNames) -> HashMap<i64, String> {
    route
        .station_intervals
        .iter()
        .filter_map(|si| si.last_stop_id().map(|stop| (si.id, names.resolve(stop))))
        .collect()
}

/// Today's journeys in one document that depart inside `window`.
///
/// "Today" and the weekday are taken from `now`. Journeys whose interval
/// has no known destination are labelled with the document's direction.
pub fn arrivals_from_document(
    doc: &TimetableDocument,
    names: &StationNames,
    window: TimeWindow,
    now: DateTime<Local>,
) -> Vec<Arrival> {
    let today = now.date_naive();
    let weekday = now.weekday();
    let mut arrivals = Vec::new();

    for route in &doc.routes {
        let destinations = interval_destinations(route, names);

        for schedule in route
            .schedules
            .iter()
            .filter(|s| schedule_matches_day(&s.name, weekday))
        {
            for journey in &schedule.known_journeys {
                let Some(depart) = local_at(today, journey.hour, journey.minute) else {
                    continue;
                };

                if !window.contains(depart) {
                    continue;
                }

                let destination_name = destinations
                    .get(&journey.interval_id)
                    .filter(|name| !name.is_empty())
                    .cloned()
                    .unwrap_or_else(|| doc.direction.clone());

                arrivals.push(Arrival {
                    line_id: doc.line_id.clone(),
                    line_name: doc.line_name.clone(),
                    destination_name,
                    platform_name: None,
                    expected_arrival: depart,
                    time_to_station_secs: (depart - now).num_seconds(),
                });
            }
        }
    }

    arrivals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChildStop, KnownJourney, Schedule, StationInterval, TimetableStation};
    use chrono::{Duration, TimeZone, Timelike};

    /// Friday 15 March 2024, noon.
    fn friday_noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 15, hour, minute, 0).unwrap()
    }

    fn journey(hour: u32, minute: u32, interval_id: i64) -> KnownJourney {
        KnownJourney {
            hour,
            minute,
            interval_id,
        }
    }

    fn interval(id: i64, stops: &[&str]) -> StationInterval {
        StationInterval {
            id,
            stop_ids: stops.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn central_westbound() -> TimetableDocument {
        TimetableDocument {
            line_id: "central".into(),
            line_name: "Central".into(),
            direction: "outbound".into(),
            stations: vec![TimetableStation {
                id: "940GZZLUWRP".into(),
                name: "West Ruislip Underground Station".into(),
            }],
            routes: vec![Route {
                station_intervals: vec![
                    interval(0, &["940GZZLUBNK", "940GZZLUWRP"]),
                    interval(1, &["940GZZLUBNK", "940GZZLUEBY"]),
                    interval(2, &["940GZZLUBNK", "940GZZLUZZZ"]),
                    interval(3, &[]),
                ],
                schedules: vec![
                    Schedule {
                        name: "Monday - Friday".into(),
                        known_journeys: vec![
                            journey(11, 59, 0),
                            journey(12, 30, 1),
                            journey(13, 0, 2),
                            journey(14, 0, 3),
                            journey(16, 0, 0),
                            journey(16, 1, 0),
                        ],
                    },
                    Schedule {
                        name: "Saturday".into(),
                        known_journeys: vec![journey(12, 15, 0)],
                    },
                ],
            }],
        }
    }

    fn four_hours_from(start: DateTime<Local>) -> TimeWindow {
        TimeWindow::new(start, start + Duration::hours(4))
    }

    #[test]
    fn day_matching() {
        let cases = [
            ("Saturday (also Good Friday)", Weekday::Sat, true),
            ("Saturday (also Good Friday)", Weekday::Sun, false),
            ("Sunday", Weekday::Sun, true),
            ("Sunday", Weekday::Mon, false),
            ("Sunday", Weekday::Sat, false),
            ("Friday", Weekday::Fri, true),
            ("Monday - Thursday", Weekday::Mon, true),
            ("Monday - Thursday", Weekday::Wed, true),
            ("Monday - Thursday", Weekday::Fri, false),
            ("Monday - Friday", Weekday::Fri, true),
            ("Monday - Friday", Weekday::Tue, true),
            ("Monday - Friday", Weekday::Sat, false),
            ("MONDAY - FRIDAY", Weekday::Thu, true),
        ];

        for (name, day, expected) in cases {
            assert_eq!(
                schedule_matches_day(name, day),
                expected,
                "schedule_matches_day({name:?}, {day:?})"
            );
        }
    }

    #[test]
    fn line_stops_children_first_then_self() {
        let details = StopDetails {
            id: "HUBLST".into(),
            name: "Liverpool Street".into(),
            lines: vec![LineRef::new("elizabeth", "Elizabeth line")],
            children: vec![ChildStop {
                id: "940GZZLULVT".into(),
                name: "Liverpool Street Underground Station".into(),
                lines: vec![
                    LineRef::new("central", "Central"),
                    LineRef::new("circle", "Circle"),
                ],
            }],
        };

        let all = line_stops(&details, None);
        let ids: Vec<_> = all
            .iter()
            .map(|ls| (ls.line_id.as_str(), ls.stop_id.as_str()))
            .collect();
        assert_eq!(
            ids,
            vec![
                ("central", "940GZZLULVT"),
                ("circle", "940GZZLULVT"),
                ("elizabeth", "HUBLST"),
            ]
        );

        let filtered = line_stops(&details, Some("ELIZ"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].stop_id, "HUBLST");
    }

    #[test]
    fn distinct_lines_keeps_first_stop() {
        let stops = vec![
            LineStop {
                line_id: "central".into(),
                line_name: "Central".into(),
                stop_id: "A".into(),
            },
            LineStop {
                line_id: "central".into(),
                line_name: "Central".into(),
                stop_id: "B".into(),
            },
            LineStop {
                line_id: "circle".into(),
                line_name: "Circle".into(),
                stop_id: "B".into(),
            },
        ];

        let lines = distinct_lines(stops);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].stop_id, "A");
        assert_eq!(lines[1].line_id, "circle");
    }

    #[test]
    fn names_merged_across_documents() {
        let mut other = central_westbound();
        other.stations = vec![TimetableStation {
            id: "940GZZLUEBY".into(),
            name: "Ealing Broadway Underground Station".into(),
        }];

        let names = merge_station_names(&[central_westbound(), other]);
        assert_eq!(names.get("940GZZLUWRP"), Some("West Ruislip"));
        assert_eq!(names.get("940GZZLUEBY"), Some("Ealing Broadway"));
    }

    #[test]
    fn destinations_fall_back_to_table_then_code() {
        let doc = central_westbound();
        let names = merge_station_names(std::slice::from_ref(&doc));

        let destinations = interval_destinations(&doc.routes[0], &names);
        assert_eq!(destinations.len(), 3);
        assert_eq!(destinations[&0], "West Ruislip");
        assert_eq!(destinations[&1], "Ealing Broadway");
        assert_eq!(destinations[&2], "ZZZ");
        assert!(!destinations.contains_key(&3));
    }

    #[test]
    fn journeys_inside_window_only() {
        let doc = central_westbound();
        let names = merge_station_names(std::slice::from_ref(&doc));
        let now = friday_noon();

        let arrivals = arrivals_from_document(&doc, &names, four_hours_from(now), now);

        let times: Vec<_> = arrivals
            .iter()
            .map(|a| (a.expected_arrival.hour(), a.expected_arrival.minute()))
            .collect();
        // 11:59 is before the window, 16:01 after it; Saturday is skipped
        assert_eq!(times, vec![(12, 30), (13, 0), (14, 0), (16, 0)]);
    }

    #[test]
    fn window_is_anchored_to_min_time() {
        let doc = central_westbound();
        let names = merge_station_names(std::slice::from_ref(&doc));

        let arrivals =
            arrivals_from_document(&doc, &names, four_hours_from(at(13, 0)), friday_noon());

        let times: Vec<_> = arrivals
            .iter()
            .map(|a| (a.expected_arrival.hour(), a.expected_arrival.minute()))
            .collect();
        // 12:30 is before the later window and 16:01 now falls inside it
        assert_eq!(times, vec![(13, 0), (14, 0), (16, 0), (16, 1)]);
        assert!(arrivals.iter().all(|a| a.expected_arrival != at(12, 30)));
        assert_eq!(arrivals[0].time_to_station_secs, 3600);
    }

    #[test]
    fn out_of_range_journey_is_skipped() {
        let mut doc = central_westbound();
        doc.routes[0].schedules[0].known_journeys = vec![journey(4_000_000_000, 0, 0)];
        let names = merge_station_names(std::slice::from_ref(&doc));
        let now = friday_noon();

        let arrivals = arrivals_from_document(&doc, &names, four_hours_from(now), now);
        assert!(arrivals.is_empty());
    }

    #[test]
    fn destination_falls_back_to_direction() {
        let doc = central_westbound();
        let names = merge_station_names(std::slice::from_ref(&doc));
        let now = friday_noon();

        let arrivals = arrivals_from_document(&doc, &names, four_hours_from(now), now);
        let destinations: Vec<_> = arrivals
            .iter()
            .map(|a| a.destination_name.as_str())
            .collect();
        assert_eq!(
            destinations,
            vec!["Ealing Broadway", "ZZZ", "outbound", "West Ruislip"]
        );
        assert!(arrivals.iter().all(|a| a.platform_name.is_none()));
        assert!(arrivals.iter().all(|a| a.line_name == "Central"));
    }

    #[test]
    fn saturday_uses_saturday_schedule() {
        let doc = central_westbound();
        let names = merge_station_names(std::slice::from_ref(&doc));
        let saturday = Local.with_ymd_and_hms(2024, 3, 16, 12, 0, 0).unwrap();

        let arrivals = arrivals_from_document(&doc, &names, four_hours_from(saturday), saturday);
        assert_eq!(arrivals.len(), 1);
        assert_eq!(arrivals[0].expected_arrival.minute(), 15);
        assert_eq!(arrivals[0].time_to_station_secs, 15 * 60);
    }
}
