//! Filtering and ordering of departure lists.

use chrono::{DateTime, Local};

use crate::domain::Arrival;

/// Filter, order and limit a departure list.
///
/// `line_filter` is the exact line filter: it should only be passed for
/// arrivals that came from a line-scoped live fetch. A `limit` of zero (or
/// `None`) keeps everything.
pub fn apply(
    mut arrivals: Vec<Arrival>,
    match_filter: Option<&str>,
    line_filter: Option<&str>,
    limit: Option<usize>,
) -> Vec<Arrival> {
    sort_by_departure(&mut arrivals);

    if let Some(filter) = match_filter {
        arrivals = filter_by_match(arrivals, filter);
    }
    if let Some(line) = line_filter {
        arrivals = filter_by_line(arrivals, line);
    }

    if let Some(limit) = limit.filter(|&n| n > 0) {
        arrivals.truncate(limit);
    }

    arrivals
}

/// Keep arrivals whose line, destination and platform text contains every
/// word of `filter`, ignoring case. A blank filter keeps everything.
pub fn filter_by_match(arrivals: Vec<Arrival>, filter: &str) -> Vec<Arrival> {
    let filter = filter.to_lowercase();
    let words: Vec<&str> = filter.split_whitespace().collect();

    if words.is_empty() {
        return arrivals;
    }

    arrivals
        .into_iter()
        .filter(|a| {
            let text = a.search_text();
            words.iter().all(|word| text.contains(word))
        })
        .collect()
}

/// Keep arrivals whose line name or line id equals `line`, ignoring case.
pub fn filter_by_line(arrivals: Vec<Arrival>, line: &str) -> Vec<Arrival> {
    let line = line.trim().to_lowercase();

    arrivals
        .into_iter()
        .filter(|a| a.line_name.to_lowercase() == line || a.line_id.to_lowercase() == line)
        .collect()
}

/// Keep arrivals at or after `min_time`.
pub fn filter_by_time(arrivals: Vec<Arrival>, min_time: DateTime<Local>) -> Vec<Arrival> {
    arrivals
        .into_iter()
        .filter(|a| a.expected_arrival >= min_time)
        .collect()
}

/// Stable sort by expected departure time.
pub fn sort_by_departure(arrivals: &mut [Arrival]) {
    arrivals.sort_by_key(|a| a.expected_arrival);
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    const LINES: &[&str] = &["Central", "Elizabeth", "Jubilee", "Northern"];
    const DESTINATIONS: &[&str] = &["Epping", "Heathrow Terminal 5", "Stanmore", "Morden"];

    fn arrivals() -> impl Strategy<Value = Vec<Arrival>> {
        proptest::collection::vec(
            (0..LINES.len(), 0..DESTINATIONS.len(), 0i64..600),
            0..30,
        )
        .prop_map(|items| {
            let base = Local.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
            items
                .into_iter()
                .map(|(line, dest, mins)| Arrival {
                    line_id: LINES[line].to_lowercase(),
                    line_name: LINES[line].into(),
                    destination_name: DESTINATIONS[dest].into(),
                    platform_name: None,
                    expected_arrival: base + Duration::minutes(mins),
                    time_to_station_secs: mins * 60,
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn output_is_ordered(arrivals in arrivals(), limit in 0usize..10) {
            let result = apply(arrivals, None, None, Some(limit));
            for pair in result.windows(2) {
                prop_assert!(pair[0].expected_arrival <= pair[1].expected_arrival);
            }
        }

        #[test]
        fn limit_bounds_length(arrivals in arrivals(), limit in 1usize..10) {
            let len = arrivals.len();
            let result = apply(arrivals, None, None, Some(limit));
            prop_assert_eq!(result.len(), len.min(limit));
        }

        #[test]
        fn match_results_contain_every_word(
            arrivals in arrivals(),
            dest in 0..DESTINATIONS.len(),
        ) {
            let filter = DESTINATIONS[dest].to_uppercase();
            let result = filter_by_match(arrivals, &filter);
            for arrival in &result {
                let text = arrival.search_text();
                for word in filter.to_lowercase().split_whitespace() {
                    prop_assert!(text.contains(word));
                }
            }
        }

        #[test]
        fn filters_only_remove(arrivals in arrivals(), line in 0..LINES.len()) {
            let len = arrivals.len();
            let result = apply(arrivals, Some("e"), Some(LINES[line]), None);
            prop_assert!(result.len() <= len);
            prop_assert!(result.iter().all(|a| a.line_name == LINES[line]));
        }
    }
}
