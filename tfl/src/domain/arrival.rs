//! Departure board entries.

use chrono::{DateTime, Local};

/// One departure (TfL calls them arrivals) at a stop point.
///
/// Produced either from live predictions or synthesised from a static
/// timetable. For synthesised entries `time_to_station_secs` is the
/// distance from "now" to `expected_arrival` and can be several hours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrival {
    pub line_id: String,
    pub line_name: String,
    pub destination_name: String,
    pub platform_name: Option<String>,
    pub expected_arrival: DateTime<Local>,
    pub time_to_station_secs: i64,
}

impl Arrival {
    /// Text searched by the match filter: line, destination and platform,
    /// lower-cased and space separated.
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {}",
            self.line_name,
            self.destination_name,
            self.platform_name.as_deref().unwrap_or_default()
        )
        .to_lowercase()
    }

    /// Whole minutes until departure, truncated towards zero.
    pub fn minutes_away(&self) -> i64 {
        self.time_to_station_secs / 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn arrival(platform: Option<&str>, secs: i64) -> Arrival {
        Arrival {
            line_id: "elizabeth".into(),
            line_name: "Elizabeth".into(),
            destination_name: "Heathrow Terminal 5".into(),
            platform_name: platform.map(String::from),
            expected_arrival: Local.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap(),
            time_to_station_secs: secs,
        }
    }

    #[test]
    fn search_text_covers_all_fields() {
        let text = arrival(Some("Platform 1"), 0).search_text();
        assert_eq!(text, "elizabeth heathrow terminal 5 platform 1");
    }

    #[test]
    fn search_text_without_platform() {
        let text = arrival(None, 0).search_text();
        assert_eq!(text, "elizabeth heathrow terminal 5 ");
    }

    #[test]
    fn minutes_away_truncates() {
        assert_eq!(arrival(None, 59).minutes_away(), 0);
        assert_eq!(arrival(None, 60).minutes_away(), 1);
        assert_eq!(arrival(None, 3_599).minutes_away(), 59);
        assert_eq!(arrival(None, 7_260).minutes_away(), 121);
    }
}
