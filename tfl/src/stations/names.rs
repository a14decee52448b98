//! Station display names.
//!
//! Timetable documents name stations the way the API does ("Ealing
//! Broadway Underground Station"); departure boards want the short form.
//! Interval data sometimes refers to stops no document names, so a small
//! static table of stop codes backs up the lookup.

use std::collections::HashMap;

/// Suffixes removed from station names, applied in this order.
const NAME_SUFFIXES: [&str; 3] = [" Underground Station", " Rail Station", " DLR Station"];

/// Stop-id prefixes removed when a code has no known name.
const STOP_ID_PREFIXES: [&str; 2] = ["940GZZLU", "910G"];

/// Stop codes whose names are missing from the timetable documents that
/// reference them.
const KNOWN_STOPS: [(&str, &str); 7] = [
    ("940GZZLUWRP", "West Ruislip"),
    ("940GZZLUEBY", "Ealing Broadway"),
    ("940GZZLUEAN", "East Acton"),
    ("940GZZLUNOA", "North Acton"),
    ("940GZZLUWCY", "White City"),
    ("940GZZLUHLT", "Hainault"),
    ("940GZZLUEPG", "Epping"),
];

/// Shorten an API station name for display.
///
/// ```
/// use tfl::stations::normalize_station_name;
///
/// assert_eq!(normalize_station_name("Epping Underground Station"), "Epping");
/// assert_eq!(normalize_station_name("Shenfield Rail Station"), "Shenfield");
/// assert_eq!(normalize_station_name("Bank"), "Bank");
/// ```
pub fn normalize_station_name(name: &str) -> String {
    NAME_SUFFIXES
        .iter()
        .fold(name, |name, suffix| name.strip_suffix(suffix).unwrap_or(name))
        .to_string()
}

/// Look up a stop code in the static fallback table.
pub fn known_stop_name(stop_id: &str) -> Option<&'static str> {
    KNOWN_STOPS
        .iter()
        .find(|(id, _)| *id == stop_id)
        .map(|(_, name)| *name)
}

/// Best-effort display name for a stop code nobody named.
///
/// Uses the static table first, then strips the well-known id prefixes so
/// that at least the short station code remains.
pub fn format_stop_id(stop_id: &str) -> String {
    if let Some(name) = known_stop_name(stop_id) {
        return name.to_string();
    }

    STOP_ID_PREFIXES
        .iter()
        .fold(stop_id, |id, prefix| id.strip_prefix(prefix).unwrap_or(id))
        .to_string()
}

/// Station id → display name, merged from several timetable documents.
#[derive(Debug, Clone, Default)]
pub struct StationNames {
    names: HashMap<String, String>,
}

impl StationNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a station name, normalised. Later entries replace earlier
    /// ones for the same id.
    pub fn insert(&mut self, id: impl Into<String>, name: &str) {
        self.names.insert(id.into(), normalize_station_name(name));
    }

    /// Look up a station name.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Resolve a stop id to a display name, falling back to the static
    /// table and then to the trimmed stop code.
    pub fn resolve(&self, stop_id: &str) -> String {
        match self.get(stop_id) {
            Some(name) => name.to_string(),
            None => format_stop_id(stop_id),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_each_suffix() {
        assert_eq!(
            normalize_station_name("Ealing Broadway Underground Station"),
            "Ealing Broadway"
        );
        assert_eq!(
            normalize_station_name("Heathrow Terminal 5 Rail Station"),
            "Heathrow Terminal 5"
        );
        assert_eq!(normalize_station_name("Bank DLR Station"), "Bank");
    }

    #[test]
    fn suffix_only_stripped_at_end() {
        assert_eq!(
            normalize_station_name("Rail Station Road"),
            "Rail Station Road"
        );
    }

    #[test]
    fn known_station_codes() {
        assert_eq!(format_stop_id("940GZZLUWRP"), "West Ruislip");
        assert_eq!(format_stop_id("940GZZLUEBY"), "Ealing Broadway");
        assert_eq!(format_stop_id("940GZZLUEPG"), "Epping");
    }

    #[test]
    fn unknown_station_codes_lose_prefix() {
        assert_eq!(format_stop_id("940GZZLUXYZ"), "XYZ");
        assert_eq!(format_stop_id("910GABC"), "ABC");
        assert_eq!(format_stop_id("HUBLST"), "HUBLST");
    }

    #[test]
    fn merged_names_take_precedence_over_table() {
        let mut names = StationNames::new();
        names.insert("940GZZLUEBY", "Ealing Broadway Underground Station");
        names.insert("910GSHENFLD", "Shenfield Rail Station");

        assert_eq!(names.len(), 2);
        assert_eq!(names.resolve("940GZZLUEBY"), "Ealing Broadway");
        assert_eq!(names.resolve("910GSHENFLD"), "Shenfield");
        assert_eq!(names.resolve("940GZZLUHLT"), "Hainault");
        assert_eq!(names.resolve("940GZZLUQQQ"), "QQQ");
    }

    #[test]
    fn later_names_replace_earlier() {
        let mut names = StationNames::new();
        names.insert("X", "Old Name");
        names.insert("X", "New Name Rail Station");
        assert_eq!(names.get("X"), Some("New Name"));
        assert_eq!(names.len(), 1);
    }
}
