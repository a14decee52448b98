//! Station name matching and display names.

mod matcher;
mod names;

pub use matcher::select_best_match;
pub use names::{StationNames, format_stop_id, known_stop_name, normalize_station_name};
