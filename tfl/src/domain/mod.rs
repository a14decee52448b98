//! Domain types for departure boards.
//!
//! These types are what the rest of the crate works with once API
//! responses have been converted. They carry no transport details.

mod arrival;
mod station;
mod status;
mod time;
mod timetable;

pub use arrival::Arrival;
pub use station::{ChildStop, LineRef, Station, StopDetails};
pub use status::{Disruption, GOOD_SERVICE, LineStatus, StatusEntry};
pub use time::{TimeError, local_at, parse_hhmm, parse_time_today};
pub use timetable::{
    Direction, KnownJourney, Route, Schedule, StationInterval, TimetableDocument,
    TimetableStation,
};
