//! Static timetable documents.
//!
//! A timetable document covers one line in one direction, as seen from one
//! stop point. It carries no absolute times: each known journey is an
//! hour/minute pair plus the id of the station interval it runs, and the
//! destination has to be recovered from that interval's last stop.

use std::fmt;

/// Direction of travel along a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    /// Both directions, in the order they are fetched.
    pub const BOTH: [Direction; 2] = [Direction::Inbound, Direction::Outbound];

    /// Query-string form used by the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A station id and its display name, as listed in a timetable document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableStation {
    pub id: String,
    pub name: String,
}

/// Stops reachable from one origin along a route variant.
///
/// The last stop id is the destination of every journey run on this
/// interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationInterval {
    pub id: i64,
    pub stop_ids: Vec<String>,
}

impl StationInterval {
    /// The terminating stop of this interval, if it lists any stops.
    pub fn last_stop_id(&self) -> Option<&str> {
        self.stop_ids.last().map(String::as_str)
    }
}

/// One scheduled departure inside a day-type group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownJourney {
    /// Hour of day. Values of 24 and above denote early morning of the
    /// following day.
    pub hour: u32,
    pub minute: u32,
    pub interval_id: i64,
}

/// A named day-type group, e.g. "Monday - Friday" or "Sunday".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub name: String,
    pub known_journeys: Vec<KnownJourney>,
}

/// A route variant: its intervals and its schedules.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Route {
    pub station_intervals: Vec<StationInterval>,
    pub schedules: Vec<Schedule>,
}

/// Static timetable for one line and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableDocument {
    pub line_id: String,
    pub line_name: String,
    /// Direction label declared by the document; used as a destination of
    /// last resort.
    pub direction: String,
    pub stations: Vec<TimetableStation>,
    pub routes: Vec<Route>,
}
