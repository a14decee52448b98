//! Stop point types.

use std::collections::BTreeSet;
use std::fmt;

/// A station returned by a stop point search.
///
/// Identity is the stop point id (a NaPTAN code such as `940GZZLULVT`, or a
/// hub id such as `HUBLST`). Stations are never mutated after they are
/// fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    /// Stop point id.
    pub id: String,
    /// Display name, e.g. "Liverpool Street Underground Station".
    pub name: String,
    /// Fare zone, when the API reports one.
    pub zone: Option<String>,
    /// Transport modes serving the station ("tube", "elizabeth-line", ...).
    pub modes: BTreeSet<String>,
}

impl Station {
    /// Create a station with no zone and no modes.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            zone: None,
            modes: BTreeSet::new(),
        }
    }

    /// Set the fare zone.
    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    /// Add a transport mode.
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.modes.insert(mode.into());
        self
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// A line serving a stop point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRef {
    /// Stable line code, e.g. "central".
    pub id: String,
    /// Display name, e.g. "Central".
    pub name: String,
}

impl LineRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Whether this line passes a user-supplied line filter.
    ///
    /// The filter matches the line id exactly or any part of the line name,
    /// ignoring case. An empty filter matches every line.
    pub fn matches_filter(&self, filter: &str) -> bool {
        let filter = filter.trim().to_lowercase();
        if filter.is_empty() {
            return true;
        }
        self.id.to_lowercase() == filter || self.name.to_lowercase().contains(&filter)
    }
}

/// A child stop grouped under a parent station.
///
/// Large interchanges expose one child per mode, e.g. separate tube and
/// rail platforms under a single hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildStop {
    pub id: String,
    pub name: String,
    pub lines: Vec<LineRef>,
}

/// Detail view of a stop point: the lines it serves and its child stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopDetails {
    pub id: String,
    pub name: String,
    pub lines: Vec<LineRef>,
    pub children: Vec<ChildStop>,
}
