//! Line status and disruption reports.

/// Severity code the API uses for "Good Service".
pub const GOOD_SERVICE: i32 = 10;

/// Current status of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineStatus {
    pub id: String,
    pub name: String,
    /// Status entries, most significant first. Usually exactly one.
    pub statuses: Vec<StatusEntry>,
}

impl LineStatus {
    /// The headline status, if the API reported any.
    pub fn current(&self) -> Option<&StatusEntry> {
        self.statuses.first()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// 10 is good service; lower numbers are progressively worse.
    pub severity: i32,
    pub description: String,
    pub reason: Option<String>,
}

impl StatusEntry {
    pub fn is_good_service(&self) -> bool {
        self.severity == GOOD_SERVICE
    }
}

/// A disruption notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disruption {
    /// Machine category, e.g. "RealTime" or "PlannedWork".
    pub category: String,
    pub category_description: String,
    pub description: String,
}
