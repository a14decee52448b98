//! Tuning for departure resolution.

use chrono::Duration;

/// Configuration parameters for departure resolution.
#[derive(Debug, Clone)]
pub struct DeparturesConfig {
    /// How far ahead live predictions are trusted (minutes). Requests for
    /// later times go to the static timetable first.
    pub live_horizon_mins: i64,

    /// How far past the requested time reconstructed journeys are kept
    /// (minutes).
    pub lookahead_mins: i64,

    /// Maximum number of timetable fetches in flight at once.
    pub fetch_batch_size: usize,
}

impl DeparturesConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(live_horizon_mins: i64, lookahead_mins: i64, fetch_batch_size: usize) -> Self {
        Self {
            live_horizon_mins,
            lookahead_mins,
            fetch_batch_size,
        }
    }

    /// Returns the live prediction horizon as a Duration.
    pub fn live_horizon(&self) -> Duration {
        Duration::minutes(self.live_horizon_mins)
    }

    /// Returns the timetable lookahead as a Duration.
    pub fn lookahead(&self) -> Duration {
        Duration::minutes(self.lookahead_mins)
    }

    /// Batch size for timetable fetches, never zero.
    pub fn batch_size(&self) -> usize {
        self.fetch_batch_size.max(1)
    }
}

impl Default for DeparturesConfig {
    fn default() -> Self {
        Self {
            live_horizon_mins: 30,
            lookahead_mins: 240, // 4 hours
            fetch_batch_size: 4,
        }
    }
}
