//! The transit data the departure resolver needs.

use crate::domain::{Arrival, Direction, Station, StopDetails, TimetableDocument};
use crate::tfl::TflError;

/// Source of stations, live predictions and static timetables.
///
/// This abstraction allows the resolver to run against the real API, the
/// file-backed mock, or in-memory test data.
#[allow(async_fn_in_trait)]
pub trait TransitApi {
    /// Search stop points by free text. An empty result is not an error.
    async fn search_stations(&self, query: &str) -> Result<Vec<Station>, TflError>;

    /// Live predictions at a stop, for one line or for every line.
    async fn live_arrivals(
        &self,
        stop_id: &str,
        line_id: Option<&str>,
    ) -> Result<Vec<Arrival>, TflError>;

    /// Lines and child stops of a stop point.
    async fn stop_details(&self, stop_id: &str) -> Result<StopDetails, TflError>;

    /// Static timetable for a line, direction and departure stop.
    ///
    /// `Ok(None)` means the line has no published timetable; that is an
    /// expected answer, not a failure.
    async fn timetable(
        &self,
        line_id: &str,
        stop_id: &str,
        direction: Direction,
    ) -> Result<Option<TimetableDocument>, TflError>;
}
