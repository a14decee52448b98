//! Departure resolution engine.
//!
//! Answers "what leaves station X, and when":
//!
//! - the best-matching station is picked for a free-text query,
//! - near-term requests use live predictions,
//! - requests further ahead than live data reaches are reconstructed from
//!   static timetables, falling back to live data (with an advisory) when
//!   no timetable is published,
//! - the result is filtered, ordered and limited.

mod config;
mod filter;
mod provider;
mod resolve;
mod timetable;


pub use config::DeparturesConfig;
pub use filter::{apply, filter_by_line, filter_by_match, filter_by_time, sort_by_departure};
pub use provider::TransitApi;
pub use resolve::{
    Advisory, ArrivalSource, DepartureBoard, DepartureResolver, ResolutionRequest, ResolveError,
    SelectedArrivals, choose_source,
};
pub use timetable::{
    LineStop, Reconstruction, TimeWindow, TimetableReconstructor, schedule_matches_day,
};
