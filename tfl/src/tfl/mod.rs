//! TfL unified API client.
//!
//! This module provides an HTTP client for the Transport for London API
//! and a file-backed mock with the same surface.
//!
//! Key characteristics of the API:
//! - Stop points are identified by NaPTAN codes (`940GZZLULVT`) or hub ids
//!   (`HUBLST`); hubs group per-mode child stops
//! - Live predictions only reach roughly 30 minutes ahead
//! - Timetables are per line and direction, give journeys as bare
//!   hour/minute pairs, and are missing for some lines altogether

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{DEFAULT_BASE_URL, TflClient, TflConfig};
pub use convert::{ConversionError, parse_timestamp};
pub use error::TflError;
pub use mock::MockTflClient;
pub use types::{
    Prediction, SearchMatch, SearchResponse, StopPointDto, TimetableResponse,
};
