//! London transit departure boards.
//!
//! Answers: "when does my train leave from this station?" Live predictions
//! cover roughly the next half hour; later requests are rebuilt from the
//! published timetables.

pub mod departures;
pub mod display;
pub mod domain;
pub mod logger;
pub mod stations;
pub mod tfl;
