//! Rendering of boards and reports, as coloured text or JSON.

pub mod json;
pub mod text;

pub use json::{
    CheckResult, DeparturesOutput, DisruptionsOutput, StationsOutput, StatusOutput, write_json,
};
