//! CLI command implementations

pub mod batch;
pub mod doctor;
pub mod json_output;
pub mod mood;
pub mod probe;
pub mod reconcile;
