//! Core domain types and pipeline logic.

pub mod ticker;
pub mod price;
pub mod metrics;
pub mod prompt;
pub mod analysis;
pub mod samples;
pub mod demo;
pub mod report;
pub mod orchestrator;
pub mod error;
