//! Clinical trial comparison statistics library
//!
//! Extracts before/after treatment measurements from spreadsheet-shaped
//! cohort sheets and produces paired significance tests, trial-vs-control
//! unpaired comparisons and improvement-distribution tables.

pub mod errors;
pub mod example_data;
pub mod grouping;
pub mod header;
pub mod improvement;
pub mod matrix;
pub mod models;
pub mod output;
pub mod paired;
pub mod parser;
pub mod pipeline;
pub mod stats;
pub mod unpaired;

pub use errors::*;
pub use models::*;
pub use pipeline::*;

/// Re-export commonly used types
pub type Result<T> = std::result::Result<T, AnalysisError>;
