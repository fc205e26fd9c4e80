//! Utility modules
//!
//! - Diagnostics for dataset linting
//! - Error types and result types

pub mod diagnostics;
pub mod error;

// Re-export commonly used items
pub use diagnostics::{check_dataset, format_diagnostics, CheckResult, Diagnostic, DiagnosticLevel};
pub use error::{GenError, GenResult};
