//! Plan output parsing
//!
//! Extracts structured facts from raw (possibly ANSI-colored) Terraform or
//! OpenTofu output: the summary counts, per-resource actions, and deprecation
//! warnings.
//!
//! # Example
//!
//! ```ignore
//! use crate::plan::parse_output;
//!
//! let parsed = parse_output(&plan_stdout);
//! let destroyed = parsed.summary.map(|s| s.destroy).unwrap_or(0);
//! ```

mod parser;
mod types;

pub use parser::{parse_output, strip_ansi};
pub use types::{ActionKind, Deprecation, ParsedOutput, PlanSummary, ResourceAction};
