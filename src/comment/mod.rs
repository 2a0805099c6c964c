//! Pull request comment rendering
//!
//! Turns step outcomes (validate, plan, apply) into a single markdown
//! document. The first line is always the caller's marker so the publisher
//! can find earlier comments from the same workflow.

mod marker;
mod renderer;
mod types;

pub use marker::default_marker;
pub use renderer::{
    build_comment, build_deprecation_section, build_resource_table, build_summary_table,
    derive_environment,
};
pub use types::{CommentOptions, Outcome, StepOutcome};
