//! Comment publishing on GitHub pull requests
//!
//! The publisher lists existing comments, collapses every earlier comment
//! carrying the same marker under a "Superseded" summary, then creates a new
//! comment with the latest result. The hosting API sits behind the
//! [`CommentApi`] trait so tests can record calls instead of hitting the
//! network.

mod client;
mod context;
mod publisher;

pub use client::{CommentApi, DEFAULT_API_URL, GitHubClient, PullRequestRef};
#[cfg(test)]
pub use client::{ApiCall, IssueComment, MockCommentApi};
pub use context::resolve_pull_request;
pub use publisher::{post_comment, superseded_updates};
