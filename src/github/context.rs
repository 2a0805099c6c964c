//! Resolving which pull request to comment on
//!
//! Inside GitHub Actions the repository comes from `GITHUB_REPOSITORY` and
//! the number from the event payload at `GITHUB_EVENT_PATH`. Both can be
//! overridden on the command line.

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::path::Path;

use super::client::PullRequestRef;
use crate::traits::FileSystem;

/// Split "owner/name" into its two parts
pub fn parse_repository(repository: &str) -> Result<(String, String)> {
    let trimmed = repository.trim();
    match trimmed.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => bail!(
            "Invalid repository '{}': expected the form owner/name",
            repository
        ),
    }
}

/// Read the pull request (or issue) number from an Actions event payload
pub fn number_from_event(payload: &str) -> Result<u64> {
    let event: Value =
        serde_json::from_str(payload).context("Failed to parse GitHub event payload")?;

    [
        event.pointer("/pull_request/number"),
        event.pointer("/issue/number"),
        event.get("number"),
    ]
    .into_iter()
    .flatten()
    .find_map(Value::as_u64)
    .context("GitHub event payload does not reference a pull request or issue")
}

/// Build a pull request reference from explicit values, falling back to the event file
pub fn resolve_pull_request(
    fs: &dyn FileSystem,
    repository: Option<&str>,
    number: Option<u64>,
    event_path: Option<&Path>,
) -> Result<PullRequestRef> {
    let repository = repository
        .filter(|r| !r.trim().is_empty())
        .context("Repository is required (--repo or GITHUB_REPOSITORY)")?;
    let (owner, repo) = parse_repository(repository)?;

    let number = match (number, event_path) {
        (Some(number), _) => number,
        (None, Some(path)) => {
            let payload = fs
                .read_to_string(path)
                .with_context(|| format!("Failed to read GitHub event file {:?}", path))?;
            number_from_event(&payload)?
        }
        (None, None) => {
            bail!("Pull request number is required (--pr or GITHUB_EVENT_PATH)")
        }
    };

    Ok(PullRequestRef {
        owner,
        repo,
        number,
    })
}
