use anyhow::Result;
use tracing::{debug, info, warn};

use super::client::{COMMENTS_PER_PAGE, CommentApi, IssueComment, PullRequestRef};

/// Written into every superseded comment's summary line
pub const SUPERSEDED_MARKER: &str = "⛔ <strong>Superseded</strong>";

/// Markdown spelling of the same label, also treated as already superseded
const SUPERSEDED_MARKER_MARKDOWN: &str = "⛔ **Superseded**";

/// Collapse earlier comments carrying `marker`, then post `body` as a new comment.
///
/// Updates are issued one at a time in list order and the create always
/// comes last, so the new comment is never itself superseded. API errors are
/// returned as-is.
pub fn post_comment(
    api: &dyn CommentApi,
    pr: &PullRequestRef,
    marker: &str,
    body: &str,
) -> Result<IssueComment> {
    for (id, superseded) in superseded_updates(api, pr, marker)? {
        debug!(comment_id = id, "Marking comment as superseded");
        api.update_comment(pr, id, &superseded)?;
    }

    let created = api.create_comment(pr, body)?;
    info!(comment_id = created.id, pull_request = %pr, "Posted comment");
    Ok(created)
}

/// Compute the updates `post_comment` would make, without making them
pub fn superseded_updates(
    api: &dyn CommentApi,
    pr: &PullRequestRef,
    marker: &str,
) -> Result<Vec<(u64, String)>> {
    let comments = api.list_comments(pr, COMMENTS_PER_PAGE)?;
    debug!(count = comments.len(), pull_request = %pr, "Listed existing comments");
    if comments.len() >= usize::from(COMMENTS_PER_PAGE) {
        warn!(
            pull_request = %pr,
            "Only the first {} comments were checked for earlier results",
            COMMENTS_PER_PAGE
        );
    }

    Ok(comments
        .iter()
        .filter_map(|comment| {
            let old = comment.body.as_deref()?;
            if !old.contains(marker) || is_superseded(old) {
                return None;
            }
            Some((comment.id, supersede_body(marker, old)))
        })
        .collect())
}

/// Wrap an earlier comment body in a collapsed "Superseded" block
pub fn supersede_body(marker: &str, old_body: &str) -> String {
    format!(
        "{}\n<details><summary>{} — A newer run has replaced this result.</summary>\n\n{}\n\n</details>\n",
        marker,
        SUPERSEDED_MARKER,
        old_body.replacen(marker, "", 1).trim()
    )
}

fn is_superseded(body: &str) -> bool {
    body.contains(SUPERSEDED_MARKER) || body.contains(SUPERSEDED_MARKER_MARKDOWN)
}
