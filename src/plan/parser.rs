//! Text parsers for Terraform/OpenTofu command output
//!
//! Every function here strips ANSI escape sequences before matching and never
//! fails: unrecognized text yields `None` or an empty list.

use lazy_static::lazy_static;
use regex::Regex;

use super::types::{ActionKind, Deprecation, ParsedOutput, PlanSummary, ResourceAction};

lazy_static! {
    // CSI sequences such as ESC[0m, ESC[1;32m, ESC[2K
    static ref ANSI_PATTERN: Regex =
        Regex::new(r"\x1B\[[0-9;]*[a-zA-Z]").expect("Invalid ANSI pattern regex");

    // Plan: 3 to add, 2 to change, 1 to destroy.
    static ref SUMMARY_PATTERN: Regex =
        Regex::new(r"Plan:\s*(\d+)\s*to add,\s*(\d+)\s*to change,\s*(\d+)\s*to destroy")
            .expect("Invalid summary pattern regex");

    static ref NO_CHANGES_PATTERN: Regex =
        Regex::new(r"(?i)No changes\.").expect("Invalid no-changes pattern regex");

    //   # aws_instance.example will be created
    //   # module.vpc.aws_subnet.main must be replaced
    static ref RESOURCE_PATTERN: Regex = Regex::new(
        r"(?m)^[ \t]*#\s+(\S+)\s+(?:will be|must be)\s+(created|updated in-place|destroyed|replaced|read during apply)",
    )
    .expect("Invalid resource pattern regex");
}

const WARNING_PREFIX: &str = "Warning:";

/// Remove ANSI escape sequences.
///
/// Removal repeats until nothing matches, so the result never contains a
/// sequence that only appeared after an inner one was removed.
pub fn strip_ansi(text: &str) -> String {
    let mut cleaned = text.to_string();

    loop {
        let next = ANSI_PATTERN.replace_all(&cleaned, "");
        if next.len() == cleaned.len() {
            return cleaned;
        }
        cleaned = next.into_owned();
    }
}

/// Parse the plan summary line.
///
/// Returns `None` when the text has neither a "Plan:" line nor a
/// "No changes." marker, which is different from a zero summary.
pub fn parse_plan_summary(text: &str) -> Option<PlanSummary> {
    let cleaned = strip_ansi(text);

    if let Some(caps) = SUMMARY_PATTERN.captures(&cleaned) {
        let count = |index: usize| caps.get(index).and_then(|m| m.as_str().parse::<u64>().ok());

        if let (Some(add), Some(change), Some(destroy)) = (count(1), count(2), count(3)) {
            return Some(PlanSummary {
                add,
                change,
                destroy,
                no_changes: false,
            });
        }
    }

    if NO_CHANGES_PATTERN.is_match(&cleaned) {
        return Some(PlanSummary::unchanged());
    }

    None
}

/// Collect per-resource action lines in order of appearance.
///
/// Duplicated addresses are kept as separate entries.
pub fn parse_resource_actions(text: &str) -> Vec<ResourceAction> {
    let cleaned = strip_ansi(text);

    RESOURCE_PATTERN
        .captures_iter(&cleaned)
        .filter_map(|caps| {
            let resource = caps.get(1)?.as_str();
            let phrase = caps.get(2)?.as_str();
            Some(ResourceAction::new(resource, ActionKind::from_phrase(phrase)))
        })
        .collect()
}

/// Collect "Warning:" blocks whose title mentions a deprecation.
///
/// A block starts at a line beginning with "Warning:" and runs until the next
/// such line. Terraform's `│` diagnostic border is tolerated in front of
/// every line, and a closing `╵` border also ends the block.
pub fn parse_deprecations(text: &str) -> Vec<Deprecation> {
    let cleaned = strip_ansi(text);

    let mut blocks: Vec<Vec<&str>> = Vec::new();
    let mut open = false;
    for line in cleaned.lines() {
        let content = unframe(line);
        if content.starts_with(WARNING_PREFIX) {
            blocks.push(vec![content]);
            open = true;
        } else if line.trim_start().starts_with('╵') {
            // closing border of a framed diagnostic
            open = false;
        } else if open && let Some(block) = blocks.last_mut() {
            block.push(content);
        }
    }

    blocks
        .into_iter()
        .filter_map(|block| {
            let (first, rest) = block.split_first()?;
            let title = first[WARNING_PREFIX.len()..].trim();

            if !title.to_lowercase().contains("deprecat") {
                return None;
            }

            let detail = rest
                .iter()
                .map(|line| line.trim())
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join(" ");

            Some(Deprecation {
                title: title.to_string(),
                detail,
            })
        })
        .collect()
}

/// Run every parser over the same text
pub fn parse_output(text: &str) -> ParsedOutput {
    ParsedOutput {
        summary: parse_plan_summary(text),
        resources: parse_resource_actions(text),
        deprecations: parse_deprecations(text),
    }
}

/// Strip leading whitespace and the diagnostic box glyphs from a line
fn unframe(line: &str) -> &str {
    line.trim_start()
        .trim_start_matches(['│', '╷', '╵'])
        .trim_start()
}
