//! Markdown builders for pull request comments
//!
//! Each builder returns an empty string when it has nothing to show, so the
//! full comment is a plain concatenation of sections.

use crate::plan::{self, Deprecation, PlanSummary, ResourceAction};

use super::types::{CommentOptions, StepOutcome};

/// Longest raw output kept in a collapsible block, in characters
pub const MAX_OUTPUT_CHARS: usize = 55_000;

const TRUNCATION_NOTICE: &str = "... (truncated)";

const NO_CHANGES_CALLOUT: &str =
    "> ✅ **No changes.** Your infrastructure matches the configuration.\n\n";

/// Build the add/change/destroy counts table
pub fn build_summary_table(summary: Option<&PlanSummary>) -> String {
    let Some(summary) = summary else {
        return String::new();
    };

    if summary.is_empty() {
        return NO_CHANGES_CALLOUT.to_string();
    }

    let mut table = String::from("| | Count |\n|:--|--:|\n");

    let rows = [
        ("➕ Add", summary.add),
        ("🔄 Change", summary.change),
        ("➖ Destroy", summary.destroy),
    ];
    for (label, count) in rows {
        if count > 0 {
            table.push_str(&format!("| {} | {} |\n", label, count));
        }
    }

    table.push('\n');
    table
}

/// Build the collapsible per-resource table
pub fn build_resource_table(resources: &[ResourceAction]) -> String {
    if resources.is_empty() {
        return String::new();
    }

    let mut table = String::from("<details><summary>📋 Resource Details</summary>\n\n");
    table.push_str("| Action | Resource |\n|:--|:--|\n");

    for resource in resources {
        table.push_str(&format!(
            "| {} {} | `{}` |\n",
            resource.emoji(),
            resource.action.label(),
            escape_cell(&resource.resource)
        ));
    }

    table.push_str("\n</details>\n\n");
    table
}

/// Build the deprecation callout and its collapsible table
pub fn build_deprecation_section(deprecations: &[Deprecation]) -> String {
    if deprecations.is_empty() {
        return String::new();
    }

    let count = deprecations.len();
    let mut section = format!(
        "> ⚠️ **{} Deprecation {}** found. Update the configuration before these are removed.\n\n",
        count,
        if count == 1 { "Warning" } else { "Warnings" }
    );

    section.push_str("<details><summary>📜 Deprecation Details</summary>\n\n");
    section.push_str("| Warning | Detail |\n|:--|:--|\n");

    for deprecation in deprecations {
        let detail = if deprecation.detail.is_empty() {
            "—".to_string()
        } else {
            escape_cell(&deprecation.detail)
        };
        section.push_str(&format!(
            "| {} | {} |\n",
            escape_cell(&deprecation.title),
            detail
        ));
    }

    section.push_str("\n</details>\n\n");
    section
}

/// Wrap raw command output in a collapsible code block.
///
/// Output longer than [`MAX_OUTPUT_CHARS`] keeps only its tail.
pub fn build_collapsible_output(title: &str, output: &str, lang: &str) -> String {
    let cleaned = plan::strip_ansi(output);
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let total = trimmed.chars().count();
    let body = if total > MAX_OUTPUT_CHARS {
        let start = trimmed
            .char_indices()
            .nth(total - MAX_OUTPUT_CHARS)
            .map(|(index, _)| index)
            .unwrap_or(0);
        format!("{}\n{}", TRUNCATION_NOTICE, &trimmed[start..])
    } else {
        trimmed.to_string()
    };

    format!(
        "<details><summary>{}</summary>\n\n```{}\n{}\n```\n\n</details>\n\n",
        title, lang, body
    )
}

/// Derive a display environment from a var-file path.
///
/// "tfvars/dev.tfvars" becomes "dev"; the suffix match ignores case.
pub fn derive_environment(var_file: &str) -> String {
    if var_file.is_empty() {
        return String::new();
    }

    let normalized = var_file.replace('\\', "/");
    let basename = normalized.rsplit('/').next().unwrap_or("");

    const SUFFIX: &str = ".tfvars";
    let split = basename.len().saturating_sub(SUFFIX.len());
    match basename.get(split..) {
        Some(tail) if basename.len() >= SUFFIX.len() && tail.eq_ignore_ascii_case(SUFFIX) => {
            basename[..split].to_string()
        }
        _ => basename.to_string(),
    }
}

/// Assemble the full comment document
pub fn build_comment(opts: &CommentOptions) -> String {
    let workspace = match opts.workspace.as_deref() {
        Some(ws) if !ws.is_empty() => format!(" ({})", ws),
        _ => String::new(),
    };

    let mut body = format!("{}\n", opts.marker);
    body.push_str(&format!("### {}{}\n\n", opts.title, workspace));

    if let Some(environment) = opts.environment.as_deref().filter(|e| !e.is_empty()) {
        body.push_str(&format!("> 🌍 **Environment:** `{}`\n\n", environment));
    }

    if let Some(validate) = reportable(&opts.validate) {
        body.push_str(&build_validate_section(validate));
    }

    if let Some(plan) = reportable(&opts.plan) {
        body.push_str(&build_plan_section(plan));
    }

    if let Some(apply) = reportable(&opts.apply) {
        body.push_str(&build_apply_section(apply));
    }

    body
}

fn reportable(step: &Option<StepOutcome>) -> Option<&StepOutcome> {
    step.as_ref().filter(|s| s.outcome.is_reportable())
}

fn build_validate_section(step: &StepOutcome) -> String {
    let status = if step.succeeded() { "Passed" } else { "Failed" };
    let mut section = format!("**{} Validate** — {}\n\n", step.icon(), status);

    if !step.succeeded() {
        section.push_str(&build_collapsible_output(
            "Validation Output",
            &step.combined_output(),
            "",
        ));
    }

    section
}

fn build_plan_section(step: &StepOutcome) -> String {
    let output = step.combined_output();
    let mut section = String::new();

    if step.succeeded() {
        let parsed = plan::parse_output(&output);

        section.push_str(&format!("**{} Plan**\n\n", step.icon()));

        let destroy = parsed.summary.map(|s| s.destroy).unwrap_or(0);
        section.push_str(&build_destructive_callout(destroy, parsed.replace_count()));
        section.push_str(&build_summary_table(parsed.summary.as_ref()));
        section.push_str(&build_resource_table(&parsed.resources));
        section.push_str(&build_deprecation_section(&parsed.deprecations));
    } else {
        section.push_str(&format!("**{} Plan** — Failed\n\n", step.icon()));
    }

    section.push_str(&build_collapsible_output("Full Plan Output", &output, "hcl"));
    section
}

fn build_apply_section(step: &StepOutcome) -> String {
    let status = if step.succeeded() { "Succeeded" } else { "Failed" };
    let mut section = format!("**{} Apply** — {}\n\n", step.icon(), status);
    section.push_str(&build_collapsible_output(
        "Apply Output",
        &step.combined_output(),
        "",
    ));
    section
}

/// Warning shown above the tables when anything is destroyed or replaced
fn build_destructive_callout(destroy: u64, replace: u64) -> String {
    if destroy == 0 && replace == 0 {
        return String::new();
    }

    let mut parts = Vec::new();
    if destroy > 0 {
        parts.push(format!("{} will be destroyed", resources_phrase(destroy)));
    }
    if replace > 0 {
        parts.push(format!(
            "{} will be replaced (destroy + recreate)",
            resources_phrase(replace)
        ));
    }

    format!(
        "> ⚠️ **Destructive Changes:** {}. Review carefully before merging.\n\n",
        parts.join(" and ")
    )
}

fn resources_phrase(count: u64) -> String {
    if count == 1 {
        "1 resource".to_string()
    } else {
        format!("{} resources", count)
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
