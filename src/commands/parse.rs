use anyhow::{Context as AnyhowContext, Result};
use clap::ValueEnum;
use std::path::Path;
use tracing::debug;

use super::render::RenderCommand;
use crate::comment::{build_deprecation_section, build_resource_table, build_summary_table};
use crate::context::Context;
use crate::plan::{ActionKind, ParsedOutput, parse_output};

/// How `parse` presents its results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ParseFormat {
    /// Styled terminal summary
    #[default]
    Text,
    /// Machine-readable JSON on stdout
    Json,
    /// The markdown tables used in comments, on stdout
    Markdown,
}

/// Handles the 'parse' command - extracts facts from a saved plan output
pub struct ParseCommand;

impl ParseCommand {
    /// Execute the parse command
    pub fn execute(ctx: &Context, file: &Path, format: ParseFormat) -> Result<()> {
        let text = ctx.fs.read_to_string(file)?;
        let parsed = parse_output(&text);
        debug!(
            resources = parsed.resources.len(),
            deprecations = parsed.deprecations.len(),
            "Parsed plan output"
        );

        match format {
            ParseFormat::Text => Self::print_text(ctx, &parsed),
            ParseFormat::Json => RenderCommand::print(&format!("{}\n", Self::to_json(&parsed)?)),
            ParseFormat::Markdown => RenderCommand::print(&Self::to_markdown(&parsed)),
        }

        Ok(())
    }

    fn to_json(parsed: &ParsedOutput) -> Result<String> {
        serde_json::to_string_pretty(parsed).context("Failed to serialize parsed output")
    }

    fn to_markdown(parsed: &ParsedOutput) -> String {
        format!(
            "{}{}{}",
            build_summary_table(parsed.summary.as_ref()),
            build_resource_table(&parsed.resources),
            build_deprecation_section(&parsed.deprecations)
        )
    }

    fn print_text(ctx: &Context, parsed: &ParsedOutput) {
        ctx.output.section("Plan Summary");
        match &parsed.summary {
            None => ctx.output.warning("No plan summary found in output"),
            Some(summary) if summary.is_empty() => ctx.output.success("No changes"),
            Some(summary) => {
                ctx.output.key_value("Add", &summary.add.to_string());
                ctx.output.key_value("Change", &summary.change.to_string());
                ctx.output.key_value("Destroy", &summary.destroy.to_string());
            }
        }

        if !parsed.resources.is_empty() {
            ctx.output.section("Resources");
            for resource in &parsed.resources {
                let destructive = matches!(resource.action, ActionKind::Destroy | ActionKind::Replace);
                ctx.output.action(
                    resource.emoji(),
                    resource.action.label(),
                    &resource.resource,
                    destructive,
                );
            }
        }

        if !parsed.deprecations.is_empty() {
            ctx.output.section("Deprecations");
            for deprecation in &parsed.deprecations {
                ctx.output.warning(&deprecation.title);
                if !deprecation.detail.is_empty() {
                    ctx.output.dimmed(&format!("  {}", deprecation.detail));
                }
            }
        }

        ctx.output.blank();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{FileSystem, MockFileSystem, MockOutput, OutputMessage};
    use std::sync::Arc;

    const PLAN: &str = "\
  # aws_instance.web must be replaced
  # aws_s3_bucket.assets will be created

Warning: Argument is deprecated

Use the aws_s3_bucket_acl resource instead.

Plan: 2 to add, 0 to change, 1 to destroy.
";

    fn context(contents: &str) -> (Context, Arc<MockOutput>) {
        let fs = MockFileSystem::new();
        fs.write(Path::new("plan.txt"), contents).unwrap();
        let output = Arc::new(MockOutput::new());
        (Context::test_with(Arc::new(fs), output.clone()), output)
    }

    #[test]
    fn test_text_output() {
        let (ctx, output) = context(PLAN);
        ParseCommand::execute(&ctx, Path::new("plan.txt"), ParseFormat::Text).unwrap();

        let messages = output.get_messages();
        assert!(messages.contains(&OutputMessage::KeyValue("Add".to_string(), "2".to_string())));
        assert!(messages.contains(&OutputMessage::Action(
            "Replace".to_string(),
            "aws_instance.web".to_string()
        )));
        assert!(messages.contains(&OutputMessage::Warning(
            "Argument is deprecated".to_string()
        )));
    }

    #[test]
    fn test_text_output_without_summary() {
        let (ctx, output) = context("Error: Missing required argument");
        ParseCommand::execute(&ctx, Path::new("plan.txt"), ParseFormat::Text).unwrap();

        assert!(output.contains_message(&OutputMessage::Warning(
            "No plan summary found in output".to_string()
        )));
    }

    #[test]
    fn test_json_output() {
        let json = ParseCommand::to_json(&parse_output(PLAN)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["summary"]["add"], 2);
        assert_eq!(value["summary"]["no_changes"], false);
        assert_eq!(value["resources"][0]["action"], "Replace");
        assert_eq!(value["resources"][1]["resource"], "aws_s3_bucket.assets");
        assert_eq!(value["deprecations"][0]["title"], "Argument is deprecated");
    }

    #[test]
    fn test_json_output_absent_summary_is_null() {
        let json = ParseCommand::to_json(&parse_output("nothing here")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["summary"].is_null());
        assert_eq!(value["resources"], serde_json::json!([]));
    }

    #[test]
    fn test_markdown_output() {
        let markdown = ParseCommand::to_markdown(&parse_output(PLAN));
        assert!(markdown.contains("| ➕ Add | 2 |"));
        assert!(markdown.contains("| ♻️ Replace | `aws_instance.web` |"));
        assert!(markdown.contains("**1 Deprecation Warning**"));
    }

    #[test]
    fn test_missing_file() {
        let ctx = Context::test();
        assert!(ParseCommand::execute(&ctx, Path::new("nope.txt"), ParseFormat::Json).is_err());
    }
}
