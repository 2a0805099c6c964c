use anyhow::Result;
use std::path::Path;
use tracing::info;

use super::inputs::{CommentArgs, report_failures};
use crate::comment::build_comment;
use crate::context::Context;

/// Handles the 'render' command - builds the comment without publishing it
pub struct RenderCommand;

impl RenderCommand {
    /// Execute the render command
    pub fn execute(ctx: &Context, args: &CommentArgs, output_file: Option<&Path>) -> Result<()> {
        let document = Self::render(ctx, args)?;

        match output_file {
            Some(path) => {
                ctx.fs.write(path, &document)?;
                info!(path = %path.display(), bytes = document.len(), "Comment written");
                ctx.output
                    .success(&format!("Comment written to: {}", path.display()));
            }
            None => Self::print(&document),
        }

        Ok(())
    }

    /// Write a document to stdout unchanged
    pub fn print(document: &str) {
        print!("{}", document);
    }

    /// Build the comment document from the given arguments
    pub fn render(ctx: &Context, args: &CommentArgs) -> Result<String> {
        let config = args.load_config(ctx)?;
        let options = args.to_options(ctx, &config)?;
        report_failures(ctx, &options);
        Ok(build_comment(&options))
    }
}
