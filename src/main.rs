mod comment;
mod commands;
mod config;
mod context;
mod github;
mod output;
mod plan;
mod traits;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{CommentArgs, GitHubArgs, ParseCommand, ParseFormat, PostCommand, RenderCommand};
use context::Context;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tfcomment")]
#[command(about = "Turn Terraform plan/apply output into pull request comments", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the comment and print it
    Render {
        #[command(flatten)]
        comment: CommentArgs,

        /// Write the comment to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render the comment and post it on the pull request, superseding earlier ones
    Post {
        #[command(flatten)]
        comment: CommentArgs,

        #[command(flatten)]
        github: GitHubArgs,

        /// Only list the comments that would be superseded and print the document
        #[arg(long)]
        dry_run: bool,
    },

    /// Parse a saved plan output and show what was found
    Parse {
        /// File holding plan output
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ParseFormat::Text)]
        format: ParseFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let ctx = Context::new();

    match cli.command {
        Commands::Render { comment, output } => {
            RenderCommand::execute(&ctx, &comment, output.as_deref())?;
        }
        Commands::Post {
            comment,
            github,
            dry_run,
        } => {
            PostCommand::execute(&ctx, &comment, &github, dry_run)?;
        }
        Commands::Parse { file, format } => {
            ParseCommand::execute(&ctx, &file, format)?;
        }
    }

    Ok(())
}

/// Log to stderr; RUST_LOG takes precedence over --verbose
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
