//! Command-line inputs shared by `render` and `post`

use anyhow::{Context as AnyhowContext, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::comment::{CommentOptions, Outcome, StepOutcome, default_marker, derive_environment};
use crate::config::CommentConfig;
use crate::context::Context;

pub const DEFAULT_TITLE: &str = "Terraform Plan";

/// Comment heading, labels and the per-step results to report
#[derive(Args, Debug, Clone, Default)]
pub struct CommentArgs {
    /// Comment heading (defaults to "Terraform Plan")
    #[arg(long, env = "TF_COMMENT_TITLE")]
    pub title: Option<String>,

    /// Workspace shown after the heading
    #[arg(long, env = "TF_WORKSPACE")]
    pub workspace: Option<String>,

    /// Var-file path; its file name (minus .tfvars) is shown as the environment
    #[arg(long, env = "TF_COMMENT_VAR_FILE")]
    pub var_file: Option<String>,

    /// Hidden marker identifying comments from this workflow
    #[arg(long, env = "TF_COMMENT_MARKER")]
    pub marker: Option<String>,

    /// Workflow name used in the default marker
    #[arg(long, env = "GITHUB_WORKFLOW", default_value = "local")]
    pub workflow: String,

    /// YAML configuration file (defaults to .tfcomment.yaml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Outcome of the validate step (success, failure, skipped, ...)
    #[arg(long, env = "TF_VALIDATE_OUTCOME")]
    pub validate_outcome: Option<String>,

    /// Exit code of the validate step
    #[arg(long, env = "TF_VALIDATE_EXITCODE")]
    pub validate_exitcode: Option<String>,

    /// File holding the validate step's stdout
    #[arg(long, env = "TF_VALIDATE_STDOUT")]
    pub validate_stdout: Option<PathBuf>,

    /// File holding the validate step's stderr
    #[arg(long, env = "TF_VALIDATE_STDERR")]
    pub validate_stderr: Option<PathBuf>,

    /// Outcome of the plan step
    #[arg(long, env = "TF_PLAN_OUTCOME")]
    pub plan_outcome: Option<String>,

    /// Exit code of the plan step
    #[arg(long, env = "TF_PLAN_EXITCODE")]
    pub plan_exitcode: Option<String>,

    /// File holding the plan step's stdout
    #[arg(long, env = "TF_PLAN_STDOUT")]
    pub plan_stdout: Option<PathBuf>,

    /// File holding the plan step's stderr
    #[arg(long, env = "TF_PLAN_STDERR")]
    pub plan_stderr: Option<PathBuf>,

    /// Outcome of the apply step
    #[arg(long, env = "TF_APPLY_OUTCOME")]
    pub apply_outcome: Option<String>,

    /// Exit code of the apply step
    #[arg(long, env = "TF_APPLY_EXITCODE")]
    pub apply_exitcode: Option<String>,

    /// File holding the apply step's stdout
    #[arg(long, env = "TF_APPLY_STDOUT")]
    pub apply_stdout: Option<PathBuf>,

    /// File holding the apply step's stderr
    #[arg(long, env = "TF_APPLY_STDERR")]
    pub apply_stderr: Option<PathBuf>,
}

/// Where and how to publish on GitHub
#[derive(Args, Debug, Clone, Default)]
pub struct GitHubArgs {
    /// API token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repo: Option<String>,

    /// Pull request number (read from the event payload when omitted)
    #[arg(long)]
    pub pr: Option<u64>,

    /// Path to the Actions event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// REST API base URL
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,
}

/// One lifecycle step as given on the command line
struct StepInput<'a> {
    name: &'static str,
    outcome: Option<&'a str>,
    exitcode: Option<&'a str>,
    stdout: Option<&'a Path>,
    stderr: Option<&'a Path>,
}

impl CommentArgs {
    /// Load the configuration file these arguments point at
    pub fn load_config(&self, ctx: &Context) -> Result<CommentConfig> {
        CommentConfig::load(&*ctx.fs, self.config.as_deref())
    }

    /// Merge arguments with configuration and read the step output files
    pub fn to_options(&self, ctx: &Context, config: &CommentConfig) -> Result<CommentOptions> {
        let title = pick(&self.title, &config.title).unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let workspace = pick(&self.workspace, &config.workspace);
        let environment = pick(&self.var_file, &config.var_file)
            .map(|var_file| derive_environment(&var_file))
            .filter(|env| !env.is_empty());

        let marker = pick(&self.marker, &config.marker).unwrap_or_else(|| {
            default_marker(
                &self.workflow,
                &title,
                workspace.as_deref(),
                environment.as_deref(),
            )
        });
        debug!(%marker, "Using comment marker");

        Ok(CommentOptions {
            marker,
            title,
            workspace,
            environment,
            validate: read_step(ctx, self.validate_input())?,
            plan: read_step(ctx, self.plan_input())?,
            apply: read_step(ctx, self.apply_input())?,
        })
    }

    fn validate_input(&self) -> StepInput<'_> {
        StepInput {
            name: "validate",
            outcome: self.validate_outcome.as_deref(),
            exitcode: self.validate_exitcode.as_deref(),
            stdout: self.validate_stdout.as_deref(),
            stderr: self.validate_stderr.as_deref(),
        }
    }

    fn plan_input(&self) -> StepInput<'_> {
        StepInput {
            name: "plan",
            outcome: self.plan_outcome.as_deref(),
            exitcode: self.plan_exitcode.as_deref(),
            stdout: self.plan_stdout.as_deref(),
            stderr: self.plan_stderr.as_deref(),
        }
    }

    fn apply_input(&self) -> StepInput<'_> {
        StepInput {
            name: "apply",
            outcome: self.apply_outcome.as_deref(),
            exitcode: self.apply_exitcode.as_deref(),
            stdout: self.apply_stdout.as_deref(),
            stderr: self.apply_stderr.as_deref(),
        }
    }
}

/// Non-empty command-line value, else non-empty config value
fn pick(arg: &Option<String>, config: &Option<String>) -> Option<String> {
    arg.iter()
        .chain(config.iter())
        .find(|value| !value.trim().is_empty())
        .cloned()
}

/// Build a step outcome, reading output files only for steps that ran
fn read_step(ctx: &Context, input: StepInput<'_>) -> Result<Option<StepOutcome>> {
    let Some(raw_outcome) = input.outcome.filter(|o| !o.trim().is_empty()) else {
        return Ok(None);
    };

    let outcome: Outcome = raw_outcome.parse()?;
    debug!(step = input.name, %outcome, exitcode = ?input.exitcode, "Step result");

    let step = StepOutcome::new(outcome, input.exitcode.unwrap_or("").trim());
    if !step.outcome.is_reportable() {
        return Ok(Some(step));
    }

    let stdout = read_output(ctx, input.stdout, input.name, "stdout")?;
    let stderr = read_output(ctx, input.stderr, input.name, "stderr")?;

    Ok(Some(step.with_stdout(&stdout).with_stderr(&stderr)))
}

fn read_output(ctx: &Context, path: Option<&Path>, step: &str, stream: &str) -> Result<String> {
    let Some(path) = path else {
        return Ok(String::new());
    };
    ctx.fs
        .read_to_string(path)
        .with_context(|| format!("Failed to read {} {}", step, stream))
}

/// Report failed steps on the terminal; the comment is still produced
pub fn report_failures(ctx: &Context, options: &CommentOptions) {
    let steps = [
        ("Validate", &options.validate),
        ("Plan", &options.plan),
        ("Apply", &options.apply),
    ];
    for (name, step) in steps {
        if let Some(step) = step
            && step.outcome.is_reportable()
            && !step.succeeded()
        {
            ctx.output
                .error(&format!("{} failed (exit code {:?})", name, step.exitcode));
        }
    }
}
