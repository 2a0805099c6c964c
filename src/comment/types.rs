//! Inputs for rendering a pull request comment

use std::fmt;
use std::str::FromStr;

/// Outcome reported by the CI runner for a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
    Skipped,
    /// Anything else the runner reported (e.g., "cancelled")
    Other(String),
}

impl Outcome {
    /// Only steps that actually ran get a section in the comment
    pub fn is_reportable(&self) -> bool {
        matches!(self, Outcome::Success | Outcome::Failure)
    }
}

impl FromStr for Outcome {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "success" => Outcome::Success,
            "failure" => Outcome::Failure,
            "skipped" => Outcome::Skipped,
            other => Outcome::Other(other.to_string()),
        })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::Failure => write!(f, "failure"),
            Outcome::Skipped => write!(f, "skipped"),
            Outcome::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// Captured result of one lifecycle step (validate, plan or apply)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub stdout: String,
    pub stderr: String,

    /// Exit code as reported by the runner; only the literal "0" means success
    pub exitcode: String,

    pub outcome: Outcome,
}

impl StepOutcome {
    pub fn new(outcome: Outcome, exitcode: &str) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            exitcode: exitcode.to_string(),
            outcome,
        }
    }

    pub fn with_stdout(mut self, stdout: &str) -> Self {
        self.stdout = stdout.to_string();
        self
    }

    pub fn with_stderr(mut self, stderr: &str) -> Self {
        self.stderr = stderr.to_string();
        self
    }

    /// True when the exit code is exactly "0"
    pub fn succeeded(&self) -> bool {
        self.exitcode == "0"
    }

    /// stdout followed by stderr
    pub fn combined_output(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }

    /// Pass/fail icon for the section heading
    pub fn icon(&self) -> &'static str {
        if self.succeeded() { "✅" } else { "❌" }
    }
}

/// Everything needed to render one comment
#[derive(Debug, Clone, Default)]
pub struct CommentOptions {
    /// Hidden marker placed on the first line, used to find earlier comments
    pub marker: String,

    /// Heading text, e.g. "Terraform Plan"
    pub title: String,

    /// Optional workspace shown in parentheses after the title
    pub workspace: Option<String>,

    /// Optional environment label (usually derived from the var-file)
    pub environment: Option<String>,

    pub validate: Option<StepOutcome>,
    pub plan: Option<StepOutcome>,
    pub apply: Option<StepOutcome>,
}
