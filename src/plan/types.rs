//! Data types extracted from Terraform command output
//!
//! All of these are derived from a single chunk of output text and are never
//! mutated afterwards.

use serde::Serialize;

/// Counts from the "Plan: N to add, N to change, N to destroy" line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    /// Number of resources to add
    pub add: u64,

    /// Number of resources to change in place
    pub change: u64,

    /// Number of resources to destroy
    pub destroy: u64,

    /// Set when the output reported "No changes."
    pub no_changes: bool,
}

impl PlanSummary {
    /// Summary for a plan that reported "No changes."
    pub fn unchanged() -> Self {
        Self {
            no_changes: true,
            ..Self::default()
        }
    }

    /// True when the plan reported no changes or every count is zero
    pub fn is_empty(&self) -> bool {
        self.no_changes || (self.add == 0 && self.change == 0 && self.destroy == 0)
    }
}

/// Kind of action Terraform announced for a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// "will be created"
    Create,
    /// "will be updated in-place"
    Update,
    /// "will be destroyed"
    Destroy,
    /// "must be replaced"
    Replace,
    /// "will be read during apply"
    Read,
    /// Any verb phrase missing from the lookup table, kept verbatim
    Unknown(String),
}

/// Verb phrase -> action lookup; anything else becomes `ActionKind::Unknown`
const ACTION_TABLE: &[(&str, ActionKind)] = &[
    ("created", ActionKind::Create),
    ("updated in-place", ActionKind::Update),
    ("destroyed", ActionKind::Destroy),
    ("replaced", ActionKind::Replace),
    ("read during apply", ActionKind::Read),
];

impl ActionKind {
    /// Map a matched verb phrase to its action
    pub fn from_phrase(phrase: &str) -> Self {
        ACTION_TABLE
            .iter()
            .find(|(known, _)| *known == phrase)
            .map(|(_, kind)| kind.clone())
            .unwrap_or_else(|| ActionKind::Unknown(phrase.to_string()))
    }

    /// Display label used in comment tables
    pub fn label(&self) -> &str {
        match self {
            ActionKind::Create => "Create",
            ActionKind::Update => "Update",
            ActionKind::Destroy => "Destroy",
            ActionKind::Replace => "Replace",
            ActionKind::Read => "Read",
            ActionKind::Unknown(raw) => raw,
        }
    }

    /// Emoji shown next to the label
    pub fn emoji(&self) -> &'static str {
        match self {
            ActionKind::Create => "➕",
            ActionKind::Update => "🔄",
            ActionKind::Destroy => "➖",
            ActionKind::Replace => "♻️",
            ActionKind::Read => "📖",
            ActionKind::Unknown(_) => "❓",
        }
    }
}

impl Serialize for ActionKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One "# <address> will be ..." line from plan output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceAction {
    /// Resource address (e.g., "module.vpc.aws_subnet.main")
    pub resource: String,

    /// Announced action
    pub action: ActionKind,
}

impl ResourceAction {
    pub fn new(resource: &str, action: ActionKind) -> Self {
        Self {
            resource: resource.to_string(),
            action,
        }
    }

    pub fn emoji(&self) -> &'static str {
        self.action.emoji()
    }
}

/// A "Warning:" diagnostic whose title mentions a deprecation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deprecation {
    /// Text after "Warning:" on the first line
    pub title: String,

    /// Remaining non-blank lines, trimmed and space-joined
    pub detail: String,
}

/// Everything the parser can extract from one chunk of output
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedOutput {
    pub summary: Option<PlanSummary>,
    pub resources: Vec<ResourceAction>,
    pub deprecations: Vec<Deprecation>,
}

impl ParsedOutput {
    /// Number of resources announced as "must be replaced"
    pub fn replace_count(&self) -> u64 {
        self.resources
            .iter()
            .filter(|r| r.action == ActionKind::Replace)
            .count() as u64
    }
}
