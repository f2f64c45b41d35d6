//! Workflow transitions: condition-gated edges
//!
//! Transitions connect steps in the workflow graph. A transition may
//! carry a Condition; the engine consults a pluggable evaluator before
//! offering the target step. Fork/join flags mark parallel branches and
//! are only legal around gateway steps.

use crate::StepId;
use serde::{Deserialize, Serialize};

/// An edge in the workflow graph
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Optional human-readable label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Source step
    pub source: StepId,
    /// Target step
    pub target: StepId,
    /// Guard; `None` is always satisfied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    /// Starts parallel branches (source must be a gateway)
    #[serde(default)]
    pub is_parallel_fork: bool,
    /// Merges parallel branches (target must be a gateway)
    #[serde(default)]
    pub is_parallel_join: bool,
}

impl Transition {
    /// Create an unconditional transition
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: None,
            source: StepId::new(source),
            target: StepId::new(target),
            condition: None,
            is_parallel_fork: false,
            is_parallel_join: false,
        }
    }

    /// Create a transition guarded by a condition
    pub fn conditional(
        source: impl Into<String>,
        target: impl Into<String>,
        condition: Condition,
    ) -> Self {
        Self::new(source, target).with_condition(condition)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Mark as a parallel fork
    pub fn fork(mut self) -> Self {
        self.is_parallel_fork = true;
        self
    }

    /// Mark as a parallel join
    pub fn join(mut self) -> Self {
        self.is_parallel_join = true;
        self
    }

    /// Check if this transition has no guard
    pub fn is_unconditional(&self) -> bool {
        self.condition.is_none()
    }
}

/// A deferred predicate attached to a transition.
///
/// The expression is opaque to the data model; `kind` only tags which
/// rule language it is written in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// The expression text
    pub expr: String,
    /// The rule language tag
    #[serde(default)]
    pub kind: ConditionKind,
}

impl Condition {
    /// Create a JsonLogic condition
    pub fn new(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            kind: ConditionKind::JsonLogic,
        }
    }

    /// Create a plain expression condition
    pub fn expr(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            kind: ConditionKind::Expr,
        }
    }

    pub fn with_kind(mut self, kind: ConditionKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Tag naming the language a condition is written in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionKind {
    #[default]
    #[serde(rename = "jsonlogic")]
    JsonLogic,
    #[serde(rename = "expr")]
    Expr,
}

impl ConditionKind {
    /// Map free-form text onto a kind; anything but `expr` is JsonLogic.
    pub fn parse_lenient(text: &str) -> Self {
        if text.trim().eq_ignore_ascii_case("expr") {
            Self::Expr
        } else {
            Self::JsonLogic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JsonLogic => "jsonlogic",
            Self::Expr => "expr",
        }
    }
}

impl std::fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
