//! Change plans and the lifecycle steps that carry them out.

use serde::Serialize;

use crate::error::Operation;
use crate::resource::{Field, UPDATE_TRACKED};

use super::diff::{ChangeKind, FieldChange};

/// The classified change for one association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangePlan {
    /// Overall kind of change.
    pub kind: ChangeKind,
    /// Fields that differ, in schema order.
    pub changes: Vec<FieldChange>,
}

/// Serializable summary of a plan, for JSON output.
#[derive(Debug, Serialize)]
pub struct PlanSummary {
    /// Kind of change.
    pub kind: String,
    /// Lifecycle steps, in execution order.
    pub steps: Vec<String>,
    /// Differing fields.
    pub changes: Vec<ChangeSummary>,
}

/// Serializable summary of one field change.
#[derive(Debug, Serialize)]
pub struct ChangeSummary {
    /// Field name.
    pub field: Field,
    /// Prior value.
    pub old: Option<String>,
    /// Desired value.
    pub new: Option<String>,
    /// Whether the change forces replacement.
    pub forces_replacement: bool,
}

impl ChangePlan {
    /// Creates a plan.
    #[must_use]
    pub const fn new(kind: ChangeKind, changes: Vec<FieldChange>) -> Self {
        Self { kind, changes }
    }

    /// Returns true if nothing needs to happen.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.kind == ChangeKind::NoChange
    }

    /// Returns true if the association must be destroyed and recreated.
    #[must_use]
    pub fn requires_replacement(&self) -> bool {
        self.kind == ChangeKind::Replace
    }

    /// Write-once fields whose change forces replacement.
    #[must_use]
    pub fn replacement_fields(&self) -> Vec<Field> {
        self.changes
            .iter()
            .filter(|c| c.forces_replacement)
            .map(|c| c.field)
            .collect()
    }

    /// Returns true if any field sent by Update changed.
    #[must_use]
    pub fn has_tracked_change(&self) -> bool {
        self.changes
            .iter()
            .any(|c| UPDATE_TRACKED.contains(&c.field))
    }

    /// Lifecycle operations that apply this plan, in order.
    ///
    /// Replacement deletes first because the document name and instance
    /// of the old association may still be bound.
    #[must_use]
    pub fn steps(&self) -> Vec<Operation> {
        match self.kind {
            ChangeKind::Create => vec![Operation::Create],
            ChangeKind::Update => vec![Operation::Update],
            ChangeKind::Replace => vec![Operation::Delete, Operation::Create],
            ChangeKind::Delete => vec![Operation::Delete],
            ChangeKind::NoChange => vec![],
        }
    }

    /// Builds the serializable summary.
    #[must_use]
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            kind: self.kind.to_string(),
            steps: self.steps().iter().map(ToString::to_string).collect(),
            changes: self
                .changes
                .iter()
                .map(|c| ChangeSummary {
                    field: c.field,
                    old: c.old.clone(),
                    new: c.new.clone(),
                    forces_replacement: c.forces_replacement,
                })
                .collect(),
        }
    }
}

impl std::fmt::Display for ChangePlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.changes.is_empty() {
            write!(f, " (")?;
            for (i, change) in self.changes.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", change.field)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
