//! Field-level comparison of a prior and a desired association record.
//!
//! Classifies the difference as a create, an in-place update, a
//! replacement, a delete, or no change at all.

use tracing::debug;

use crate::resource::{AssociationRecord, FIELDS, Field};

use super::plan::ChangePlan;

/// Computes change plans for a single association.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChangePlanner;

/// Kind of change required to reach the desired record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Association needs to be created.
    Create,
    /// Association can be updated in place.
    Update,
    /// A write-once field changed; destroy and recreate.
    Replace,
    /// Association needs to be deleted.
    Delete,
    /// Nothing to do.
    NoChange,
}

/// A single field that differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    /// Field that differs.
    pub field: Field,
    /// Prior value.
    pub old: Option<String>,
    /// Desired value.
    pub new: Option<String>,
    /// Whether this change alone forces replacement.
    pub forces_replacement: bool,
}

impl ChangePlanner {
    /// Creates a new planner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Plans the change from `prior` (observed) to `desired` (declared).
    ///
    /// `None` on either side means the association does not exist there.
    #[must_use]
    pub fn plan(
        &self,
        prior: Option<&AssociationRecord>,
        desired: Option<&AssociationRecord>,
    ) -> ChangePlan {
        match (prior, desired) {
            (None, None) => ChangePlan::new(ChangeKind::NoChange, vec![]),

            (None, Some(desired)) => {
                debug!("Association {desired} needs to be created");
                let changes = Self::diff_fields(&AssociationRecord::default(), desired);
                ChangePlan::new(ChangeKind::Create, changes)
            }

            (Some(prior), None) => {
                debug!("Association {prior} needs to be deleted");
                ChangePlan::new(ChangeKind::Delete, vec![])
            }

            (Some(prior), Some(desired)) => {
                let changes = Self::diff_fields(prior, desired);

                let kind = if changes.is_empty() {
                    ChangeKind::NoChange
                } else if changes.iter().any(|c| c.forces_replacement) {
                    ChangeKind::Replace
                } else {
                    ChangeKind::Update
                };

                debug!("Association {desired}: {kind} ({} fields)", changes.len());
                ChangePlan::new(kind, changes)
            }
        }
    }

    /// Lists every configurable field whose desired value differs.
    ///
    /// `association_id` is never declared, so it is skipped.
    #[must_use]
    pub fn diff_fields(prior: &AssociationRecord, desired: &AssociationRecord) -> Vec<FieldChange> {
        FIELDS
            .iter()
            .filter(|schema| schema.field != Field::AssociationId)
            .filter(|schema| schema.field.differs(prior, desired))
            .map(|schema| FieldChange {
                field: schema.field,
                old: schema.field.render(prior),
                new: schema.field.render(desired),
                forces_replacement: schema.force_new,
            })
            .collect()
    }
}

/// Plans the change from `prior` to `desired` with a default planner.
#[must_use]
pub fn plan_change(
    prior: Option<&AssociationRecord>,
    desired: Option<&AssociationRecord>,
) -> ChangePlan {
    ChangePlanner::new().plan(prior, desired)
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Replace => "replace",
            Self::Delete => "delete",
            Self::NoChange => "no change",
        };
        write!(f, "{s}")
    }
}

impl std::fmt::Display for FieldChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} -> {}",
            self.field,
            self.old.as_deref().unwrap_or("(unset)"),
            self.new.as_deref().unwrap_or("(unset)")
        )?;
        if self.forces_replacement {
            write!(f, " (forces replacement)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observed() -> AssociationRecord {
        let mut record = AssociationRecord::new("AWS-RunShellScript")
            .with_instance_id("i-0abc")
            .with_document_version("1")
            .with_schedule("rate(1 hour)")
            .with_target("InstanceIds", &["i-0abc"]);
        record.association_id = Some(String::from("assoc-1"));
        record
    }

    #[test]
    fn test_identical_records_no_change() {
        let plan = plan_change(Some(&observed()), Some(&observed()));
        assert_eq!(plan.kind, ChangeKind::NoChange);
        assert!(plan.changes.is_empty());
    }

    #[test]
    fn test_name_change_is_replace() {
        let mut desired = observed();
        desired.name = String::from("AWS-RunPowerShellScript");

        let plan = plan_change(Some(&observed()), Some(&desired));
        assert_eq!(plan.kind, ChangeKind::Replace);
        assert_eq!(plan.replacement_fields(), vec![Field::Name]);
    }

    #[test]
    fn test_instance_id_change_is_replace() {
        let desired = observed().with_instance_id("i-0def");

        let plan = plan_change(Some(&observed()), Some(&desired));
        assert_eq!(plan.kind, ChangeKind::Replace);
        assert!(plan.changes[0].forces_replacement);
    }

    #[test]
    fn test_schedule_change_is_update() {
        let desired = observed().with_schedule("rate(2 hours)");

        let plan = plan_change(Some(&observed()), Some(&desired));
        assert_eq!(plan.kind, ChangeKind::Update);
        assert_eq!(plan.changes.len(), 1);
        assert_eq!(plan.changes[0].field, Field::ScheduleExpression);
        assert_eq!(plan.changes[0].old.as_deref(), Some("rate(1 hour)"));
    }

    #[test]
    fn test_computed_fields_left_unset_are_ignored() {
        let mut desired = observed();
        desired.document_version = None;
        desired.targets.clear();
        desired.association_id = None;

        let plan = plan_change(Some(&observed()), Some(&desired));
        assert_eq!(plan.kind, ChangeKind::NoChange);
    }

    #[test]
    fn test_create_and_delete() {
        let record = AssociationRecord::new("doc");

        assert_eq!(plan_change(None, Some(&record)).kind, ChangeKind::Create);
        assert_eq!(plan_change(Some(&record), None).kind, ChangeKind::Delete);
        assert_eq!(plan_change(None, None).kind, ChangeKind::NoChange);
    }

    #[test]
    fn test_field_change_display() {
        let change = FieldChange {
            field: Field::Name,
            old: Some(String::from("a")),
            new: None,
            forces_replacement: true,
        };
        assert_eq!(change.to_string(), "name: a -> (unset) (forces replacement)");
    }
}
