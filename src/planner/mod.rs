//! Change planning for a single association.
//!
//! This module compares a prior observed record with a desired one and
//! decides which lifecycle operations reconcile them. Changes to write-once
//! fields are planned as replacements rather than updates.

mod diff;
mod plan;

pub use diff::{ChangeKind, ChangePlanner, FieldChange, plan_change};
pub use plan::{ChangePlan, ChangeSummary, PlanSummary};
