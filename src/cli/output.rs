//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::migrate::RawResourceState;
use crate::planner::{ChangeKind, ChangePlan};
use crate::resource::{FIELDS, Field, ManagedAssociation, SCHEMA_VERSION, ValidationResult};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Record attribute row for table display.
#[derive(Tabled)]
struct AttributeRow {
    #[tabled(rename = "Attribute")]
    attribute: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Field change row for table display.
#[derive(Tabled)]
struct ChangeRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Old")]
    old: String,
    #[tabled(rename = "New")]
    new: String,
    #[tabled(rename = "Replace")]
    replace: String,
}

/// Schema row for table display.
#[derive(Tabled)]
struct SchemaRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Force new")]
    force_new: String,
    #[tabled(rename = "Max items")]
    max_items: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats an observed association. JSON output is raw state that
    /// `--state` accepts back.
    #[must_use]
    pub fn format_record(&self, managed: &ManagedAssociation) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&RawResourceState::from_managed(managed))
                    .unwrap_or_default()
            }
            OutputFormat::Text => {
                let Some(id) = managed.id() else {
                    return format!("{} Association does not exist.\n", "✗".red());
                };

                let mut output = format!("\nSSM association {}\n\n", id.bold());

                let rows: Vec<AttributeRow> = FIELDS
                    .iter()
                    .filter_map(|schema| {
                        schema.field.render(&managed.record).map(|value| AttributeRow {
                            attribute: schema.field.to_string(),
                            value: Self::truncate(&value, 60),
                        })
                    })
                    .collect();

                output.push_str(&Table::new(rows).to_string());
                output.push('\n');
                output
            }
        }
    }

    /// Formats a change plan.
    #[must_use]
    pub fn format_plan(&self, plan: &ChangePlan, detailed: bool) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&plan.summary()).unwrap_or_default()
            }
            OutputFormat::Text => Self::format_plan_text(plan, detailed),
        }
    }

    /// Formats a plan as text.
    fn format_plan_text(plan: &ChangePlan, detailed: bool) -> String {
        if plan.is_noop() {
            return format!(
                "{} No changes required - association is up to date.\n",
                "✓".green()
            );
        }

        let mut output = format!("\nPlan: {}\n", Self::format_kind(plan.kind));

        let steps: Vec<String> = plan.steps().iter().map(ToString::to_string).collect();
        let _ = writeln!(output, "   Steps: {}\n", steps.join(" -> "));

        if !plan.changes.is_empty() {
            let rows: Vec<ChangeRow> = plan
                .changes
                .iter()
                .map(|c| {
                    let (old, new) = if detailed {
                        (
                            c.old.as_deref().unwrap_or("-").to_string(),
                            c.new.as_deref().unwrap_or("-").to_string(),
                        )
                    } else {
                        (
                            Self::truncate(c.old.as_deref().unwrap_or("-"), 30),
                            Self::truncate(c.new.as_deref().unwrap_or("-"), 30),
                        )
                    };

                    ChangeRow {
                        field: c.field.to_string(),
                        old,
                        new,
                        replace: if c.forces_replacement {
                            "yes".red().to_string()
                        } else {
                            String::new()
                        },
                    }
                })
                .collect();

            output.push_str(&Table::new(rows).to_string());
            output.push('\n');
        }

        if plan.requires_replacement() {
            let fields: Vec<String> = plan
                .replacement_fields()
                .iter()
                .map(ToString::to_string)
                .collect();
            let _ = write!(
                output,
                "\n{} {} cannot change in place; the association will be replaced.\n",
                "⚠".yellow(),
                fields.join(", ")
            );
        }

        output
    }

    /// Formats a validation result.
    #[must_use]
    pub fn format_validation(&self, result: &ValidationResult, show_warnings: bool) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "valid": result.is_valid(),
                    "errors": result.errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "warnings": result.warnings,
                });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => {
                let mut output = if result.is_valid() {
                    format!("{} Association is valid.\n", "✓".green())
                } else {
                    format!(
                        "{} Association has {} error(s):\n",
                        "✗".red(),
                        result.error_count()
                    )
                };

                for error in &result.errors {
                    let _ = writeln!(output, "   - {error}");
                }

                if show_warnings && !result.warnings.is_empty() {
                    let _ = write!(output, "\n{} Warnings:\n", "⚠".yellow());
                    for warning in &result.warnings {
                        let _ = writeln!(output, "   - {warning}");
                    }
                }

                output
            }
        }
    }

    /// Formats migrated raw state.
    #[must_use]
    pub fn format_migration(&self, from: u32, state: &RawResourceState) -> String {
        let json = serde_json::to_string_pretty(state).unwrap_or_default();

        match self.format {
            OutputFormat::Json => json,
            OutputFormat::Text => {
                let header = if from == state.schema_version {
                    format!("{} State is already at v{from}.", "✓".green())
                } else {
                    format!(
                        "{} Migrated state v{from} -> v{}.",
                        "✓".green(),
                        state.schema_version
                    )
                };
                format!("{header}\n\n{json}\n")
            }
        }
    }

    /// Formats the resource schema.
    #[must_use]
    pub fn format_schema(&self) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "schema_version": SCHEMA_VERSION,
                    "fields": FIELDS,
                });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => {
                let rows: Vec<SchemaRow> = FIELDS
                    .iter()
                    .map(|s| SchemaRow {
                        field: s.field.to_string(),
                        kind: format!("{:?}", s.kind).to_lowercase(),
                        mode: Self::format_mode(s.field),
                        force_new: (if s.force_new { "yes" } else { "" }).to_string(),
                        max_items: s.max_items.map(|n| n.to_string()).unwrap_or_default(),
                    })
                    .collect();

                format!(
                    "\nSSM association schema v{SCHEMA_VERSION}\n\n{}\n",
                    Table::new(rows)
                )
            }
        }
    }

    /// Formats a status message.
    #[must_use]
    pub fn message(&self, status: &str, message: &str) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({ "status": status, "message": message });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => match status {
                "success" => format!("{} {message}", "✓".green()),
                "error" => format!("{} {message}", "✗".red()),
                _ => format!("{} {message}", "⚠".yellow()),
            },
        }
    }

    /// Formats a change kind with color.
    fn format_kind(kind: ChangeKind) -> String {
        match kind {
            ChangeKind::Create => "+create".green().to_string(),
            ChangeKind::Update => "~update".yellow().to_string(),
            ChangeKind::Replace => "-/+replace".red().to_string(),
            ChangeKind::Delete => "-delete".red().to_string(),
            ChangeKind::NoChange => "no change".dimmed().to_string(),
        }
    }

    /// Describes whether a field is required, optional or computed.
    fn format_mode(field: Field) -> String {
        let schema = field.schema();
        match (schema.required, schema.computed) {
            (true, _) => String::from("required"),
            (false, true) if field == Field::AssociationId => String::from("computed"),
            (false, true) => String::from("optional+computed"),
            (false, false) => String::from("optional"),
        }
    }

    /// Truncates a string to a maximum number of characters.
    fn truncate(s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else {
            let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
            format!("{kept}...")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::plan_change;
    use crate::resource::{AssociationRecord, RecordValidator};

    fn text() -> OutputFormatter {
        colored::control::set_override(false);
        OutputFormatter::new(OutputFormat::Text)
    }

    #[test]
    fn test_noop_plan_text() {
        let record = AssociationRecord::new("doc");
        let plan = plan_change(Some(&record), Some(&record));
        assert!(text().format_plan(&plan, false).contains("No changes required"));
    }

    #[test]
    fn test_replace_plan_text_names_fields() {
        let prior = AssociationRecord::new("doc").with_instance_id("i-1");
        let desired = AssociationRecord::new("doc").with_instance_id("i-2");
        let output = text().format_plan(&plan_change(Some(&prior), Some(&desired)), true);

        assert!(output.contains("replace"));
        assert!(output.contains("instance_id cannot change in place"));
        assert!(output.contains("delete -> create"));
    }

    #[test]
    fn test_plan_json() {
        let desired = AssociationRecord::new("doc");
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = formatter.format_plan(&plan_change(None, Some(&desired)), false);

        let json: serde_json::Value = serde_json::from_str(&output).expect("valid json");
        assert_eq!(json["kind"], "create");
    }

    #[test]
    fn test_record_text_and_json() {
        let mut managed = ManagedAssociation::new(AssociationRecord::new("AWS-RunShellScript"));
        assert!(text().format_record(&managed).contains("does not exist"));

        managed.set_id("assoc-1");
        let output = text().format_record(&managed);
        assert!(output.contains("assoc-1"));
        assert!(output.contains("AWS-RunShellScript"));

        let json = OutputFormatter::new(OutputFormat::Json).format_record(&managed);
        let raw: RawResourceState = serde_json::from_str(&json).expect("raw state");
        assert_eq!(raw.id, "assoc-1");
        assert_eq!(raw.attributes["name"], "AWS-RunShellScript");
    }

    #[test]
    fn test_validation_text_lists_errors() {
        let result = RecordValidator::new().check(&AssociationRecord::default());
        let output = text().format_validation(&result, true);
        assert!(output.contains("1 error(s)"));
        assert!(output.contains("name: Document name cannot be empty"));
    }

    #[test]
    fn test_schema_lists_every_field() {
        let output = text().format_schema();
        for schema in FIELDS {
            assert!(output.contains(schema.field.name()));
        }

        let json = OutputFormatter::new(OutputFormat::Json).format_schema();
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["schema_version"], 1);
        assert_eq!(value["fields"].as_array().map(Vec::len), Some(FIELDS.len()));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(OutputFormatter::truncate("short", 10), "short");
        assert_eq!(OutputFormatter::truncate("ééééééééééé", 6), "ééé...");
    }
}
