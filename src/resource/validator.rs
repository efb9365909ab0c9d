//! Structural validation of association records.
//!
//! Enforces the schema's list limits and required nested attributes before
//! any remote call is made.

use std::collections::HashSet;
use tracing::debug;

use crate::error::{AssociationError, Result};

use super::record::{AssociationRecord, OutputLocationBlock, TargetBlock};
use super::schema::{MAX_OUTPUT_LOCATIONS, MAX_TARGETS};

/// Validator for association records.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordValidator;

/// Validation result containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The field path that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl RecordValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Collects every violation without failing.
    #[must_use]
    pub fn check(&self, record: &AssociationRecord) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_name(record, &mut result);
        Self::validate_parameters(record, &mut result);
        Self::validate_schedule(record, &mut result);
        Self::validate_targets(&record.targets, &mut result);
        Self::validate_output_location(&record.output_location, &mut result);

        if record.instance_id().is_some() && !record.targets.is_empty() {
            result.warnings.push(String::from(
                "instance_id and targets are both set; the service may reject the combination",
            ));
        }

        result
    }

    /// Validates a record.
    ///
    /// # Errors
    ///
    /// Returns the first violation if the record is invalid.
    pub fn validate(&self, record: &AssociationRecord) -> Result<ValidationResult> {
        let result = self.check(record);

        if let Some(first_error) = result.errors.first() {
            return Err(AssociationError::validation(
                first_error.field.clone(),
                first_error.message.clone(),
            ));
        }

        debug!("Record validation passed for {}", record.name);
        Ok(result)
    }

    fn validate_name(record: &AssociationRecord, result: &mut ValidationResult) {
        if record.name.is_empty() {
            result.errors.push(ValidationError {
                field: String::from("name"),
                message: String::from("Document name cannot be empty"),
            });
        }
    }

    fn validate_parameters(record: &AssociationRecord, result: &mut ValidationResult) {
        if record.parameters.keys().any(String::is_empty) {
            result.errors.push(ValidationError {
                field: String::from("parameters"),
                message: String::from("Parameter names cannot be empty"),
            });
        }
    }

    fn validate_schedule(record: &AssociationRecord, result: &mut ValidationResult) {
        if let Some(expression) = record.schedule_expression()
            && !expression.starts_with("cron(")
            && !expression.starts_with("rate(")
            && !expression.starts_with("at(")
        {
            result.warnings.push(format!(
                "schedule_expression: '{expression}' is not a cron(), rate() or at() expression"
            ));
        }
    }

    /// Validates `targets` blocks.
    fn validate_targets(targets: &[TargetBlock], result: &mut ValidationResult) {
        if targets.len() > MAX_TARGETS {
            result.errors.push(ValidationError {
                field: String::from("targets"),
                message: format!(
                    "At most {MAX_TARGETS} targets are allowed, found {}",
                    targets.len()
                ),
            });
        }

        let mut seen_keys = HashSet::new();

        for (i, target) in targets.iter().enumerate() {
            let prefix = format!("targets[{i}]");

            if target.key.is_empty() {
                result.errors.push(ValidationError {
                    field: format!("{prefix}.key"),
                    message: String::from("Target key cannot be empty"),
                });
            } else if !seen_keys.insert(target.key.as_str()) {
                result.warnings.push(format!(
                    "{prefix}.key: Duplicate target key '{}'",
                    target.key
                ));
            }

            if target.values.is_empty() {
                result.errors.push(ValidationError {
                    field: format!("{prefix}.values"),
                    message: format!("Target '{}' must have at least one value", target.key),
                });
            }
        }
    }

    /// Validates `output_location` blocks.
    fn validate_output_location(blocks: &[OutputLocationBlock], result: &mut ValidationResult) {
        if blocks.len() > MAX_OUTPUT_LOCATIONS {
            result.errors.push(ValidationError {
                field: String::from("output_location"),
                message: format!(
                    "At most {MAX_OUTPUT_LOCATIONS} output_location block is allowed, found {}",
                    blocks.len()
                ),
            });
        }

        for (i, block) in blocks.iter().enumerate() {
            if block.s3_bucket_name.is_empty() {
                result.errors.push(ValidationError {
                    field: format!("output_location[{i}].s3_bucket_name"),
                    message: String::from("S3 bucket name cannot be empty"),
                });
            }

            if block.s3_key_prefix.as_deref() == Some("") {
                result.warnings.push(format!(
                    "output_location[{i}].s3_key_prefix: empty prefix is treated as unset"
                ));
            }
        }
    }
}

/// Validates a record with the default validator.
///
/// # Errors
///
/// Returns the first violation if the record is invalid.
pub fn validate_record(record: &AssociationRecord) -> Result<ValidationResult> {
    RecordValidator::new().validate(record)
}

impl ValidationResult {
    /// Returns true if validation passed (no errors).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of errors.
    #[must_use]
    pub const fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Returns the number of warnings.
    #[must_use]
    pub const fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_record() {
        let record = AssociationRecord::new("AWS-RunPatchBaseline")
            .with_schedule("cron(0 2 ? * SUN *)")
            .with_target("tag:Patch", &["yes"])
            .with_output_location("logs", None);

        let result = RecordValidator::new().validate(&record).expect("valid");
        assert!(result.is_valid());
        assert_eq!(result.warning_count(), 0);
    }

    #[test]
    fn test_six_targets_rejected() {
        let mut record = AssociationRecord::new("doc");
        for i in 0..6 {
            record = record.with_target(&format!("tag:k{i}"), &["v"]);
        }

        let err = RecordValidator::new().validate(&record).unwrap_err();
        assert!(matches!(
            err,
            AssociationError::Validation { ref field, .. } if field == "targets"
        ));
    }

    #[test]
    fn test_five_targets_accepted() {
        let mut record = AssociationRecord::new("doc");
        for i in 0..5 {
            record = record.with_target(&format!("tag:k{i}"), &["v"]);
        }

        assert!(validate_record(&record).is_ok());
    }

    #[test]
    fn test_target_values_required() {
        let record = AssociationRecord::new("doc").with_target("InstanceIds", &[]);
        let result = RecordValidator::new().check(&record);

        assert_eq!(result.error_count(), 1);
        assert_eq!(result.errors[0].field, "targets[0].values");
    }

    #[test]
    fn test_two_output_locations_rejected() {
        let mut record = AssociationRecord::new("doc").with_output_location("a", None);
        record.output_location.push(OutputLocationBlock {
            s3_bucket_name: String::from("b"),
            s3_key_prefix: None,
        });

        let result = RecordValidator::new().check(&record);
        assert!(!result.is_valid());
        assert_eq!(result.errors[0].field, "output_location");
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = RecordValidator::new().check(&AssociationRecord::default());
        assert_eq!(result.errors[0].field, "name");
    }

    #[test]
    fn test_schedule_warning() {
        let record = AssociationRecord::new("doc").with_schedule("every day");
        let result = RecordValidator::new().check(&record);

        assert!(result.is_valid());
        assert_eq!(result.warning_count(), 1);
    }
}
