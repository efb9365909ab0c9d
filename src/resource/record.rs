//! The managed association record.
//!
//! These types map to a declared association (YAML/JSON) and to the
//! observed state written back after every lifecycle operation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declared and observed fields of one SSM association.
///
/// Optional strings count as set only when present and non-empty; maps and
/// lists count as set only when non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AssociationRecord {
    /// SSM document name. Write-once.
    pub name: String,
    /// Friendly association name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association_name: Option<String>,
    /// Service-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association_id: Option<String>,
    /// Single managed instance. Write-once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    /// Document version; the service picks a default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_version: Option<String>,
    /// Document parameters, one value per key.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,
    /// Cron or rate expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_expression: Option<String>,
    /// Output destination, at most one block.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_location: Vec<OutputLocationBlock>,
    /// Target selectors, at most five blocks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<TargetBlock>,
}

/// A `targets` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetBlock {
    /// Selector key.
    pub key: String,
    /// Selector values, in declaration order.
    pub values: Vec<String>,
}

/// An `output_location` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLocationBlock {
    /// Destination bucket.
    pub s3_bucket_name: String,
    /// Key prefix inside the bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_key_prefix: Option<String>,
}

/// A record together with its remote identifier.
///
/// `id` is `None` until Create succeeds, and again once Read finds the
/// association gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ManagedAssociation {
    /// Remote association identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Record fields.
    #[serde(flatten)]
    pub record: AssociationRecord,
}

/// Returns the value when it counts as set.
pub(crate) fn set_value(value: Option<&String>) -> Option<&String> {
    value.filter(|v| !v.is_empty())
}

impl AssociationRecord {
    /// Creates a record for the given document with nothing else set.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Sets the association name.
    #[must_use]
    pub fn with_association_name(mut self, association_name: &str) -> Self {
        self.association_name = Some(association_name.to_string());
        self
    }

    /// Sets the instance id.
    #[must_use]
    pub fn with_instance_id(mut self, instance_id: &str) -> Self {
        self.instance_id = Some(instance_id.to_string());
        self
    }

    /// Sets the document version.
    #[must_use]
    pub fn with_document_version(mut self, version: &str) -> Self {
        self.document_version = Some(version.to_string());
        self
    }

    /// Sets the schedule expression.
    #[must_use]
    pub fn with_schedule(mut self, expression: &str) -> Self {
        self.schedule_expression = Some(expression.to_string());
        self
    }

    /// Adds a document parameter.
    #[must_use]
    pub fn with_parameter(mut self, key: &str, value: &str) -> Self {
        self.parameters.insert(key.to_string(), value.to_string());
        self
    }

    /// Appends a target block.
    #[must_use]
    pub fn with_target(mut self, key: &str, values: &[&str]) -> Self {
        self.targets.push(TargetBlock::new(key, values));
        self
    }

    /// Replaces the output location.
    #[must_use]
    pub fn with_output_location(mut self, bucket: &str, prefix: Option<&str>) -> Self {
        self.output_location = vec![OutputLocationBlock {
            s3_bucket_name: bucket.to_string(),
            s3_key_prefix: prefix.map(String::from),
        }];
        self
    }

    /// Association name, if set.
    #[must_use]
    pub fn association_name(&self) -> Option<&String> {
        set_value(self.association_name.as_ref())
    }

    /// Instance id, if set.
    #[must_use]
    pub fn instance_id(&self) -> Option<&String> {
        set_value(self.instance_id.as_ref())
    }

    /// Document version, if set.
    #[must_use]
    pub fn document_version(&self) -> Option<&String> {
        set_value(self.document_version.as_ref())
    }

    /// Schedule expression, if set.
    #[must_use]
    pub fn schedule_expression(&self) -> Option<&String> {
        set_value(self.schedule_expression.as_ref())
    }

    /// Association id, if set.
    #[must_use]
    pub fn association_id(&self) -> Option<&String> {
        set_value(self.association_id.as_ref())
    }
}

impl TargetBlock {
    /// Creates a target block.
    #[must_use]
    pub fn new(key: &str, values: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            values: values.iter().map(|v| (*v).to_string()).collect(),
        }
    }
}

impl ManagedAssociation {
    /// Wraps a declared record that has not been created yet.
    #[must_use]
    pub const fn new(record: AssociationRecord) -> Self {
        Self { id: None, record }
    }

    /// Wraps a known remote identifier with an otherwise empty record.
    #[must_use]
    pub fn from_id(id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            record: AssociationRecord::default(),
        }
    }

    /// Returns the identifier if the association is present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Returns true if the association is known to exist remotely.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.id().is_some()
    }

    /// Records the remote identifier.
    pub fn set_id(&mut self, id: &str) {
        self.id = Some(id.to_string());
    }

    /// Marks the association as absent.
    pub fn clear(&mut self) {
        self.id = None;
    }
}

impl std::fmt::Display for AssociationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(name) = self.association_name() {
            write!(f, " ({name})")?;
        }
        Ok(())
    }
}
