//! SSM wire types.
//!
//! These mirror the request and response shapes of the Systems Manager
//! association API. Field names serialize in the service's `PascalCase`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Multi-valued document parameters as the service models them.
pub type DocumentParameters = HashMap<String, Vec<String>>;

/// A target selector resolving which instances the association applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Target {
    /// Selector key (e.g. `InstanceIds`, `tag:Environment`).
    pub key: String,
    /// Selector values.
    #[serde(default)]
    pub values: Vec<String>,
}

/// S3 destination for association command output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3OutputLocation {
    /// Bucket receiving the output.
    #[serde(rename = "OutputS3BucketName")]
    pub output_s3_bucket_name: String,
    /// Optional key prefix inside the bucket.
    #[serde(
        rename = "OutputS3KeyPrefix",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub output_s3_key_prefix: Option<String>,
}

/// Where the service writes association output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceAssociationOutputLocation {
    /// S3 destination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_location: Option<S3OutputLocation>,
}

/// Full association descriptor returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct AssociationDescription {
    /// Document name.
    #[serde(default)]
    pub name: Option<String>,
    /// Single instance the association was created for, if any.
    #[serde(default)]
    pub instance_id: Option<String>,
    /// Service-assigned identifier.
    #[serde(default)]
    pub association_id: Option<String>,
    /// Friendly association name.
    #[serde(default)]
    pub association_name: Option<String>,
    /// Document version the association runs.
    #[serde(default)]
    pub document_version: Option<String>,
    /// Cron or rate expression.
    #[serde(default)]
    pub schedule_expression: Option<String>,
    /// Document parameters.
    #[serde(default)]
    pub parameters: Option<DocumentParameters>,
    /// Target selectors.
    #[serde(default)]
    pub targets: Vec<Target>,
    /// Output destination.
    #[serde(default)]
    pub output_location: Option<InstanceAssociationOutputLocation>,
}

/// Request to create an association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateAssociationRequest {
    /// Document name.
    pub name: String,
    /// Friendly association name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub association_name: Option<String>,
    /// Single target instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    /// Document version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_version: Option<String>,
    /// Cron or rate expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_expression: Option<String>,
    /// Document parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<DocumentParameters>,
    /// Target selectors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<Target>>,
    /// Output destination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_location: Option<InstanceAssociationOutputLocation>,
}

/// Request to update an association. Every update creates a new remote
/// revision that replaces the previous configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateAssociationRequest {
    /// Association to update.
    pub association_id: String,
    /// Friendly association name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub association_name: Option<String>,
    /// Document version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_version: Option<String>,
    /// Cron or rate expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_expression: Option<String>,
    /// Document parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<DocumentParameters>,
    /// Target selectors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<Target>>,
    /// Output destination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_location: Option<InstanceAssociationOutputLocation>,
}

/// Response to a create call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct CreateAssociationResponse {
    /// Descriptor of the new association.
    #[serde(default)]
    pub association_description: Option<AssociationDescription>,
}

/// Response to a describe call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeAssociationResponse {
    /// Current descriptor.
    #[serde(default)]
    pub association_description: Option<AssociationDescription>,
}

impl CreateAssociationRequest {
    /// Creates a request for the given document with no optional fields.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            association_name: None,
            instance_id: None,
            document_version: None,
            schedule_expression: None,
            parameters: None,
            targets: None,
            output_location: None,
        }
    }
}

impl UpdateAssociationRequest {
    /// Creates an identifier-only update request.
    #[must_use]
    pub fn new(association_id: &str) -> Self {
        Self {
            association_id: association_id.to_string(),
            ..Self::default()
        }
    }

    /// Returns true if only the identifier is populated.
    #[must_use]
    pub const fn is_identifier_only(&self) -> bool {
        self.association_name.is_none()
            && self.document_version.is_none()
            && self.schedule_expression.is_none()
            && self.parameters.is_none()
            && self.targets.is_none()
            && self.output_location.is_none()
    }
}

impl Target {
    /// Creates a target selector.
    #[must_use]
    pub fn new(key: &str, values: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            values: values.iter().map(|v| (*v).to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_deserializes_service_json() {
        let json = r#"{
            "Name": "AWS-RunShellScript",
            "AssociationId": "assoc-1",
            "Parameters": {"commands": ["uptime"]},
            "Targets": [{"Key": "InstanceIds", "Values": ["i-1", "i-2"]}],
            "OutputLocation": {"S3Location": {"OutputS3BucketName": "logs"}}
        }"#;

        let description: AssociationDescription =
            serde_json::from_str(json).expect("valid descriptor");

        assert_eq!(description.association_id.as_deref(), Some("assoc-1"));
        assert_eq!(description.targets, vec![Target::new("InstanceIds", &["i-1", "i-2"])]);
        let s3 = description
            .output_location
            .and_then(|l| l.s3_location)
            .expect("s3 location");
        assert_eq!(s3.output_s3_bucket_name, "logs");
        assert!(s3.output_s3_key_prefix.is_none());
    }

    #[test]
    fn test_update_request_skips_unset_fields() {
        let request = UpdateAssociationRequest::new("assoc-1");
        assert!(request.is_identifier_only());

        let json = serde_json::to_value(&request).expect("serializable");
        assert_eq!(json, serde_json::json!({ "AssociationId": "assoc-1" }));
    }
}
