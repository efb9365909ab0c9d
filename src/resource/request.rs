//! Request construction from a desired record.
//!
//! Optional fields go on a request only when the record sets them, so a
//! field dropped from configuration is omitted rather than cleared.

use super::expand::{expand_output_location, expand_parameters, expand_targets};
use super::record::AssociationRecord;
use crate::ssm::{CreateAssociationRequest, UpdateAssociationRequest};

/// Which optional fields a request should carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct PresentFields {
    /// `association_name`
    pub association_name: bool,
    /// `instance_id`
    pub instance_id: bool,
    /// `document_version`
    pub document_version: bool,
    /// `schedule_expression`
    pub schedule_expression: bool,
    /// `parameters`
    pub parameters: bool,
    /// `targets`
    pub targets: bool,
    /// `output_location`
    pub output_location: bool,
}

impl PresentFields {
    /// Flags every optional field the record sets.
    #[must_use]
    pub fn of(record: &AssociationRecord) -> Self {
        Self {
            association_name: record.association_name().is_some(),
            instance_id: record.instance_id().is_some(),
            document_version: record.document_version().is_some(),
            schedule_expression: record.schedule_expression().is_some(),
            parameters: !record.parameters.is_empty(),
            targets: !record.targets.is_empty(),
            output_location: !record.output_location.is_empty(),
        }
    }
}

/// Builds create and update requests from a desired record.
#[derive(Debug)]
pub struct RequestBuilder<'a> {
    /// Desired record.
    record: &'a AssociationRecord,
    /// Fields to populate.
    present: PresentFields,
}

impl<'a> RequestBuilder<'a> {
    /// Creates a builder populating every field the record sets.
    #[must_use]
    pub fn new(record: &'a AssociationRecord) -> Self {
        Self {
            record,
            present: PresentFields::of(record),
        }
    }

    /// Overrides which optional fields are populated.
    #[must_use]
    pub const fn with_present(mut self, present: PresentFields) -> Self {
        self.present = present;
        self
    }

    /// Builds the create request.
    #[must_use]
    pub fn create_request(&self) -> CreateAssociationRequest {
        let record = self.record;
        let present = self.present;

        let mut request = CreateAssociationRequest::new(&record.name);

        if present.association_name {
            request.association_name = record.association_name().cloned();
        }
        if present.instance_id {
            request.instance_id = record.instance_id().cloned();
        }
        if present.document_version {
            request.document_version = record.document_version().cloned();
        }
        if present.schedule_expression {
            request.schedule_expression = record.schedule_expression().cloned();
        }
        if present.parameters {
            request.parameters = Some(expand_parameters(&record.parameters));
        }
        if present.targets {
            request.targets = Some(expand_targets(&record.targets));
        }
        if present.output_location {
            request.output_location = expand_output_location(&record.output_location);
        }

        request
    }

    /// Builds the update request keyed by `association_id`.
    ///
    /// `instance_id` is write-once and never sent on update.
    #[must_use]
    pub fn update_request(&self, association_id: &str) -> UpdateAssociationRequest {
        let record = self.record;
        let present = self.present;

        let mut request = UpdateAssociationRequest::new(association_id);

        if present.association_name {
            request.association_name = record.association_name().cloned();
        }
        if present.document_version {
            request.document_version = record.document_version().cloned();
        }
        if present.schedule_expression {
            request.schedule_expression = record.schedule_expression().cloned();
        }
        if present.parameters {
            request.parameters = Some(expand_parameters(&record.parameters));
        }
        if present.targets {
            request.targets = Some(expand_targets(&record.targets));
        }
        if present.output_location {
            request.output_location = expand_output_location(&record.output_location);
        }

        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssm::Target;

    fn full_record() -> AssociationRecord {
        AssociationRecord::new("AWS-RunShellScript")
            .with_association_name("nightly")
            .with_instance_id("i-0abc")
            .with_document_version("2")
            .with_schedule("rate(1 day)")
            .with_parameter("commands", "uptime")
            .with_target("InstanceIds", &["i-0abc"])
            .with_output_location("logs", Some("ssm/"))
    }

    #[test]
    fn test_create_request_minimal() {
        let record = AssociationRecord::new("doc1");
        let request = RequestBuilder::new(&record).create_request();

        assert_eq!(request, CreateAssociationRequest::new("doc1"));
    }

    #[test]
    fn test_create_request_full() {
        let record = full_record();
        let request = RequestBuilder::new(&record).create_request();

        assert_eq!(request.association_name.as_deref(), Some("nightly"));
        assert_eq!(request.instance_id.as_deref(), Some("i-0abc"));
        assert_eq!(request.document_version.as_deref(), Some("2"));
        assert_eq!(request.schedule_expression.as_deref(), Some("rate(1 day)"));
        assert_eq!(
            request.parameters.as_ref().map(|p| p["commands"].clone()),
            Some(vec![String::from("uptime")])
        );
        assert_eq!(request.targets, Some(vec![Target::new("InstanceIds", &["i-0abc"])]));
        assert!(request.output_location.is_some());
    }

    #[test]
    fn test_empty_strings_not_sent() {
        let record = AssociationRecord::new("doc1")
            .with_association_name("")
            .with_schedule("");
        let request = RequestBuilder::new(&record).create_request();

        assert!(request.association_name.is_none());
        assert!(request.schedule_expression.is_none());
    }

    #[test]
    fn test_update_request_carries_full_configuration() {
        let record = full_record();
        let request = RequestBuilder::new(&record).update_request("assoc-1");

        assert_eq!(request.association_id, "assoc-1");
        assert_eq!(request.association_name.as_deref(), Some("nightly"));
        assert!(request.parameters.is_some());
        assert!(request.targets.is_some());
        assert!(request.output_location.is_some());
    }

    #[test]
    fn test_update_request_identifier_only() {
        let record = full_record();
        let request = RequestBuilder::new(&record)
            .with_present(PresentFields::default())
            .update_request("assoc-1");

        assert!(request.is_identifier_only());
    }

    #[test]
    fn test_present_fields_of_record() {
        let record = AssociationRecord::new("doc").with_target("tag:Env", &["prod"]);
        let present = PresentFields::of(&record);

        assert!(present.targets);
        assert!(!present.parameters);
        assert!(!present.output_location);
        assert!(!present.association_name);
    }
}
