//! Declarative schema of the association resource.
//!
//! Describes each field's mode the way the surrounding state framework sees
//! it: required, optional, computed, force-new, and list limits.

use serde::Serialize;

use super::record::AssociationRecord;

/// Current schema version stamped on every persisted record.
pub const SCHEMA_VERSION: u32 = 1;

/// Maximum number of `targets` blocks.
pub const MAX_TARGETS: usize = 5;

/// Maximum number of `output_location` blocks.
pub const MAX_OUTPUT_LOCATIONS: usize = 1;

/// Top-level fields of the association record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// `name`
    Name,
    /// `association_name`
    AssociationName,
    /// `association_id`
    AssociationId,
    /// `instance_id`
    InstanceId,
    /// `document_version`
    DocumentVersion,
    /// `parameters`
    Parameters,
    /// `schedule_expression`
    ScheduleExpression,
    /// `output_location`
    OutputLocation,
    /// `targets`
    Targets,
}

/// Value shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Scalar string.
    String,
    /// String to string map.
    Map,
    /// List of nested blocks.
    List,
}

/// Mode flags of one field.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSchema {
    /// The field.
    pub field: Field,
    /// Value shape.
    pub kind: FieldKind,
    /// Must be set in configuration.
    pub required: bool,
    /// The service may supply a value the configuration did not set.
    pub computed: bool,
    /// Any change destroys and recreates the association.
    pub force_new: bool,
    /// Upper bound on list length.
    pub max_items: Option<usize>,
    /// Attributes of nested blocks as `(name, required)`.
    pub block: &'static [(&'static str, bool)],
}

const ASSOCIATION_NAME: FieldSchema = FieldSchema {
    field: Field::AssociationName,
    kind: FieldKind::String,
    required: false,
    computed: false,
    force_new: false,
    max_items: None,
    block: &[],
};

const ASSOCIATION_ID: FieldSchema = FieldSchema {
    field: Field::AssociationId,
    kind: FieldKind::String,
    required: false,
    computed: true,
    force_new: false,
    max_items: None,
    block: &[],
};

const INSTANCE_ID: FieldSchema = FieldSchema {
    field: Field::InstanceId,
    kind: FieldKind::String,
    required: false,
    computed: false,
    force_new: true,
    max_items: None,
    block: &[],
};

const DOCUMENT_VERSION: FieldSchema = FieldSchema {
    field: Field::DocumentVersion,
    kind: FieldKind::String,
    required: false,
    computed: true,
    force_new: false,
    max_items: None,
    block: &[],
};

const NAME: FieldSchema = FieldSchema {
    field: Field::Name,
    kind: FieldKind::String,
    required: true,
    computed: false,
    force_new: true,
    max_items: None,
    block: &[],
};

const PARAMETERS: FieldSchema = FieldSchema {
    field: Field::Parameters,
    kind: FieldKind::Map,
    required: false,
    computed: true,
    force_new: false,
    max_items: None,
    block: &[],
};

const SCHEDULE_EXPRESSION: FieldSchema = FieldSchema {
    field: Field::ScheduleExpression,
    kind: FieldKind::String,
    required: false,
    computed: false,
    force_new: false,
    max_items: None,
    block: &[],
};

const OUTPUT_LOCATION: FieldSchema = FieldSchema {
    field: Field::OutputLocation,
    kind: FieldKind::List,
    required: false,
    computed: false,
    force_new: false,
    max_items: Some(MAX_OUTPUT_LOCATIONS),
    block: &[("s3_bucket_name", true), ("s3_key_prefix", false)],
};

const TARGETS: FieldSchema = FieldSchema {
    field: Field::Targets,
    kind: FieldKind::List,
    required: false,
    computed: true,
    force_new: false,
    max_items: Some(MAX_TARGETS),
    block: &[("key", true), ("values", true)],
};

/// Schema of every field, in declaration order.
pub const FIELDS: &[FieldSchema] = &[
    ASSOCIATION_NAME,
    ASSOCIATION_ID,
    INSTANCE_ID,
    DOCUMENT_VERSION,
    NAME,
    PARAMETERS,
    SCHEDULE_EXPRESSION,
    OUTPUT_LOCATION,
    TARGETS,
];

/// Fields whose change is sent to the service by Update.
pub const UPDATE_TRACKED: &[Field] = &[
    Field::AssociationName,
    Field::DocumentVersion,
    Field::ScheduleExpression,
    Field::Parameters,
    Field::OutputLocation,
    Field::Targets,
];

impl Field {
    /// Attribute name in configuration and state.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::AssociationName => "association_name",
            Self::AssociationId => "association_id",
            Self::InstanceId => "instance_id",
            Self::DocumentVersion => "document_version",
            Self::Parameters => "parameters",
            Self::ScheduleExpression => "schedule_expression",
            Self::OutputLocation => "output_location",
            Self::Targets => "targets",
        }
    }

    /// Mode flags for this field.
    #[must_use]
    pub const fn schema(self) -> &'static FieldSchema {
        match self {
            Self::Name => &NAME,
            Self::AssociationName => &ASSOCIATION_NAME,
            Self::AssociationId => &ASSOCIATION_ID,
            Self::InstanceId => &INSTANCE_ID,
            Self::DocumentVersion => &DOCUMENT_VERSION,
            Self::Parameters => &PARAMETERS,
            Self::ScheduleExpression => &SCHEDULE_EXPRESSION,
            Self::OutputLocation => &OUTPUT_LOCATION,
            Self::Targets => &TARGETS,
        }
    }

    /// Returns true if a change to this field forces replacement.
    #[must_use]
    pub fn is_force_new(self) -> bool {
        self.schema().force_new
    }

    /// Returns true if the field is set on the record.
    #[must_use]
    pub fn is_set(self, record: &AssociationRecord) -> bool {
        match self {
            Self::Name => !record.name.is_empty(),
            Self::AssociationName => record.association_name().is_some(),
            Self::AssociationId => record.association_id().is_some(),
            Self::InstanceId => record.instance_id().is_some(),
            Self::DocumentVersion => record.document_version().is_some(),
            Self::Parameters => !record.parameters.is_empty(),
            Self::ScheduleExpression => record.schedule_expression().is_some(),
            Self::OutputLocation => !record.output_location.is_empty(),
            Self::Targets => !record.targets.is_empty(),
        }
    }

    /// Renders the field's value for display, `None` when unset.
    #[must_use]
    pub fn render(self, record: &AssociationRecord) -> Option<String> {
        if !self.is_set(record) {
            return None;
        }

        let rendered = match self {
            Self::Name => record.name.clone(),
            Self::AssociationName => record.association_name.clone().unwrap_or_default(),
            Self::AssociationId => record.association_id.clone().unwrap_or_default(),
            Self::InstanceId => record.instance_id.clone().unwrap_or_default(),
            Self::DocumentVersion => record.document_version.clone().unwrap_or_default(),
            Self::ScheduleExpression => record.schedule_expression.clone().unwrap_or_default(),
            Self::Parameters => serde_json::to_string(&record.parameters).unwrap_or_default(),
            Self::OutputLocation => {
                serde_json::to_string(&record.output_location).unwrap_or_default()
            }
            Self::Targets => serde_json::to_string(&record.targets).unwrap_or_default(),
        };

        Some(rendered)
    }

    /// Returns true if the desired value differs from the prior one.
    ///
    /// A computed field left unset in the desired record keeps whatever the
    /// service reported, so it never counts as a change.
    #[must_use]
    pub fn differs(self, prior: &AssociationRecord, desired: &AssociationRecord) -> bool {
        if self.schema().computed && !self.is_set(desired) {
            return false;
        }

        match self {
            Self::Name => prior.name != desired.name,
            Self::AssociationName => prior.association_name() != desired.association_name(),
            Self::AssociationId => prior.association_id() != desired.association_id(),
            Self::InstanceId => prior.instance_id() != desired.instance_id(),
            Self::DocumentVersion => prior.document_version() != desired.document_version(),
            Self::Parameters => prior.parameters != desired.parameters,
            Self::ScheduleExpression => {
                prior.schedule_expression() != desired.schedule_expression()
            }
            Self::OutputLocation => prior.output_location != desired.output_location,
            Self::Targets => prior.targets != desired.targets,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_new_fields() {
        let force_new: Vec<Field> = FIELDS
            .iter()
            .filter(|s| s.force_new)
            .map(|s| s.field)
            .collect();
        assert_eq!(force_new, vec![Field::InstanceId, Field::Name]);
    }

    #[test]
    fn test_list_limits() {
        assert_eq!(Field::Targets.schema().max_items, Some(5));
        assert_eq!(Field::OutputLocation.schema().max_items, Some(1));
        assert_eq!(Field::Name.schema().max_items, None);
    }

    #[test]
    fn test_every_field_has_schema() {
        for field in [
            Field::Name,
            Field::AssociationName,
            Field::AssociationId,
            Field::InstanceId,
            Field::DocumentVersion,
            Field::Parameters,
            Field::ScheduleExpression,
            Field::OutputLocation,
            Field::Targets,
        ] {
            assert_eq!(field.schema().field, field);
        }
    }

    #[test]
    fn test_field_table_matches_lookup() {
        assert_eq!(FIELDS.len(), 9);
        for schema in FIELDS {
            let looked_up = schema.field.schema();
            assert_eq!(looked_up.field, schema.field);
            assert_eq!(looked_up.required, schema.required);
            assert_eq!(looked_up.computed, schema.computed);
            assert_eq!(looked_up.force_new, schema.force_new);
        }
        assert!(Field::Name.schema().required);
        assert!(!Field::AssociationName.schema().computed);
        assert!(Field::Targets.schema().computed);
    }

    #[test]
    fn test_computed_unset_is_not_a_change() {
        let prior = AssociationRecord::new("doc").with_document_version("3");
        let desired = AssociationRecord::new("doc");
        assert!(!Field::DocumentVersion.differs(&prior, &desired));

        let pinned = AssociationRecord::new("doc").with_document_version("4");
        assert!(Field::DocumentVersion.differs(&prior, &pinned));
    }

    #[test]
    fn test_optional_unset_is_a_change() {
        let prior = AssociationRecord::new("doc").with_schedule("rate(30 minutes)");
        let desired = AssociationRecord::new("doc");
        assert!(Field::ScheduleExpression.differs(&prior, &desired));
    }
}
