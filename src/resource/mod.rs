//! The SSM association resource.
//!
//! This module holds the declarative record, its field schema, the shape
//! converters between record and wire types, request builders, structural
//! validation, and the lifecycle operations driving the remote service.

mod expand;
mod lifecycle;
mod record;
mod request;
mod schema;
mod validator;

pub use expand::{
    expand_output_location, expand_parameters, expand_targets, flatten_output_location,
    flatten_parameters, flatten_targets,
};
pub use lifecycle::{AssociationResource, ReadOutcome};
pub use record::{AssociationRecord, ManagedAssociation, OutputLocationBlock, TargetBlock};
pub use request::{PresentFields, RequestBuilder};
pub use schema::{
    FIELDS, Field, FieldKind, FieldSchema, MAX_OUTPUT_LOCATIONS, MAX_TARGETS, SCHEMA_VERSION,
    UPDATE_TRACKED,
};
pub use validator::{RecordValidator, ValidationError, ValidationResult, validate_record};
