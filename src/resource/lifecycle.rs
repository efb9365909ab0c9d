//! Create, Read, Update and Delete for one SSM association.
//!
//! Each operation awaits a single remote call and, except for Delete,
//! finishes by re-reading the association so the record reflects what the
//! service actually stored.

use tracing::{debug, info, warn};

use crate::error::{Operation, ResourceError, Result};
use crate::planner::ChangePlanner;
use crate::ssm::{AssociationDescription, SsmApi};

use super::expand::{flatten_output_location, flatten_parameters, flatten_targets};
use super::record::{AssociationRecord, ManagedAssociation};
use super::request::{PresentFields, RequestBuilder};
use super::validator::RecordValidator;

/// Lifecycle operations bound to a remote client.
#[derive(Debug)]
pub struct AssociationResource<'a, C: SsmApi + ?Sized> {
    /// Remote client.
    client: &'a C,
    /// Structural validator run before Create and Update.
    validator: RecordValidator,
    /// Classifies prior versus desired records on Update.
    planner: ChangePlanner,
}

/// What Read found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The association exists and the record was refreshed.
    Found,
    /// The service no longer knows the association; the id was cleared.
    Gone,
}

impl<'a, C: SsmApi + ?Sized> AssociationResource<'a, C> {
    /// Creates the lifecycle handle.
    #[must_use]
    pub const fn new(client: &'a C) -> Self {
        Self {
            client,
            validator: RecordValidator::new(),
            planner: ChangePlanner::new(),
        }
    }

    /// Creates the association and refreshes the record from the service.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the remote call fails, or the
    /// response carries no usable descriptor. No id is assigned on failure.
    pub async fn create(&self, resource: &mut ManagedAssociation) -> Result<ReadOutcome> {
        debug!("Creating SSM association for document {}", resource.record.name);

        self.validator.validate(&resource.record)?;

        let request = RequestBuilder::new(&resource.record).create_request();
        let response = self
            .client
            .create_association(&request)
            .await
            .map_err(|e| ResourceError::remote(Operation::Create, None, e))?;

        let description = response
            .association_description
            .ok_or(ResourceError::MissingDescription {
                operation: Operation::Create,
            })?;

        let id = description
            .association_id
            .filter(|id| !id.is_empty())
            .ok_or(ResourceError::EmptyIdentifier {
                operation: Operation::Create,
            })?;

        resource.set_id(&id);
        resource.record.association_id = Some(id.clone());
        info!("Created SSM association {id}");

        self.read(resource).await
    }

    /// Refreshes the record from the service.
    ///
    /// A missing association is not an error: the id is cleared and
    /// [`ReadOutcome::Gone`] is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if no id is recorded, the remote call fails for any
    /// other reason, or the response carries no descriptor.
    pub async fn read(&self, resource: &mut ManagedAssociation) -> Result<ReadOutcome> {
        let id = resource
            .id()
            .map(String::from)
            .ok_or(ResourceError::MissingIdentifier {
                operation: Operation::Read,
            })?;

        debug!("Reading SSM association {id}");

        let response = match self.client.describe_association(&id).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => {
                warn!("SSM association {id} no longer exists, removing from state");
                resource.clear();
                return Ok(ReadOutcome::Gone);
            }
            Err(e) => return Err(ResourceError::remote(Operation::Read, Some(&id), e).into()),
        };

        let description = response
            .association_description
            .ok_or(ResourceError::MissingDescription {
                operation: Operation::Read,
            })?;

        apply_description(&mut resource.record, description);
        Ok(ReadOutcome::Found)
    }

    /// Updates the association in place and refreshes the record.
    ///
    /// `prior` is the last observed record; `resource` carries the desired
    /// one. When none of the updatable fields changed, only the identifier is
    /// sent.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, no association id is known, a
    /// write-once field changed, or the remote call fails.
    pub async fn update(
        &self,
        prior: &AssociationRecord,
        resource: &mut ManagedAssociation,
    ) -> Result<ReadOutcome> {
        self.validator.validate(&resource.record)?;

        let id = resource
            .record
            .association_id()
            .or_else(|| prior.association_id())
            .map(String::clone)
            .or_else(|| resource.id().map(String::from))
            .ok_or(ResourceError::MissingIdentifier {
                operation: Operation::Update,
            })?;

        debug!("Updating SSM association {id}");

        let plan = self.planner.plan(Some(prior), Some(&resource.record));
        if plan.requires_replacement() {
            let fields: Vec<&str> = plan.replacement_fields().iter().map(|f| f.name()).collect();
            return Err(ResourceError::RequiresReplacement {
                id,
                fields: fields.join(", "),
            }
            .into());
        }

        let mut builder = RequestBuilder::new(&resource.record);
        if !plan.has_tracked_change() {
            debug!("No updatable field changed for {id}, sending identifier only");
            builder = builder.with_present(PresentFields::default());
        }

        let request = builder.update_request(&id);
        self.client
            .update_association(&request)
            .await
            .map_err(|e| ResourceError::remote(Operation::Update, Some(&id), e))?;

        if !resource.is_present() {
            resource.set_id(&id);
        }
        resource.record.association_id = Some(id.clone());
        info!("Updated SSM association {id}");

        self.read(resource).await
    }

    /// Deletes the association.
    ///
    /// # Errors
    ///
    /// Returns an error if no association id is known or the remote call
    /// fails.
    pub async fn delete(&self, resource: &mut ManagedAssociation) -> Result<()> {
        let id = resource
            .record
            .association_id()
            .cloned()
            .or_else(|| resource.id().map(String::from))
            .ok_or(ResourceError::MissingIdentifier {
                operation: Operation::Delete,
            })?;

        debug!("Deleting SSM association {id}");

        self.client
            .delete_association(&id)
            .await
            .map_err(|e| ResourceError::remote(Operation::Delete, Some(&id), e))?;

        resource.clear();
        info!("Deleted SSM association {id}");
        Ok(())
    }
}

/// Overwrites every observed field of `record` from the descriptor.
fn apply_description(record: &mut AssociationRecord, description: AssociationDescription) {
    record.name = description.name.unwrap_or_default();
    record.association_id = description.association_id;
    record.instance_id = description.instance_id;
    record.association_name = description.association_name;
    record.document_version = description.document_version;
    record.schedule_expression = description.schedule_expression;
    record.parameters = description
        .parameters
        .as_ref()
        .map(flatten_parameters)
        .unwrap_or_default();
    record.targets = flatten_targets(&description.targets);
    record.output_location = flatten_output_location(description.output_location.as_ref());
}
