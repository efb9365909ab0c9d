//! AWS Systems Manager integration module.
//!
//! This module defines the association API's wire shapes, the [`SsmApi`]
//! collaborator trait consumed by the lifecycle operations, and the SDK backed
//! client implementing it.

mod api;
mod client;
mod types;

pub use api::{ApiOperation, SsmApi};
pub use client::AwsSsmClient;
pub use types::{
    AssociationDescription, CreateAssociationRequest, CreateAssociationResponse,
    DescribeAssociationResponse, DocumentParameters, InstanceAssociationOutputLocation,
    S3OutputLocation, Target, UpdateAssociationRequest,
};

#[cfg(test)]
pub(crate) use api::mock::MockSsm;
