//! Remote service collaborator interface.

use async_trait::async_trait;

use crate::error::SsmResult;

use super::types::{
    CreateAssociationRequest, CreateAssociationResponse, DescribeAssociationResponse,
    UpdateAssociationRequest,
};

/// Remote operations the association resource depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOperation {
    /// `CreateAssociation`.
    CreateAssociation,
    /// `DescribeAssociation`.
    DescribeAssociation,
    /// `UpdateAssociation`.
    UpdateAssociation,
    /// `DeleteAssociation`.
    DeleteAssociation,
}

/// The subset of the Systems Manager API used by the lifecycle operations.
///
/// Implementations own transport concerns (auth, retries, timeouts). A call
/// either returns the service's answer or an [`SsmError`](crate::error::SsmError).
#[async_trait]
pub trait SsmApi: Send + Sync {
    /// Creates an association.
    async fn create_association(
        &self,
        request: &CreateAssociationRequest,
    ) -> SsmResult<CreateAssociationResponse>;

    /// Describes an association by identifier.
    ///
    /// Returns `SsmError::AssociationDoesNotExist` when the service has no
    /// association with this identifier.
    async fn describe_association(&self, association_id: &str)
    -> SsmResult<DescribeAssociationResponse>;

    /// Updates an association.
    async fn update_association(&self, request: &UpdateAssociationRequest) -> SsmResult<()>;

    /// Deletes an association by identifier.
    async fn delete_association(&self, association_id: &str) -> SsmResult<()>;
}

#[async_trait]
impl<T: SsmApi + ?Sized> SsmApi for Box<T> {
    async fn create_association(
        &self,
        request: &CreateAssociationRequest,
    ) -> SsmResult<CreateAssociationResponse> {
        (**self).create_association(request).await
    }

    async fn describe_association(
        &self,
        association_id: &str,
    ) -> SsmResult<DescribeAssociationResponse> {
        (**self).describe_association(association_id).await
    }

    async fn update_association(&self, request: &UpdateAssociationRequest) -> SsmResult<()> {
        (**self).update_association(request).await
    }

    async fn delete_association(&self, association_id: &str) -> SsmResult<()> {
        (**self).delete_association(association_id).await
    }
}

impl std::fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::CreateAssociation => "CreateAssociation",
            Self::DescribeAssociation => "DescribeAssociation",
            Self::UpdateAssociation => "UpdateAssociation",
            Self::DeleteAssociation => "DeleteAssociation",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use async_trait::async_trait;

    use crate::error::SsmResult;
    use crate::ssm::types::{
        CreateAssociationRequest, CreateAssociationResponse, DescribeAssociationResponse,
        UpdateAssociationRequest,
    };

    use super::SsmApi;

    mockall::mock! {
        pub Ssm {}

        #[async_trait]
        impl SsmApi for Ssm {
            async fn create_association(
                &self,
                request: &CreateAssociationRequest,
            ) -> SsmResult<CreateAssociationResponse>;

            async fn describe_association(
                &self,
                association_id: &str,
            ) -> SsmResult<DescribeAssociationResponse>;

            async fn update_association(&self, request: &UpdateAssociationRequest) -> SsmResult<()>;

            async fn delete_association(&self, association_id: &str) -> SsmResult<()>;
        }
    }
}
