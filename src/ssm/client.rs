//! AWS SDK backed implementation of [`SsmApi`].
//!
//! Translates between the crate's wire types and `aws-sdk-ssm` shapes, and maps
//! the service's `AssociationDoesNotExist` error code onto
//! [`SsmError::AssociationDoesNotExist`].

use async_trait::async_trait;
use aws_sdk_ssm::Client;
use aws_sdk_ssm::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ssm::types as sdk;
use std::time::Duration;
use tracing::{debug, trace};

use crate::config::ClientSettings;
use crate::error::{SsmError, SsmResult};

use super::api::{ApiOperation, SsmApi};
use super::types::{
    AssociationDescription, CreateAssociationRequest, CreateAssociationResponse,
    DescribeAssociationResponse, InstanceAssociationOutputLocation, S3OutputLocation, Target,
    UpdateAssociationRequest,
};

/// Error code the service uses for unknown association identifiers.
const NOT_FOUND_CODE: &str = "AssociationDoesNotExist";

/// Systems Manager client.
#[derive(Debug, Clone)]
pub struct AwsSsmClient {
    /// SDK client.
    client: Client,
}

impl AwsSsmClient {
    /// Creates a client from the ambient AWS configuration plus overrides.
    pub async fn new(settings: &ClientSettings) -> Self {
        let mut loader = aws_config::from_env();

        if let Some(region) = &settings.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(profile) = &settings.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint) = &settings.endpoint_url {
            debug!("Using SSM endpoint override: {endpoint}");
            loader = loader.endpoint_url(endpoint);
        }
        if let Some(max_attempts) = settings.max_attempts {
            loader = loader.retry_config(
                aws_config::retry::RetryConfig::standard().with_max_attempts(max_attempts),
            );
        }
        if let Some(timeout_secs) = settings.timeout_secs {
            loader = loader.timeout_config(
                aws_config::timeout::TimeoutConfig::builder()
                    .operation_timeout(Duration::from_secs(timeout_secs))
                    .build(),
            );
        }

        let config = loader.load().await;
        Self {
            client: Client::new(&config),
        }
    }
}

#[async_trait]
impl SsmApi for AwsSsmClient {
    async fn create_association(
        &self,
        request: &CreateAssociationRequest,
    ) -> SsmResult<CreateAssociationResponse> {
        trace!("CreateAssociation: {request:?}");

        let output = self
            .client
            .create_association()
            .name(&request.name)
            .set_association_name(request.association_name.clone())
            .set_instance_id(request.instance_id.clone())
            .set_document_version(request.document_version.clone())
            .set_schedule_expression(request.schedule_expression.clone())
            .set_parameters(request.parameters.clone())
            .set_targets(request.targets.as_deref().map(to_sdk_targets))
            .set_output_location(request.output_location.as_ref().map(to_sdk_output_location))
            .send()
            .await
            .map_err(|e| classify(ApiOperation::CreateAssociation, None, &e))?;

        Ok(CreateAssociationResponse {
            association_description: output.association_description().map(from_sdk_description),
        })
    }

    async fn describe_association(
        &self,
        association_id: &str,
    ) -> SsmResult<DescribeAssociationResponse> {
        trace!("DescribeAssociation: {association_id}");

        let output = self
            .client
            .describe_association()
            .association_id(association_id)
            .send()
            .await
            .map_err(|e| classify(ApiOperation::DescribeAssociation, Some(association_id), &e))?;

        Ok(DescribeAssociationResponse {
            association_description: output.association_description().map(from_sdk_description),
        })
    }

    async fn update_association(&self, request: &UpdateAssociationRequest) -> SsmResult<()> {
        trace!("UpdateAssociation: {request:?}");

        self.client
            .update_association()
            .association_id(&request.association_id)
            .set_association_name(request.association_name.clone())
            .set_document_version(request.document_version.clone())
            .set_schedule_expression(request.schedule_expression.clone())
            .set_parameters(request.parameters.clone())
            .set_targets(request.targets.as_deref().map(to_sdk_targets))
            .set_output_location(request.output_location.as_ref().map(to_sdk_output_location))
            .send()
            .await
            .map_err(|e| {
                classify(
                    ApiOperation::UpdateAssociation,
                    Some(&request.association_id),
                    &e,
                )
            })?;

        Ok(())
    }

    async fn delete_association(&self, association_id: &str) -> SsmResult<()> {
        trace!("DeleteAssociation: {association_id}");

        self.client
            .delete_association()
            .association_id(association_id)
            .send()
            .await
            .map_err(|e| classify(ApiOperation::DeleteAssociation, Some(association_id), &e))?;

        Ok(())
    }
}

/// Maps an SDK failure onto the client error taxonomy.
fn classify<E, R>(
    operation: ApiOperation,
    association_id: Option<&str>,
    err: &SdkError<E, R>,
) -> SsmError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let not_found = err
        .as_service_error()
        .and_then(ProvideErrorMetadata::code)
        .is_some_and(|code| code == NOT_FOUND_CODE);

    match association_id {
        Some(id) if not_found => SsmError::AssociationDoesNotExist {
            association_id: id.to_string(),
        },
        _ => SsmError::request(operation, DisplayErrorContext(err).to_string()),
    }
}

fn to_sdk_targets(targets: &[Target]) -> Vec<sdk::Target> {
    targets
        .iter()
        .map(|t| {
            sdk::Target::builder()
                .key(&t.key)
                .set_values(Some(t.values.clone()))
                .build()
        })
        .collect()
}

fn to_sdk_output_location(
    location: &InstanceAssociationOutputLocation,
) -> sdk::InstanceAssociationOutputLocation {
    let s3 = location.s3_location.as_ref().map(|s3| {
        sdk::S3OutputLocation::builder()
            .output_s3_bucket_name(&s3.output_s3_bucket_name)
            .set_output_s3_key_prefix(s3.output_s3_key_prefix.clone())
            .build()
    });

    sdk::InstanceAssociationOutputLocation::builder()
        .set_s3_location(s3)
        .build()
}

fn from_sdk_description(description: &sdk::AssociationDescription) -> AssociationDescription {
    AssociationDescription {
        name: description.name().map(String::from),
        instance_id: description.instance_id().map(String::from),
        association_id: description.association_id().map(String::from),
        association_name: description.association_name().map(String::from),
        document_version: description.document_version().map(String::from),
        schedule_expression: description.schedule_expression().map(String::from),
        parameters: description.parameters().cloned(),
        targets: description
            .targets()
            .iter()
            .map(|t| Target {
                key: t.key().unwrap_or_default().to_string(),
                values: t.values().to_vec(),
            })
            .collect(),
        output_location: description.output_location().map(|location| {
            InstanceAssociationOutputLocation {
                s3_location: location.s3_location().and_then(|s3| {
                    s3.output_s3_bucket_name().map(|bucket| S3OutputLocation {
                        output_s3_bucket_name: bucket.to_string(),
                        output_s3_key_prefix: s3.output_s3_key_prefix().map(String::from),
                    })
                }),
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ssm::error::ErrorMetadata;
    use aws_sdk_ssm::operation::create_association::CreateAssociationError;
    use aws_sdk_ssm::operation::describe_association::DescribeAssociationError;
    use aws_sdk_ssm::types::error::AssociationDoesNotExist;

    fn metadata(code: &str) -> ErrorMetadata {
        ErrorMetadata::builder()
            .code(code)
            .message("service error")
            .build()
    }

    fn association_missing() -> SdkError<DescribeAssociationError, ()> {
        let modeled = AssociationDoesNotExist::builder()
            .message("assoc-missing does not exist")
            .meta(metadata(NOT_FOUND_CODE))
            .build();
        SdkError::service_error(DescribeAssociationError::AssociationDoesNotExist(modeled), ())
    }

    #[test]
    fn test_describe_not_found_maps_to_association_does_not_exist() {
        let err = association_missing();
        assert!(
            err.as_service_error()
                .is_some_and(DescribeAssociationError::is_association_does_not_exist)
        );

        let classified = classify(
            ApiOperation::DescribeAssociation,
            Some("assoc-missing"),
            &err,
        );

        assert!(matches!(
            classified,
            SsmError::AssociationDoesNotExist { ref association_id } if association_id == "assoc-missing"
        ));
    }

    #[test]
    fn test_not_found_without_identifier_is_request_failure() {
        let err: SdkError<CreateAssociationError, ()> =
            SdkError::service_error(CreateAssociationError::generic(metadata(NOT_FOUND_CODE)), ());

        let classified = classify(ApiOperation::CreateAssociation, None, &err);

        assert!(matches!(
            classified,
            SsmError::RequestFailed {
                operation: ApiOperation::CreateAssociation,
                ..
            }
        ));
    }

    #[test]
    fn test_other_service_codes_are_request_failures() {
        let err: SdkError<DescribeAssociationError, ()> = SdkError::service_error(
            DescribeAssociationError::generic(metadata("ThrottlingException")),
            (),
        );

        let classified = classify(ApiOperation::DescribeAssociation, Some("assoc-1"), &err);

        assert!(!classified.is_not_found());
        assert!(classified.to_string().contains("ThrottlingException"));
    }

    #[test]
    fn test_sdk_description_conversion() {
        let sdk_description = sdk::AssociationDescription::builder()
            .name("AWS-RunShellScript")
            .association_id("assoc-1")
            .targets(
                sdk::Target::builder()
                    .key("tag:Role")
                    .values("web")
                    .values("api")
                    .build(),
            )
            .output_location(
                sdk::InstanceAssociationOutputLocation::builder()
                    .s3_location(
                        sdk::S3OutputLocation::builder()
                            .output_s3_bucket_name("logs")
                            .build(),
                    )
                    .build(),
            )
            .build();

        let description = from_sdk_description(&sdk_description);

        assert_eq!(description.name.as_deref(), Some("AWS-RunShellScript"));
        assert_eq!(description.targets, vec![Target::new("tag:Role", &["web", "api"])]);
        let s3 = description
            .output_location
            .and_then(|l| l.s3_location)
            .expect("s3 location");
        assert_eq!(s3.output_s3_bucket_name, "logs");
        assert_eq!(s3.output_s3_key_prefix, None);
    }

    #[test]
    fn test_output_location_to_sdk_omits_missing_prefix() {
        let location = InstanceAssociationOutputLocation {
            s3_location: Some(S3OutputLocation {
                output_s3_bucket_name: String::from("logs"),
                output_s3_key_prefix: None,
            }),
        };

        let converted = to_sdk_output_location(&location);
        let s3 = converted.s3_location().expect("s3 location");
        assert_eq!(s3.output_s3_bucket_name(), Some("logs"));
        assert_eq!(s3.output_s3_key_prefix(), None);
    }
}
