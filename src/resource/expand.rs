//! Shape converters between the declarative record and SSM wire types.
//!
//! `expand_*` turns declared values into request shapes, `flatten_*` turns
//! service responses back into record values. All converters are pure and
//! assume input already passed schema validation.

use std::collections::BTreeMap;

use crate::ssm::{DocumentParameters, InstanceAssociationOutputLocation, S3OutputLocation, Target};

use super::record::{OutputLocationBlock, TargetBlock};

/// Expands single-valued parameters into the service's multi-valued shape.
#[must_use]
pub fn expand_parameters(params: &BTreeMap<String, String>) -> DocumentParameters {
    params
        .iter()
        .map(|(key, value)| (key.clone(), vec![value.clone()]))
        .collect()
}

/// Flattens multi-valued parameters back to one value per key.
///
/// The first value wins; keys without values are dropped.
#[must_use]
pub fn flatten_parameters(params: &DocumentParameters) -> BTreeMap<String, String> {
    params
        .iter()
        .filter_map(|(key, values)| values.first().map(|v| (key.clone(), v.clone())))
        .collect()
}

/// Expands `targets` blocks, preserving order.
#[must_use]
pub fn expand_targets(blocks: &[TargetBlock]) -> Vec<Target> {
    blocks
        .iter()
        .map(|b| Target {
            key: b.key.clone(),
            values: b.values.clone(),
        })
        .collect()
}

/// Flattens service targets into blocks, preserving order.
#[must_use]
pub fn flatten_targets(targets: &[Target]) -> Vec<TargetBlock> {
    targets
        .iter()
        .map(|t| TargetBlock {
            key: t.key.clone(),
            values: t.values.clone(),
        })
        .collect()
}

/// Expands the `output_location` block into the service object.
///
/// No block means no object. An empty key prefix is left unset.
#[must_use]
pub fn expand_output_location(
    blocks: &[OutputLocationBlock],
) -> Option<InstanceAssociationOutputLocation> {
    // At most one block is allowed.
    let block = blocks.first()?;

    Some(InstanceAssociationOutputLocation {
        s3_location: Some(S3OutputLocation {
            output_s3_bucket_name: block.s3_bucket_name.clone(),
            output_s3_key_prefix: block.s3_key_prefix.clone().filter(|p| !p.is_empty()),
        }),
    })
}

/// Flattens the service output location into zero or one block.
#[must_use]
pub fn flatten_output_location(
    location: Option<&InstanceAssociationOutputLocation>,
) -> Vec<OutputLocationBlock> {
    location
        .and_then(|l| l.s3_location.as_ref())
        .map(|s3| OutputLocationBlock {
            s3_bucket_name: s3.output_s3_bucket_name.clone(),
            s3_key_prefix: s3.output_s3_key_prefix.clone(),
        })
        .into_iter()
        .collect()
}
