// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # SSM Association
//!
//! Declarative lifecycle management for a single AWS Systems Manager
//! association: a document bound to target instances, with parameters, a
//! schedule and an S3 output destination.
//!
//! ## Overview
//!
//! The crate sits between a declarative state host and the remote service:
//!
//! - Convert declared blocks to SSM request shapes and back
//! - Create, Read, Update and Delete an association
//! - Detect changes to write-once fields that force replacement
//! - Treat a vanished association as absent rather than as a failure
//! - Upgrade persisted state written by older schema versions
//!
//! The host owns persistence; every operation takes and returns records.
//!
//! ## Modules
//!
//! - [`resource`]: Record, schema, converters, validation and lifecycle
//! - [`planner`]: Change classification (update versus replace)
//! - [`migrate`]: Schema-version migration of persisted state
//! - [`ssm`]: Wire types, the [`SsmApi`] trait and the AWS SDK client
//! - [`config`]: Client settings and file loading
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! name: AWS-RunPatchBaseline
//! association_name: weekly-patch
//! schedule_expression: cron(0 2 ? * SUN *)
//! parameters:
//!   Operation: Install
//! targets:
//!   - key: tag:Patch
//!     values: [enabled]
//! output_location:
//!   - s3_bucket_name: ssm-logs
//!     s3_key_prefix: patch/
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod config;
pub mod error;
pub mod migrate;
pub mod planner;
pub mod resource;
pub mod ssm;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ClientSettings, ConfigParser};
pub use error::{AssociationError, Result};
pub use migrate::{AssociationStateMigrator, RawResourceState, StateMigrator};
pub use planner::{ChangeKind, ChangePlan, plan_change};
pub use resource::{AssociationRecord, AssociationResource, ManagedAssociation, ReadOutcome};
pub use ssm::{AwsSsmClient, SsmApi};
