//! Error types for the SSM association resource.
//!
//! This module provides the error hierarchy for every stage of an association's
//! lifecycle: client configuration, remote calls, record validation,
//! lifecycle orchestration, and persisted-state migration.

use std::path::PathBuf;
use thiserror::Error;

use crate::ssm::ApiOperation;

/// The main error type for the SSM association resource.
#[derive(Debug, Error)]
pub enum AssociationError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors returned by the remote service collaborator.
    #[error("SSM API error: {0}")]
    Ssm(#[from] SsmError),

    /// Lifecycle operation failures.
    #[error("{0}")]
    Resource(#[from] ResourceError),

    /// Record failed structural validation.
    #[error("Validation failed for {field}: {message}")]
    Validation {
        /// Field path that failed validation.
        field: String,
        /// Description of the violation.
        message: String,
    },

    /// Persisted-state migration errors.
    #[error("State migration error: {0}")]
    Migration(#[from] MigrationError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// An environment override holds an unusable value.
    #[error("Invalid value for {name}: {value}")]
    InvalidEnvVar {
        /// Name of the variable.
        name: String,
        /// The rejected value.
        value: String,
    },
}

/// Errors surfaced by the remote service client.
#[derive(Debug, Error)]
pub enum SsmError {
    /// The association is unknown to the service.
    #[error("Association does not exist: {association_id}")]
    AssociationDoesNotExist {
        /// Identifier that was looked up.
        association_id: String,
    },

    /// The request failed (network, auth, throttling, or service fault).
    #[error("{operation} request failed: {message}")]
    RequestFailed {
        /// Remote operation that failed.
        operation: ApiOperation,
        /// Underlying cause.
        message: String,
    },
}

/// Lifecycle operation on the managed association.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Create.
    Create,
    /// Read.
    Read,
    /// Update.
    Update,
    /// Delete.
    Delete,
}

/// Failures of the four lifecycle operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The remote call made by a lifecycle operation failed.
    #[error("Error {} SSM association{}: {source}", .operation.verb(), format_id(.id.as_deref()))]
    RemoteCall {
        /// Operation that issued the call.
        operation: Operation,
        /// Association identifier, when one was known.
        id: Option<String>,
        /// Underlying client error.
        #[source]
        source: SsmError,
    },

    /// A successful call returned no association descriptor.
    #[error("AssociationDescription was nil in {operation} response")]
    MissingDescription {
        /// Operation whose response was malformed.
        operation: Operation,
    },

    /// The returned descriptor carried no usable identifier.
    #[error("AssociationDescription has no AssociationId in {operation} response")]
    EmptyIdentifier {
        /// Operation whose response was malformed.
        operation: Operation,
    },

    /// The operation needs an association identifier but none was recorded.
    #[error("Cannot {operation} SSM association: no association id recorded")]
    MissingIdentifier {
        /// Operation that required the identifier.
        operation: Operation,
    },

    /// An in-place update was requested for a change to a write-once field.
    #[error("Change to {fields} requires replacing SSM association {id}, not an update")]
    RequiresReplacement {
        /// Association that would have been updated.
        id: String,
        /// Comma separated write-once fields that changed.
        fields: String,
    },
}

/// Errors raised while upgrading persisted records.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// The persisted record was written by a newer schema.
    #[error("Unsupported schema version {found} (current is {current})")]
    UnsupportedVersion {
        /// Version tag found on the record.
        found: u32,
        /// Version this crate understands.
        current: u32,
    },

    /// A migration step could not transform the record.
    #[error("Migration from v{from} failed: {message}")]
    Step {
        /// Version the step upgrades from.
        from: u32,
        /// Description of the failure.
        message: String,
    },

    /// The migrated attributes do not deserialize into a record.
    #[error("Migrated attributes are not a valid record: {message}")]
    Decode {
        /// Deserialization error.
        message: String,
    },
}

/// Result type alias for association operations.
pub type Result<T> = std::result::Result<T, AssociationError>;

/// Result type alias for remote client calls.
pub type SsmResult<T> = std::result::Result<T, SsmError>;

fn format_id(id: Option<&str>) -> String {
    id.map(|id| format!(" ({id})")).unwrap_or_default()
}

impl AssociationError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl SsmError {
    /// Creates a request failure for the given remote operation.
    #[must_use]
    pub fn request(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            operation,
            message: message.into(),
        }
    }

    /// Returns true if the service reported the association as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::AssociationDoesNotExist { .. })
    }
}

impl ResourceError {
    /// Wraps a client error with the operation and identifier it concerns.
    #[must_use]
    pub fn remote(operation: Operation, id: Option<&str>, source: SsmError) -> Self {
        Self::RemoteCall {
            operation,
            id: id.map(String::from),
            source,
        }
    }
}

impl Operation {
    /// Progressive verb used in error messages.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Create => "creating",
            Self::Read => "reading",
            Self::Update => "updating",
            Self::Delete => "deleting",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        write!(f, "{op}")
    }
}
