//! Upgrades persisted association state written by older schema versions.
//!
//! Persisted state is handed over as a [`RawResourceState`]: the schema
//! version it was written with, the resource identifier, and a flat JSON
//! attribute map. Each step upgrades by exactly one version.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{MigrationError, Result};
use crate::resource::{ManagedAssociation, SCHEMA_VERSION};

/// Persisted state as stored by the host, before decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RawResourceState {
    /// Schema version the state was written with. Missing means v0.
    #[serde(default)]
    pub schema_version: u32,
    /// Resource identifier.
    #[serde(default)]
    pub id: String,
    /// Flat attribute map.
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

/// Hook invoked when persisted state predates the current schema.
pub trait StateMigrator {
    /// Schema version this migrator upgrades to.
    fn current_version(&self) -> u32;

    /// Upgrades `state` from version `from` to `from + 1`.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be transformed.
    fn migrate_step(
        &self,
        from: u32,
        state: RawResourceState,
    ) -> std::result::Result<RawResourceState, MigrationError>;

    /// Upgrades `state` from `from_version` to the current version.
    ///
    /// Empty states pass through untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if `from_version` is newer than the current version
    /// or any step fails.
    fn migrate(
        &self,
        from_version: u32,
        mut state: RawResourceState,
    ) -> std::result::Result<RawResourceState, MigrationError> {
        let current = self.current_version();

        if from_version > current {
            return Err(MigrationError::UnsupportedVersion {
                found: from_version,
                current,
            });
        }

        if state.is_empty() {
            debug!("Empty state, nothing to migrate");
            return Ok(state);
        }

        for version in from_version..current {
            debug!("Migrating association state from v{version} to v{}", version + 1);
            state = self.migrate_step(version, state)?;
            state.schema_version = version + 1;
        }

        Ok(state)
    }
}

/// Migrator for the association resource.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssociationStateMigrator;

impl AssociationStateMigrator {
    /// Creates a new migrator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Migrates `state` to the current version and decodes it.
    ///
    /// # Errors
    ///
    /// Returns an error if migration fails or the attributes do not form a
    /// valid record.
    pub fn upgrade(&self, state: RawResourceState) -> Result<ManagedAssociation> {
        let from = state.schema_version;
        let state = self.migrate(from, state)?;

        if from < SCHEMA_VERSION {
            info!("Upgraded association state {} from v{from}", state.id);
        }

        let mut managed: ManagedAssociation =
            serde_json::from_value(Value::Object(state.attributes)).map_err(|e| {
                MigrationError::Decode {
                    message: e.to_string(),
                }
            })?;

        if state.id.is_empty() {
            managed.clear();
        } else {
            managed.set_id(&state.id);
        }

        Ok(managed)
    }

    /// v0 states were keyed by something other than the association id.
    fn v0_to_v1(
        mut state: RawResourceState,
    ) -> std::result::Result<RawResourceState, MigrationError> {
        let association_id = state
            .attributes
            .get("association_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .ok_or_else(|| MigrationError::Step {
                from: 0,
                message: String::from("association_id attribute is missing"),
            })?;

        debug!("Re-keying association state {} as {association_id}", state.id);

        state
            .attributes
            .insert(String::from("id"), Value::String(association_id.clone()));
        state.id = association_id;

        Ok(state)
    }
}

impl StateMigrator for AssociationStateMigrator {
    fn current_version(&self) -> u32 {
        SCHEMA_VERSION
    }

    fn migrate_step(
        &self,
        from: u32,
        state: RawResourceState,
    ) -> std::result::Result<RawResourceState, MigrationError> {
        match from {
            0 => Self::v0_to_v1(state),
            _ => Err(MigrationError::Step {
                from,
                message: String::from("no migration registered"),
            }),
        }
    }
}

impl RawResourceState {
    /// Captures a managed association as current-version raw state.
    #[must_use]
    pub fn from_managed(managed: &ManagedAssociation) -> Self {
        let attributes = match serde_json::to_value(managed) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };

        Self {
            schema_version: SCHEMA_VERSION,
            id: managed.id().unwrap_or_default().to_string(),
            attributes,
        }
    }

    /// Returns true if the state holds no identifier and no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_empty() && self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssociationError;
    use serde_json::json;

    fn v0_state() -> RawResourceState {
        let attributes = json!({
            "id": "i-0abc",
            "name": "AWS-RunShellScript",
            "association_id": "assoc-1",
            "instance_id": "i-0abc",
        });

        RawResourceState {
            schema_version: 0,
            id: String::from("i-0abc"),
            attributes: attributes.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn test_v0_rekeyed_by_association_id() {
        let migrated = AssociationStateMigrator::new()
            .migrate(0, v0_state())
            .expect("migration succeeds");

        assert_eq!(migrated.schema_version, 1);
        assert_eq!(migrated.id, "assoc-1");
        assert_eq!(migrated.attributes["id"], "assoc-1");
        assert_eq!(migrated.attributes["instance_id"], "i-0abc");
    }

    #[test]
    fn test_current_version_untouched() {
        let mut state = v0_state();
        state.schema_version = SCHEMA_VERSION;

        let migrated = AssociationStateMigrator::new()
            .migrate(SCHEMA_VERSION, state.clone())
            .expect("no-op");
        assert_eq!(migrated, state);
    }

    #[test]
    fn test_empty_state_passes_through() {
        let migrated = AssociationStateMigrator::new()
            .migrate(0, RawResourceState::default())
            .expect("empty passes");
        assert!(migrated.is_empty());
        assert_eq!(migrated.schema_version, 0);
    }

    #[test]
    fn test_newer_version_rejected() {
        let err = AssociationStateMigrator::new()
            .migrate(SCHEMA_VERSION + 1, v0_state())
            .unwrap_err();
        assert!(matches!(err, MigrationError::UnsupportedVersion { found: 2, current: 1 }));
    }

    #[test]
    fn test_v0_without_association_id_fails() {
        let mut state = v0_state();
        state.attributes.remove("association_id");

        let err = AssociationStateMigrator::new().migrate(0, state).unwrap_err();
        assert!(matches!(err, MigrationError::Step { from: 0, .. }));
    }

    #[test]
    fn test_upgrade_decodes_record() {
        let managed = AssociationStateMigrator::new()
            .upgrade(v0_state())
            .expect("upgrade succeeds");

        assert_eq!(managed.id(), Some("assoc-1"));
        assert_eq!(managed.record.name, "AWS-RunShellScript");
        assert_eq!(managed.record.association_id.as_deref(), Some("assoc-1"));
    }

    #[test]
    fn test_upgrade_rejects_malformed_attributes() {
        let mut state = v0_state();
        state.schema_version = SCHEMA_VERSION;
        state.attributes.insert(String::from("targets"), json!("not-a-list"));

        let err = AssociationStateMigrator::new().upgrade(state).unwrap_err();
        assert!(matches!(
            err,
            AssociationError::Migration(MigrationError::Decode { .. })
        ));
    }

    #[test]
    fn test_from_managed_round_trips_through_upgrade() {
        let mut managed = ManagedAssociation::new(
            crate::resource::AssociationRecord::new("doc").with_schedule("rate(1 day)"),
        );
        managed.set_id("assoc-7");
        managed.record.association_id = Some(String::from("assoc-7"));

        let raw = RawResourceState::from_managed(&managed);
        assert_eq!(raw.schema_version, SCHEMA_VERSION);
        assert_eq!(raw.id, "assoc-7");

        let restored = AssociationStateMigrator::new().upgrade(raw).expect("upgrade succeeds");
        assert_eq!(restored, managed);
    }

    #[test]
    fn test_raw_state_deserializes_without_version() {
        let state: RawResourceState =
            serde_json::from_str(r#"{"id": "x", "attributes": {"association_id": "assoc-9"}}"#)
                .expect("valid raw state");
        assert_eq!(state.schema_version, 0);
        assert_eq!(state.attributes["association_id"], "assoc-9");
    }
}
