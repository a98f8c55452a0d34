//! Save and restore form state.
//!
//! A [`FormSnapshot`] captures what the user has typed and which errors are
//! showing, so a half-filled form can survive a page reload or process
//! restart. Rules and change handlers are not part of a snapshot; they come
//! from the form the snapshot is restored into.

use crate::core::FieldKey;
use crate::field::{Field, FieldPhase};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Saved state of one field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub value: String,
    pub error: bool,
    pub helper_text: Option<String>,
}

impl<K: FieldKey> From<&Field<K>> for FieldSnapshot {
    fn from(field: &Field<K>) -> Self {
        Self {
            value: field.value().to_string(),
            error: field.error(),
            helper_text: field.helper_text().map(str::to_string),
        }
    }
}

/// Serializable snapshot of a form.
///
/// # Example
///
/// ```rust
/// use formstate::core::Rule;
/// use formstate::checkpoint::FormSnapshot;
/// use formstate::form::FormController;
///
/// let form = FormController::new([("name".to_string(), Rule::required("name is required"))]).unwrap();
/// form.set_values([("name".to_string(), "Ann")]);
///
/// let json = form.snapshot().to_json().unwrap();
/// let restored = FormController::new([("name".to_string(), Rule::required("name is required"))]).unwrap();
/// restored.restore(&FormSnapshot::from_json(&json).unwrap()).unwrap();
///
/// assert_eq!(restored.values(), form.values());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: Uuid,

    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Whether the form had been validated at least once
    pub phase: FieldPhase,

    /// Field states keyed by field name
    pub fields: BTreeMap<String, FieldSnapshot>,
}

impl FormSnapshot {
    pub fn new(fields: BTreeMap<String, FieldSnapshot>, phase: FieldPhase) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            phase,
            fields,
        }
    }

    pub fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version == SNAPSHOT_VERSION {
            Ok(())
        } else {
            Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            })
        }
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|err| CheckpointError::SerializationFailed(err.to_string()))
    }

    /// Decode a JSON snapshot, rejecting unsupported versions.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|err| CheckpointError::DeserializationFailed(err.to_string()))?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|err| CheckpointError::SerializationFailed(err.to_string()))
    }

    /// Decode a binary snapshot, rejecting unsupported versions.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|err| CheckpointError::DeserializationFailed(err.to_string()))?;
        snapshot.check_version()?;
        Ok(snapshot)
    }
}
