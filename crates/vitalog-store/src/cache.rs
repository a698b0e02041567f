use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use vitalog_types::{HealthRecord, ReminderRule, SessionIdentity};

use crate::error::Result;
use crate::snapshot::SnapshotStore;

/// Snapshot key for the bounded health-record window.
const RECORDS_KEY: &str = "health_records";
/// Snapshot key for reminder rules.
const REMINDERS_KEY: &str = "reminders";
/// Snapshot key for the persisted auth session.
const AUTH_KEY: &str = "auth_session";

/// Auth state persisted across processes so a restart can resume cloud mode
/// without re-entering credentials. The startup session check still decides
/// whether the token is actually good.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAuth {
    pub access_token: String,
    pub identity: SessionIdentity,
}

/// Typed cache over a [`SnapshotStore`].
///
/// Reads are infallible by contract: a missing snapshot is an empty
/// collection, and a corrupt one is logged and treated the same way. Writes
/// replace the whole snapshot for the key.
#[derive(Clone)]
pub struct CacheStore {
    store: Arc<dyn SnapshotStore>,
}

impl CacheStore {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self { store }
    }

    pub fn load_records(&self) -> Vec<HealthRecord> {
        self.load_collection(RECORDS_KEY)
    }

    pub fn save_records(&self, records: &[HealthRecord]) -> Result<()> {
        self.save_value(RECORDS_KEY, &records)
    }

    pub fn clear_records(&self) -> Result<()> {
        self.store.remove(RECORDS_KEY)
    }

    pub fn load_reminders(&self) -> Vec<ReminderRule> {
        self.load_collection(REMINDERS_KEY)
    }

    pub fn save_reminders(&self, reminders: &[ReminderRule]) -> Result<()> {
        self.save_value(REMINDERS_KEY, &reminders)
    }

    pub fn clear_reminders(&self) -> Result<()> {
        self.store.remove(REMINDERS_KEY)
    }

    pub fn load_auth(&self) -> Option<StoredAuth> {
        let raw = match self.store.get(AUTH_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key = AUTH_KEY, %err, "failed to read auth snapshot");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(auth) => Some(auth),
            Err(err) => {
                warn!(key = AUTH_KEY, %err, "discarding corrupt auth snapshot");
                None
            }
        }
    }

    pub fn save_auth(&self, auth: &StoredAuth) -> Result<()> {
        self.save_value(AUTH_KEY, auth)
    }

    pub fn clear_auth(&self) -> Result<()> {
        self.store.remove(AUTH_KEY)
    }

    fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(key, %err, "failed to read snapshot, treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(err) => {
                warn!(key, %err, "corrupt snapshot, treating as empty");
                Vec::new()
            }
        }
    }

    fn save_value<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw)
    }
}
