//! A remote gateway whose behavior is scripted per operation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use vitalog_remote::{Error, RemoteGateway, Result};
use vitalog_types::{HealthRecord, SessionIdentity};

/// What a scripted operation should do when called.
#[derive(Debug, Clone, Default)]
pub enum Behavior {
    /// Succeed normally.
    #[default]
    Ok,
    /// Fail with `Error::Rejected`.
    Reject(String),
    /// Fail with `Error::Disconnected`.
    Disconnect(String),
    /// Never resolve. Callers are expected to race this with a timeout;
    /// the pending future is simply dropped when they stop waiting.
    Hang,
}

impl Behavior {
    async fn apply(self) -> Result<()> {
        match self {
            Behavior::Ok => Ok(()),
            Behavior::Reject(message) => Err(Error::Rejected(message)),
            Behavior::Disconnect(message) => Err(Error::Disconnected(message)),
            Behavior::Hang => futures::future::pending().await,
        }
    }
}

/// Test double for the remote backend.
///
/// Scripted per operation group (session check, auth, insert, list); records
/// every inserted row and counts session checks so tests can assert on
/// traffic, not just outcomes.
#[derive(Default)]
pub struct ScriptedGateway {
    identity: Mutex<Option<SessionIdentity>>,
    remote_records: Mutex<Vec<HealthRecord>>,
    token: Mutex<Option<String>>,

    session_behavior: Mutex<Behavior>,
    auth_behavior: Mutex<Behavior>,
    insert_behavior: Mutex<Behavior>,
    list_behavior: Mutex<Behavior>,

    inserted: Mutex<Vec<(HealthRecord, String)>>,
    session_checks: AtomicUsize,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway that already has an authenticated session.
    pub fn signed_in(identity: SessionIdentity) -> Self {
        let gateway = Self::new();
        *gateway.identity.lock().unwrap() = Some(identity);
        *gateway.token.lock().unwrap() = Some("scripted-token".to_string());
        gateway
    }

    pub fn set_session_behavior(&self, behavior: Behavior) {
        *self.session_behavior.lock().unwrap() = behavior;
    }

    pub fn set_auth_behavior(&self, behavior: Behavior) {
        *self.auth_behavior.lock().unwrap() = behavior;
    }

    pub fn set_insert_behavior(&self, behavior: Behavior) {
        *self.insert_behavior.lock().unwrap() = behavior;
    }

    pub fn set_list_behavior(&self, behavior: Behavior) {
        *self.list_behavior.lock().unwrap() = behavior;
    }

    /// Rows the backend will serve from `list_records`.
    pub fn set_remote_records(&self, records: Vec<HealthRecord>) {
        *self.remote_records.lock().unwrap() = records;
    }

    /// Every row handed to `insert_record`, with its owner id.
    pub fn inserted(&self) -> Vec<(HealthRecord, String)> {
        self.inserted.lock().unwrap().clone()
    }

    pub fn session_checks(&self) -> usize {
        self.session_checks.load(Ordering::SeqCst)
    }

    fn behavior(&self, slot: &Mutex<Behavior>) -> Behavior {
        slot.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteGateway for ScriptedGateway {
    async fn get_session(&self) -> Result<Option<SessionIdentity>> {
        self.session_checks.fetch_add(1, Ordering::SeqCst);
        self.behavior(&self.session_behavior).apply().await?;
        Ok(self.identity.lock().unwrap().clone())
    }

    async fn sign_in(&self, email: &str, _credential: &str) -> Result<SessionIdentity> {
        self.behavior(&self.auth_behavior).apply().await?;
        let identity = self
            .identity
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| SessionIdentity {
                user_id: format!("user-{}", email),
                email: email.to_string(),
                display_name: None,
            });
        *self.identity.lock().unwrap() = Some(identity.clone());
        *self.token.lock().unwrap() = Some("scripted-token".to_string());
        Ok(identity)
    }

    async fn sign_up(
        &self,
        email: &str,
        credential: &str,
        display_name: &str,
    ) -> Result<SessionIdentity> {
        let identity = self.sign_in(email, credential).await?;
        let identity = SessionIdentity {
            display_name: Some(display_name.to_string()),
            ..identity
        };
        *self.identity.lock().unwrap() = Some(identity.clone());
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<()> {
        *self.token.lock().unwrap() = None;
        *self.identity.lock().unwrap() = None;
        self.behavior(&self.auth_behavior).apply().await
    }

    async fn insert_record(&self, record: &HealthRecord, owner_id: &str) -> Result<()> {
        self.behavior(&self.insert_behavior).apply().await?;
        self.inserted
            .lock()
            .unwrap()
            .push((record.clone(), owner_id.to_string()));
        Ok(())
    }

    async fn list_records(&self, _owner_id: &str, limit: usize) -> Result<Vec<HealthRecord>> {
        self.behavior(&self.list_behavior).apply().await?;
        let mut records = self.remote_records.lock().unwrap().clone();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records.truncate(limit);
        Ok(records)
    }

    fn auth_token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn restore_token(&self, token: String) {
        *self.token.lock().unwrap() = Some(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[tokio::test]
    async fn scripted_rejection_surfaces_as_rejected() {
        let gateway = ScriptedGateway::new();
        gateway.set_auth_behavior(Behavior::Reject("bad credentials".to_string()));
        let err = gateway.sign_in("ada@example.com", "pw").await.unwrap_err();
        assert!(matches!(err, Error::Rejected(_)));
    }

    #[tokio::test]
    async fn list_serves_newest_first_and_respects_limit() {
        let gateway = ScriptedGateway::signed_in(fixtures::identity());
        gateway.set_remote_records(fixtures::sample_records(5));

        let records = gateway.list_records("user-1", 3).await.unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].timestamp > records[1].timestamp);
    }
}
