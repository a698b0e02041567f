use async_trait::async_trait;

use vitalog_types::{HealthRecord, SessionIdentity};

use crate::error::Result;

/// The authoritative backend, seen through the narrowest possible door.
///
/// Every call may fail with `Disconnected` or `Rejected`; none of them
/// retry internally. Implementations keep whatever credential state they
/// need behind `auth_token`/`restore_token` so the coordinator can persist
/// a session across processes without knowing the token format.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Current authenticated identity, if the stored credential is still
    /// good. `Ok(None)` means "no session", not an error.
    async fn get_session(&self) -> Result<Option<SessionIdentity>>;

    async fn sign_in(&self, email: &str, credential: &str) -> Result<SessionIdentity>;

    async fn sign_up(
        &self,
        email: &str,
        credential: &str,
        display_name: &str,
    ) -> Result<SessionIdentity>;

    /// Best-effort remote sign-out. Local credential state is cleared even
    /// when the remote call fails; callers treat the error as advisory.
    async fn sign_out(&self) -> Result<()>;

    async fn insert_record(&self, record: &HealthRecord, owner_id: &str) -> Result<()>;

    /// Most recent records for `owner_id`, ordered timestamp-descending,
    /// at most `limit` rows.
    async fn list_records(&self, owner_id: &str, limit: usize) -> Result<Vec<HealthRecord>>;

    /// Opaque credential for persistence, when one is held.
    fn auth_token(&self) -> Option<String>;

    /// Resume a previously persisted credential. Validity is only
    /// established by the next `get_session` call.
    fn restore_token(&self, token: String);
}
