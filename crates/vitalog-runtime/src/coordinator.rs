use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use vitalog_remote::RemoteGateway;
use vitalog_store::{CacheStore, StoredAuth};
use vitalog_types::{
    now_millis, CheckupDraft, HealthRecord, ReminderDraft, ReminderRule, SessionIdentity,
};

use crate::config::SyncSettings;
use crate::error::{Error, Result};

/// Which data source is authoritative right now.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Startup: the remote session check has not resolved yet.
    Initializing,
    /// Remote store is authoritative; the local cache mirrors it.
    Cloud(SessionIdentity),
    /// Local cache only; no remote reads are attempted.
    Guest,
}

impl Mode {
    pub fn identity(&self) -> Option<&SessionIdentity> {
        match self {
            Mode::Cloud(identity) => Some(identity),
            _ => None,
        }
    }
}

/// State mutated only under the coordinator's lock.
struct Shared {
    mode: Mode,
    records: Vec<HealthRecord>,
    reminders: Vec<ReminderRule>,
    /// Bumped on every mode transition. Async sequences snapshot it before
    /// awaiting and re-check before committing, so a completion that
    /// outlives its mode (sign-out during a fetch, a late session check)
    /// is discarded instead of clobbering newer state.
    epoch: u64,
}

/// The state machine governing offline/cloud behavior.
///
/// Every write goes through the local cache first; the remote store is
/// written opportunistically and never blocks or fails a local operation.
pub struct SyncCoordinator {
    shared: Mutex<Shared>,
    cache: CacheStore,
    gateway: Option<Arc<dyn RemoteGateway>>,
    settings: SyncSettings,
}

impl SyncCoordinator {
    pub fn new(
        cache: CacheStore,
        gateway: Option<Arc<dyn RemoteGateway>>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            shared: Mutex::new(Shared {
                mode: Mode::Initializing,
                records: Vec::new(),
                reminders: Vec::new(),
                epoch: 0,
            }),
            cache,
            gateway,
            settings,
        }
    }

    /// Decide the starting mode. Never blocks past the configured session
    /// check timeout: the remote check races a timer, and whichever
    /// finishes first wins. Dropping the check future on timeout is what
    /// prevents a late completion from overriding the decision; the epoch
    /// guard covers the same race for any path that outlives an await.
    pub async fn start(&self) {
        {
            let mut shared = self.lock();
            shared.reminders = self.cache.load_reminders();
        }

        let Some(gateway) = self.gateway.clone() else {
            debug!("no remote backend configured, starting in guest mode");
            self.enter_guest();
            return;
        };

        if let Some(auth) = self.cache.load_auth() {
            gateway.restore_token(auth.access_token);
        }

        let epoch = self.current_epoch();
        let wait = Duration::from_millis(self.settings.session_check_timeout_ms);
        match timeout(wait, gateway.get_session()).await {
            Ok(Ok(Some(identity))) => {
                info!(email = %identity.email, "resuming cloud session");
                self.enter_cloud(identity, epoch).await;
            }
            Ok(Ok(None)) => {
                debug!("no remote session, starting in guest mode");
                self.enter_guest();
            }
            Ok(Err(err)) => {
                warn!(%err, "session check failed, starting in guest mode");
                self.enter_guest();
            }
            Err(_) => {
                warn!(timeout_ms = self.settings.session_check_timeout_ms,
                    "session check timed out, starting in guest mode");
                self.enter_guest();
            }
        }
    }

    pub fn mode(&self) -> Mode {
        self.lock().mode.clone()
    }

    /// Current authoritative record collection, newest first.
    pub fn history(&self) -> Vec<HealthRecord> {
        self.lock().records.clone()
    }

    /// Run an ad-hoc query over the authoritative collection.
    pub fn query(&self, input: &str) -> Result<Vec<HealthRecord>> {
        let records = self.history();
        Ok(vitalog_engine::run_query(&records, input)?)
    }

    /// Export the authoritative collection as delimited text.
    pub fn export_csv(&self) -> Result<String> {
        let records = self.history();
        Ok(vitalog_engine::to_csv_string(&records)?)
    }

    /// Record a new checkup entry.
    ///
    /// The local cache write is the durability guarantee and always happens
    /// before the remote insert is attempted; a remote failure is logged
    /// and swallowed, never rolled back. There is no retry queue: an entry
    /// written while disconnected stays local-only.
    pub async fn record_checkup(&self, draft: CheckupDraft) -> Result<HealthRecord> {
        let record = HealthRecord::from_draft(draft, now_millis());

        let (snapshot, owner) = {
            let mut shared = self.lock();
            shared.records.insert(0, record.clone());
            let cap = self.settings.history_window;
            shared.records.truncate(cap);
            let owner = shared
                .mode
                .identity()
                .map(|identity| identity.user_id.clone());
            (shared.records.clone(), owner)
        };

        self.cache.save_records(&snapshot)?;

        if let (Some(owner_id), Some(gateway)) = (owner, self.gateway.as_ref()) {
            if let Err(err) = gateway.insert_record(&record, &owner_id).await {
                warn!(%err, "remote insert failed, entry kept locally only");
            }
        }

        Ok(record)
    }

    /// Explicit sign-in; success enters cloud mode with a full resync.
    pub async fn sign_in(&self, email: &str, credential: &str) -> Result<SessionIdentity> {
        let gateway = self.gateway.as_ref().ok_or(Error::Unconfigured)?;
        let epoch = self.current_epoch();
        let identity = gateway.sign_in(email, credential).await?;
        self.enter_cloud(identity.clone(), epoch).await;
        Ok(identity)
    }

    pub async fn sign_up(
        &self,
        email: &str,
        credential: &str,
        display_name: &str,
    ) -> Result<SessionIdentity> {
        let gateway = self.gateway.as_ref().ok_or(Error::Unconfigured)?;
        let epoch = self.current_epoch();
        let identity = gateway.sign_up(email, credential, display_name).await?;
        self.enter_cloud(identity.clone(), epoch).await;
        Ok(identity)
    }

    /// Sign out. Always succeeds locally: guest mode, cleared record cache
    /// and stored credentials, regardless of what the remote call does.
    pub async fn sign_out(&self) -> Result<()> {
        {
            let mut shared = self.lock();
            shared.mode = Mode::Guest;
            shared.records.clear();
            shared.epoch += 1;
        }
        if let Err(err) = self.cache.clear_records() {
            warn!(%err, "failed to clear record snapshot on sign-out");
        }
        if let Err(err) = self.cache.clear_auth() {
            warn!(%err, "failed to clear stored credentials on sign-out");
        }

        if let Some(gateway) = self.gateway.as_ref() {
            if let Err(err) = gateway.sign_out().await {
                warn!(%err, "remote sign-out failed, local state already cleared");
            }
        }
        Ok(())
    }

    /// External session notification (token refresh, remote revocation).
    ///
    /// `None` while in cloud mode behaves like a sign-out without the
    /// remote call. A changed identity replaces the current one with no
    /// resync; an identical identity is a no-op. Notifications never move
    /// guest mode to cloud; that only happens through explicit sign-in.
    pub fn handle_session_change(&self, session: Option<SessionIdentity>) {
        let mut shared = self.lock();
        let current = match &shared.mode {
            Mode::Cloud(identity) => identity.clone(),
            _ => return,
        };

        match session {
            None => {
                info!("session ended remotely, dropping to guest mode");
                shared.mode = Mode::Guest;
                shared.records.clear();
                shared.epoch += 1;
                drop(shared);
                if let Err(err) = self.cache.clear_records() {
                    warn!(%err, "failed to clear record snapshot");
                }
                if let Err(err) = self.cache.clear_auth() {
                    warn!(%err, "failed to clear stored credentials");
                }
            }
            Some(identity) => {
                if identity == current {
                    return;
                }
                debug!(email = %identity.email, "session identity refreshed");
                shared.mode = Mode::Cloud(identity.clone());
                shared.epoch += 1;
                drop(shared);
                self.persist_auth(&identity);
            }
        }
    }

    pub fn reminders(&self) -> Vec<ReminderRule> {
        self.lock().reminders.clone()
    }

    pub fn add_reminder(&self, draft: ReminderDraft) -> Result<ReminderRule> {
        let rule = ReminderRule::from_draft(draft);
        let snapshot = {
            let mut shared = self.lock();
            shared.reminders.push(rule.clone());
            shared.reminders.clone()
        };
        self.cache.save_reminders(&snapshot)?;
        Ok(rule)
    }

    /// Flip a reminder's active flag. Returns false when no rule has the id.
    pub fn toggle_reminder(&self, id: uuid::Uuid) -> Result<bool> {
        let snapshot = {
            let mut shared = self.lock();
            let Some(rule) = shared.reminders.iter_mut().find(|rule| rule.id == id) else {
                return Ok(false);
            };
            rule.active = !rule.active;
            shared.reminders.clone()
        };
        self.cache.save_reminders(&snapshot)?;
        Ok(true)
    }

    /// Delete a reminder permanently. Returns false when no rule has the id.
    pub fn remove_reminder(&self, id: uuid::Uuid) -> Result<bool> {
        let snapshot = {
            let mut shared = self.lock();
            let before = shared.reminders.len();
            shared.reminders.retain(|rule| rule.id != id);
            if shared.reminders.len() == before {
                return Ok(false);
            }
            shared.reminders.clone()
        };
        self.cache.save_reminders(&snapshot)?;
        Ok(true)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Shared> {
        self.shared.lock().unwrap()
    }

    fn current_epoch(&self) -> u64 {
        self.lock().epoch
    }

    fn enter_guest(&self) {
        let records = self.cache.load_records();
        let mut shared = self.lock();
        shared.mode = Mode::Guest;
        shared.records = records;
        shared.epoch += 1;
    }

    /// Enter cloud mode: the remote window becomes authoritative and is
    /// mirrored into the cache. A fetch failure degrades silently to
    /// whatever the cache holds; the mode still changes, so writes start
    /// reaching the remote store again.
    async fn enter_cloud(&self, identity: SessionIdentity, initiated_epoch: u64) {
        let gateway = match self.gateway.as_ref() {
            Some(gateway) => gateway,
            None => return,
        };

        let fetched = gateway
            .list_records(&identity.user_id, self.settings.history_window)
            .await;

        {
            let mut shared = self.lock();
            if shared.epoch != initiated_epoch {
                debug!("discarding stale cloud transition");
                return;
            }

            shared.records = match fetched {
                Ok(mut records) => {
                    records.truncate(self.settings.history_window);
                    records
                }
                Err(err) => {
                    warn!(%err, "resync failed, serving cached records");
                    self.cache.load_records()
                }
            };
            shared.mode = Mode::Cloud(identity.clone());
            shared.epoch += 1;

            if let Err(err) = self.cache.save_records(&shared.records) {
                warn!(%err, "failed to mirror records into the cache");
            }
        }

        self.persist_auth(&identity);
    }

    fn persist_auth(&self, identity: &SessionIdentity) {
        let Some(gateway) = self.gateway.as_ref() else {
            return;
        };
        let Some(access_token) = gateway.auth_token() else {
            return;
        };
        let auth = StoredAuth {
            access_token,
            identity: identity.clone(),
        };
        if let Err(err) = self.cache.save_auth(&auth) {
            warn!(%err, "failed to persist auth session");
        }
    }
}
