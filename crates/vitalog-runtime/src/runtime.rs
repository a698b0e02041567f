use std::path::PathBuf;
use std::sync::Arc;

use vitalog_remote::{HttpGateway, RemoteGateway};
use vitalog_store::{CacheStore, FsStore, SnapshotStore};

use crate::config::{Config, SyncSettings};
use crate::coordinator::SyncCoordinator;
use crate::error::Result;

/// Facade wiring the concrete stores to the coordinator.
///
/// `open` is the production path (filesystem cache, HTTP gateway when one
/// is configured); `with_parts` takes any store/gateway pair and exists for
/// embedding and tests. Either way the startup mode decision has completed
/// by the time the value is returned.
pub struct Vitalog {
    coordinator: SyncCoordinator,
}

impl Vitalog {
    pub async fn open(config: Config, data_dir: PathBuf) -> Result<Self> {
        let store = FsStore::open(data_dir)?;
        let gateway = config
            .remote
            .as_ref()
            .map(|remote| {
                Arc::new(HttpGateway::new(&remote.url, &remote.api_key)) as Arc<dyn RemoteGateway>
            });
        Self::with_parts(Arc::new(store), gateway, config.sync).await
    }

    pub async fn with_parts(
        store: Arc<dyn SnapshotStore>,
        gateway: Option<Arc<dyn RemoteGateway>>,
        settings: SyncSettings,
    ) -> Result<Self> {
        let coordinator = SyncCoordinator::new(CacheStore::new(store), gateway, settings);
        coordinator.start().await;
        Ok(Self { coordinator })
    }

    pub fn coordinator(&self) -> &SyncCoordinator {
        &self.coordinator
    }
}
