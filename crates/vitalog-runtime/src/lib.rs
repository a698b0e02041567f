//! Runtime layer: decides which data source is authoritative at any moment
//! and keeps the local cache and the remote store reconciled across mode
//! transitions. Owns all mutable state; consumers (CLI, export) only see
//! the operations defined here.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod runtime;

pub use config::{resolve_data_path, Config, RemoteConfig, SyncSettings};
pub use coordinator::{Mode, SyncCoordinator};
pub use error::{Error, Result};
pub use runtime::Vitalog;
