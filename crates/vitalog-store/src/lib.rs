//! On-device persistence for vitalog.
//!
//! Two layers: [`SnapshotStore`] is the raw key/value capability (one
//! serialized snapshot per fixed key), and [`CacheStore`] is the typed cache
//! the coordinator talks to. Corrupt snapshots never propagate: a snapshot
//! that fails to parse reads as an empty collection and is logged.

pub mod cache;
pub mod error;
pub mod snapshot;

pub use cache::{CacheStore, StoredAuth};
pub use error::{Error, Result};
pub use snapshot::{FsStore, MemoryStore, SnapshotStore};
