//! Narrow contract over the hosted backend.
//!
//! The rest of the system only sees [`RemoteGateway`]: auth lifecycle,
//! record insertion, and time-ordered record listing. The gateway performs
//! no retries and owns no sync policy; both belong to the coordinator.

pub mod error;
pub mod gateway;
pub mod http;
pub mod wire;

pub use error::{Error, Result};
pub use gateway::RemoteGateway;
pub use http::HttpGateway;
pub use wire::RecordRow;
