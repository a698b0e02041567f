//! Fixtures and doubles shared by vitalog test suites.

pub mod fixtures;
pub mod gateway;

pub use fixtures::{identity, record_with, sample_records, sample_reminder};
pub use gateway::{Behavior, ScriptedGateway};
