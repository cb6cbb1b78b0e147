#![deny(unsafe_code)]

//! Shared test utilities for the promptpack workspace.
//!
//! Provides reusable fixtures, config builders, a scriptable gateway stub,
//! and tracing helpers so that individual crate tests stay concise and
//! consistent.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! promptpack-test-utils = { workspace = true }
//! ```

pub mod config;
pub mod gateway;
pub mod project;
pub mod tracing_setup;

pub use config::TestConfigBuilder;
pub use gateway::StubGateway;
pub use project::ProjectBuilder;
pub use tracing_setup::init_test_tracing;
