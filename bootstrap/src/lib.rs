//! MongoDB test-instance bootstrap for connector integration tests.
//!
//! Seeds an ephemeral database instance with the principals, role grants,
//! and sample data the connector test suites expect before they run.

pub mod client;
pub mod config;
pub mod error;
pub mod exec;
pub mod principal;
pub mod script;
pub mod tracing_config;

pub use client::BootstrapClient;
pub use config::{BootstrapConfig, TlsSettings};
pub use error::{BootstrapError, BootstrapResult};
pub use exec::{AdminCommands, SeedSummary, apply};
pub use principal::{AckMode, EXTERNAL_AUTH_DB, Principal, Role, RoleGrant, WriteAck};
pub use script::{Product, SeedScript, SeedStep};
