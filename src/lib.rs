//! Batch identity PSK provisioning for dashboard-managed wireless networks.
//!
//! Reads unit identifiers from an input list, generates secure passphrases,
//! creates a per-unit identity PSK credential through the controller's API
//! with bounded retry, and streams every outcome to a durable report that is
//! archived under a timestamped name at completion.
//!
//! ## Modules
//! - `cli` — Command-line handlers
//! - `api` — Dashboard API client (external collaborator surface)
//! - `core` — Business logic (passphrase, provision, batch, report)
//! - `config` — Startup configuration
//! - `models` — Data structures
//! - `util` — Filesystem utilities

pub mod api;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod models;
pub mod util;
