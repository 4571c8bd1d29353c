//! Drivediff: Sync-Mirror Verification
//!
//! Compares a local input tree with its remote-synced mirror and reports
//! files present in one but not the other, honoring `.driveignore`
//! exclusion rules. Read-only: no content hashing, no sync operations.

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod ignore;
pub mod logging;
pub mod walk;
