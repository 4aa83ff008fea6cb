//! Utility modules: calendar helpers, JSON files on disk, serde adapters.

pub mod dates;
pub mod persistence;
pub mod serde_helpers;
