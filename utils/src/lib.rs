//! Shared utilities for the Silo vault.

pub mod logging;

pub use logging::init_tracing;
