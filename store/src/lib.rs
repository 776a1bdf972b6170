//! Abstract storage traits for vault state.
//!
//! Every storage backend (embedded KV store, the host application's state
//! machine storage, in-memory for testing) implements these traits. The rest
//! of the workspace depends only on the traits.

pub mod error;
pub mod vault;

pub use error::StoreError;
pub use vault::VaultStore;
