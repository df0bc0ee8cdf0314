//! Key-value persistence for the session token and the poll ledger.
//!
//! Values are opaque strings (JSON in practice). Backends take `&self` so a
//! single store can be shared between services behind an `Arc`.

pub mod file;
pub mod memory;

use anyhow::Result;

pub use file::FileStore;
pub use memory::MemoryStore;

pub const AUTH_TOKEN_KEY: &str = "orion_auth_token";
pub const POLL_VOTES_KEY: &str = "orion_poll_votes";

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}
