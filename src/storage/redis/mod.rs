//! Redis storage implementation
//!
//! One hash per fingerprint with native TTL. Resolved entries are removed
//! outright, so no history is retained in this backend.
//!
//! ## Module Structure
//!
//! - `pool` - Connection management, timeouts and health checks
//! - `scripts` - Lua scripts for conditional hash writes
//! - `backend` - `StorageBackend` implementation
//! - `tests` - Module tests

mod backend;
mod pool;
mod scripts;

pub use backend::RedisBackend;
pub use pool::RedisPool;
