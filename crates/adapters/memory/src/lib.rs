//! # greenhouse-adapter-memory
//!
//! In-memory persistence adapter implementing the
//! [`Storage`](greenhouse_app::ports::Storage) and
//! [`Logger`](greenhouse_app::ports::Logger) ports.
//!
//! ## Retention
//!
//! Each stat type and the log keep at most `limit` records. Once full, the
//! oldest record is evicted to make room for the newest. Nothing survives a
//! restart.
//!
//! ## Connection string
//!
//! `mock://fake/<limit>`, e.g. `mock://fake/40`.
//!
//! ## Dependency rule
//!
//! Depends on `greenhouse-app` (port traits) and `greenhouse-domain` only.

mod error;
mod ring;
mod storage;

pub use error::MemoryError;
pub use storage::MemoryStorage;
