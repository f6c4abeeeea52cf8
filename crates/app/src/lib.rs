//! # greenhouse-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `Unit` — a controllable actuator (water valve, fan, …)
//!   - `Storage` — record & query stats
//!   - `Logger` — record & query leveled log entries
//!   - `Sensor` — a periodically read environmental sensor
//! - Provide the **scheduler**: delayed, cancellable, named actions
//! - Provide the **controller**: idempotent on/off orchestration of one unit
//! - Provide the **monitor**: sensor polling that feeds `Storage`
//!
//! ## Dependency rule
//! Depends on `greenhouse-domain` only (plus `tokio` for tasks and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod controller;
pub mod monitor;
pub mod ports;
pub mod scheduler;
