//! # greenhouse-domain
//!
//! Pure domain model for the greenhouse controller.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **unit status** (the on/off state reported by an actuator)
//! - Define **stats** (timestamped sensor and unit readings)
//! - Define **log entries** (leveled messages kept for later query)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod log;
pub mod stat;
pub mod unit;
