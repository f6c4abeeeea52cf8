//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`GreenhouseError`] via `#[from]` (or an explicit `From` impl for boxed
//! adapter errors). No variant carries a free-form message.

use crate::unit::UnitStatus;

/// Boxed source error produced by an adapter.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Base error crossing port boundaries.
#[derive(Debug, thiserror::Error)]
pub enum GreenhouseError {
    #[error("unit error")]
    Unit(#[from] UnitError),

    #[error("sensor error")]
    Sensor(#[from] SensorError),

    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("storage error")]
    Storage(#[source] BoxError),
}

/// Failures reported by an actuator.
#[derive(Debug, thiserror::Error)]
pub enum UnitError {
    /// The unit could not be reached at all.
    #[error("unit {unit} is unavailable")]
    Unavailable { unit: String },

    /// The unit was reached but refused or failed the transition.
    #[error("unit {unit} failed to turn {target}")]
    Transition {
        unit: String,
        target: UnitStatus,
        #[source]
        source: BoxError,
    },
}

/// Failures reported by a sensor.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("sensor {sensor} is unavailable")]
    Unavailable { sensor: &'static str },
}

/// Domain invariant violations.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("retention limit must be non-zero")]
    ZeroLimit,
}
