//! Unit port — capability contract for a physical actuator.

use std::future::Future;
use std::sync::Arc;

use greenhouse_domain::error::GreenhouseError;
use greenhouse_domain::unit::UnitStatus;

/// A controllable actuator such as a water valve or a ventilation fan.
///
/// Hardware drivers and simulators implement this; the controller never
/// looks past it.
pub trait Unit: Send + Sync {
    /// Human-readable name, used in action names and log messages.
    fn name(&self) -> &str;

    /// Switch the unit on.
    fn on(&self) -> impl Future<Output = Result<(), GreenhouseError>> + Send;

    /// Switch the unit off.
    fn off(&self) -> impl Future<Output = Result<(), GreenhouseError>> + Send;

    /// Query the state the unit is actually in.
    fn status(&self) -> impl Future<Output = Result<UnitStatus, GreenhouseError>> + Send;
}

impl<T: Unit> Unit for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn on(&self) -> impl Future<Output = Result<(), GreenhouseError>> + Send {
        (**self).on()
    }

    fn off(&self) -> impl Future<Output = Result<(), GreenhouseError>> + Send {
        (**self).off()
    }

    fn status(&self) -> impl Future<Output = Result<UnitStatus, GreenhouseError>> + Send {
        (**self).status()
    }
}
