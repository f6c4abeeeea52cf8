//! Sensor port — a periodically read environmental sensor.

use std::future::Future;

use greenhouse_domain::error::GreenhouseError;
use greenhouse_domain::stat::StatType;

/// A sensor producing one numeric reading per [`read`](Self::read).
pub trait Sensor: Send {
    /// Kind of value this sensor measures.
    fn stat_type(&self) -> StatType;

    /// Take a reading.
    fn read(&mut self) -> impl Future<Output = Result<f64, GreenhouseError>> + Send;
}
