//! Virtual sensors — uniform random readings within a fixed range.

use std::future::Future;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use greenhouse_app::ports::Sensor;
use greenhouse_domain::error::GreenhouseError;
use greenhouse_domain::stat::StatType;

const THERMOMETER_MIN: f64 = 20.0;
const THERMOMETER_MAX: f64 = 30.0;
const HYGROMETER_MIN: f64 = 40.0;
const HYGROMETER_MAX: f64 = 90.0;

/// A simulated sensor producing readings uniformly drawn from `[min, max)`.
pub struct VirtualSensor {
    stat_type: StatType,
    min: f64,
    max: f64,
    rng: StdRng,
}

impl VirtualSensor {
    /// Degrees celsius between 20 and 30.
    #[must_use]
    pub fn thermometer() -> Self {
        Self::new(StatType::Temperature, THERMOMETER_MIN, THERMOMETER_MAX)
    }

    /// Percent humidity between 40 and 90.
    #[must_use]
    pub fn hygrometer() -> Self {
        Self::new(StatType::Humidity, HYGROMETER_MIN, HYGROMETER_MAX)
    }

    fn new(stat_type: StatType, min: f64, max: f64) -> Self {
        Self {
            stat_type,
            min,
            max,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace the entropy source with a seeded one, for reproducible runs.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}

impl Sensor for VirtualSensor {
    fn stat_type(&self) -> StatType {
        self.stat_type
    }

    fn read(&mut self) -> impl Future<Output = Result<f64, GreenhouseError>> + Send {
        let value = self.rng.gen_range(self.min..self.max);
        tracing::debug!(stat_type = %self.stat_type, value, "virtual reading");
        async move { Ok(value) }
    }
}
