//! Virtual unit — an on/off actuator that records every transition.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use greenhouse_app::ports::{Storage, Unit};
use greenhouse_domain::error::{GreenhouseError, ValidationError};
use greenhouse_domain::stat::{Stat, StatType};
use greenhouse_domain::unit::UnitStatus;

/// A simulated unit. Starts off.
///
/// Each transition is recorded as a [`Stat`] of the unit's [`StatType`]
/// (`1.0` on, `0.0` off) before the state changes; if recording fails the
/// state is left as it was and the storage error is returned.
#[derive(Debug)]
pub struct VirtualUnit<S> {
    name: String,
    stat_type: StatType,
    storage: S,
    state: Mutex<UnitStatus>,
}

impl<S> VirtualUnit<S>
where
    S: Storage + Send + Sync,
{
    /// Create a unit recording into `storage`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] if `name` is empty.
    pub fn new(
        name: impl Into<String>,
        stat_type: StatType,
        storage: S,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(Self {
            name,
            stat_type,
            storage,
            state: Mutex::new(UnitStatus::Off),
        })
    }

    /// A simulated water valve.
    pub fn water(storage: S) -> Self {
        Self::named("water", StatType::Water, storage)
    }

    /// A simulated ventilation fan.
    pub fn fan(storage: S) -> Self {
        Self::named("fan", StatType::Fan, storage)
    }

    fn named(name: &'static str, stat_type: StatType, storage: S) -> Self {
        Self {
            name: name.to_string(),
            stat_type,
            storage,
            state: Mutex::new(UnitStatus::Off),
        }
    }

    async fn switch(&self, target: UnitStatus) -> Result<(), GreenhouseError> {
        self.storage
            .record(Stat::now(self.stat_type, target.as_stat_value()))
            .await?;
        *self.lock_state() = target;
        tracing::info!(unit = %self.name, status = %target, "virtual unit switched");
        Ok(())
    }

    fn lock_state(&self) -> MutexGuard<'_, UnitStatus> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S> Unit for VirtualUnit<S>
where
    S: Storage + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn on(&self) -> impl Future<Output = Result<(), GreenhouseError>> + Send {
        self.switch(UnitStatus::On)
    }

    fn off(&self) -> impl Future<Output = Result<(), GreenhouseError>> + Send {
        self.switch(UnitStatus::Off)
    }

    fn status(&self) -> impl Future<Output = Result<UnitStatus, GreenhouseError>> + Send {
        let status = *self.lock_state();
        async move { Ok(status) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenhouse_domain::time::Timestamp;
    use std::sync::Arc;

    #[derive(Default)]
    struct SpyStorage {
        stats: Mutex<Vec<Stat>>,
        fail: bool,
    }

    impl Storage for SpyStorage {
        fn record(&self, stat: Stat) -> impl Future<Output = Result<(), GreenhouseError>> + Send {
            let result = if self.fail {
                Err(GreenhouseError::Storage(Box::new(std::io::Error::other(
                    "disk full",
                ))))
            } else {
                self.stats.lock().unwrap().push(stat);
                Ok(())
            };
            async { result }
        }

        fn fetch(
            &self,
            _stat_type: StatType,
            _start: Timestamp,
            _end: Timestamp,
        ) -> impl Future<Output = Result<Vec<Stat>, GreenhouseError>> + Send {
            let stats = self.stats.lock().unwrap().clone();
            async { Ok(stats) }
        }

        fn latest(
            &self,
            _stat_type: StatType,
        ) -> impl Future<Output = Result<Option<Stat>, GreenhouseError>> + Send {
            let last = self.stats.lock().unwrap().last().cloned();
            async { Ok(last) }
        }
    }

    #[tokio::test]
    async fn should_default_to_off() {
        let unit = VirtualUnit::water(SpyStorage::default());
        assert_eq!(unit.status().await.unwrap(), UnitStatus::Off);
    }

    #[tokio::test]
    async fn should_report_on_after_turning_on() {
        let unit = VirtualUnit::fan(SpyStorage::default());
        unit.on().await.unwrap();
        assert_eq!(unit.status().await.unwrap(), UnitStatus::On);
    }

    #[tokio::test]
    async fn should_record_stat_for_every_transition() {
        let storage = Arc::new(SpyStorage::default());
        let unit = VirtualUnit::water(Arc::clone(&storage));

        unit.on().await.unwrap();
        unit.off().await.unwrap();

        let stats = storage.stats.lock().unwrap().clone();
        let values: Vec<f64> = stats.iter().map(|stat| stat.value).collect();
        assert_eq!(values, [1.0, 0.0]);
        assert!(stats.iter().all(|stat| stat.stat_type == StatType::Water));
    }

    #[tokio::test]
    async fn should_keep_state_when_recording_fails() {
        let storage = SpyStorage {
            fail: true,
            ..SpyStorage::default()
        };
        let unit = VirtualUnit::fan(storage);

        let result = unit.on().await;

        assert!(matches!(result, Err(GreenhouseError::Storage(_))));
        assert_eq!(unit.status().await.unwrap(), UnitStatus::Off);
    }

    #[test]
    fn should_reject_empty_name() {
        let result = VirtualUnit::new("  ", StatType::Water, SpyStorage::default());
        assert!(matches!(result, Err(ValidationError::EmptyName)));
    }

    #[test]
    fn should_use_given_name() {
        let unit = VirtualUnit::new("misting", StatType::Water, SpyStorage::default()).unwrap();
        assert_eq!(unit.name(), "misting");
    }
}
