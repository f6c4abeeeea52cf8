//! Monitor — polls sensors on a fixed frequency and records their readings.
//!
//! Each watched sensor gets a poll task that pushes [`Stat`]s onto a shared
//! channel; a single consumer task drains the channel into [`Storage`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use greenhouse_domain::stat::Stat;

use crate::ports::{Sensor, Storage};

/// Shortest polling period; smaller frequencies are raised to it.
pub const MIN_FREQUENCY: Duration = Duration::from_millis(1);

/// Sensor polling loop feeding a [`Storage`].
pub struct Monitor<S> {
    storage: Arc<S>,
    frequency: Duration,
    sender: mpsc::Sender<Stat>,
    receiver: Option<mpsc::Receiver<Stat>>,
    tasks: Vec<JoinHandle<()>>,
}

impl<S> Monitor<S>
where
    S: Storage + Send + Sync + 'static,
{
    /// Create a monitor reading every `frequency`, buffering up to
    /// `capacity` readings between the sensors and storage.
    ///
    /// `frequency` is raised to [`MIN_FREQUENCY`] when shorter.
    #[must_use]
    pub fn new(storage: S, frequency: Duration, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        Self {
            storage: Arc::new(storage),
            frequency: frequency.max(MIN_FREQUENCY),
            sender,
            receiver: Some(receiver),
            tasks: Vec::new(),
        }
    }

    /// Start polling `sensor`.
    pub fn watch<T: Sensor + 'static>(&mut self, sensor: T) {
        tracing::info!(
            stat_type = %sensor.stat_type(),
            frequency_ms = self.frequency.as_millis(),
            "watching sensor"
        );
        let task = tokio::spawn(poll(sensor, self.frequency, self.sender.clone()));
        self.tasks.push(task);
    }

    /// Start recording readings into storage. Calling it twice does nothing.
    pub fn start(&mut self) {
        if let Some(receiver) = self.receiver.take() {
            let task = tokio::spawn(record(Arc::clone(&self.storage), receiver));
            self.tasks.push(task);
        }
    }

    /// Whether any poll or record task is still alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.tasks.iter().any(|task| !task.is_finished())
    }

    /// Abort every poll and record task.
    pub fn stop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        tracing::debug!("sensor monitor stopped");
    }
}

impl<S> Drop for Monitor<S> {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

async fn poll<T: Sensor>(mut sensor: T, frequency: Duration, sender: mpsc::Sender<Stat>) {
    let stat_type = sensor.stat_type();
    let mut ticker = tokio::time::interval(frequency);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately; readings start one period in
    ticker.tick().await;

    loop {
        ticker.tick().await;
        match sensor.read().await {
            Ok(value) => {
                tracing::trace!(%stat_type, value, "sensor reading");
                if sender.send(Stat::now(stat_type, value)).await.is_err() {
                    break;
                }
            }
            Err(err) => {
                tracing::warn!(%stat_type, error = %err, "sensor read failed");
            }
        }
    }
}

async fn record<S: Storage>(storage: Arc<S>, mut receiver: mpsc::Receiver<Stat>) {
    while let Some(stat) = receiver.recv().await {
        let stat_type = stat.stat_type;
        if let Err(err) = storage.record(stat).await {
            tracing::warn!(%stat_type, error = %err, "error recording stat");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenhouse_domain::error::{GreenhouseError, SensorError};
    use greenhouse_domain::stat::StatType;
    use greenhouse_domain::time::Timestamp;
    use std::future::Future;
    use std::sync::Mutex;

    #[derive(Default)]
    struct SpyStorage {
        stats: Mutex<Vec<Stat>>,
    }

    impl SpyStorage {
        fn stats(&self) -> Vec<Stat> {
            self.stats.lock().unwrap().clone()
        }
    }

    impl Storage for SpyStorage {
        fn record(&self, stat: Stat) -> impl Future<Output = Result<(), GreenhouseError>> + Send {
            self.stats.lock().unwrap().push(stat);
            async { Ok(()) }
        }

        fn fetch(
            &self,
            stat_type: StatType,
            _start: Timestamp,
            _end: Timestamp,
        ) -> impl Future<Output = Result<Vec<Stat>, GreenhouseError>> + Send {
            let stats: Vec<_> = self
                .stats()
                .into_iter()
                .filter(|stat| stat.stat_type == stat_type)
                .collect();
            async { Ok(stats) }
        }

        fn latest(
            &self,
            stat_type: StatType,
        ) -> impl Future<Output = Result<Option<Stat>, GreenhouseError>> + Send {
            let latest = self
                .stats()
                .into_iter()
                .filter(|stat| stat.stat_type == stat_type)
                .max_by_key(|stat| stat.when);
            async { Ok(latest) }
        }
    }

    struct FixedSensor {
        stat_type: StatType,
        value: f64,
    }

    impl Sensor for FixedSensor {
        fn stat_type(&self) -> StatType {
            self.stat_type
        }

        fn read(&mut self) -> impl Future<Output = Result<f64, GreenhouseError>> + Send {
            let value = self.value;
            async move { Ok(value) }
        }
    }

    struct BrokenSensor;

    impl Sensor for BrokenSensor {
        fn stat_type(&self) -> StatType {
            StatType::Humidity
        }

        fn read(&mut self) -> impl Future<Output = Result<f64, GreenhouseError>> + Send {
            async {
                Err(SensorError::Unavailable {
                    sensor: "broken",
                }
                .into())
            }
        }
    }

    async fn wait_until(condition: impl Fn() -> bool) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while !condition() {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("condition should hold before the timeout");
    }

    #[tokio::test]
    async fn should_record_readings_from_every_sensor() {
        let storage = Arc::new(SpyStorage::default());
        let mut monitor = Monitor::new(Arc::clone(&storage), Duration::from_millis(5), 16);
        monitor.watch(FixedSensor {
            stat_type: StatType::Temperature,
            value: 24.5,
        });
        monitor.watch(FixedSensor {
            stat_type: StatType::Humidity,
            value: 61.0,
        });
        monitor.start();

        wait_until(|| {
            let stats = storage.stats();
            stats.iter().any(|s| s.stat_type == StatType::Temperature)
                && stats.iter().any(|s| s.stat_type == StatType::Humidity)
        })
        .await;
        monitor.stop();

        let temperature = storage.latest(StatType::Temperature).await.unwrap().unwrap();
        assert!((temperature.value - 24.5).abs() < f64::EPSILON);
        let humidity = storage.latest(StatType::Humidity).await.unwrap().unwrap();
        assert!((humidity.value - 61.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_skip_failed_reads() {
        let storage = Arc::new(SpyStorage::default());
        let mut monitor = Monitor::new(Arc::clone(&storage), Duration::from_millis(2), 16);
        monitor.watch(BrokenSensor);
        monitor.start();

        tokio::time::sleep(Duration::from_millis(30)).await;

        assert!(monitor.is_running());
        assert!(storage.stats().is_empty());
        monitor.stop();
    }

    #[tokio::test]
    async fn should_wait_one_period_before_first_reading() {
        let storage = Arc::new(SpyStorage::default());
        let mut monitor = Monitor::new(Arc::clone(&storage), Duration::from_secs(3600), 16);
        monitor.watch(FixedSensor {
            stat_type: StatType::Temperature,
            value: 20.0,
        });
        monitor.start();

        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(storage.stats().is_empty());
        monitor.stop();
    }

    #[tokio::test]
    async fn should_keep_polling_when_frequency_is_zero() {
        let storage = Arc::new(SpyStorage::default());
        let mut monitor = Monitor::new(Arc::clone(&storage), Duration::ZERO, 4);
        monitor.watch(FixedSensor {
            stat_type: StatType::Temperature,
            value: 22.0,
        });
        monitor.start();

        wait_until(|| !storage.stats().is_empty()).await;

        assert!(monitor.is_running());
        monitor.stop();
    }

    #[tokio::test]
    async fn should_stop_all_tasks() {
        let storage = Arc::new(SpyStorage::default());
        let mut monitor = Monitor::new(storage, Duration::from_millis(5), 16);
        monitor.watch(BrokenSensor);
        monitor.start();
        assert!(monitor.is_running());

        monitor.stop();

        assert!(!monitor.is_running());
    }
}
