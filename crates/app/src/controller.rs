//! Controller — turns "on for a while, after a delay" requests into
//! idempotent hardware transitions of a single [`Unit`].
//!
//! The controller caches whether its unit is on. The cache is seeded from
//! [`Unit::status`] at construction and only changes right after a
//! successful [`Unit::on`] / [`Unit::off`]. Calls that find the cache
//! already in the requested state do nothing.
//!
//! Transitions of one controller are serialised: the cache lock is held for
//! the whole hardware call, so overlapping schedules cannot interleave.
//!
//! [`Controller::unit`] exposes the raw unit. Reading its status directly
//! can disagree with [`Controller::is_on`] while a transition is in flight.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use greenhouse_domain::error::GreenhouseError;
use greenhouse_domain::log::LogLevel;
use greenhouse_domain::unit::UnitStatus;

use crate::ports::{Logger, Unit};
use crate::scheduler::Scheduler;

struct Inner<U, L> {
    unit: U,
    logger: L,
    scheduler: Scheduler,
    is_on: Mutex<bool>,
}

/// Per-unit orchestrator. Cloning yields another handle onto the same unit
/// and cache.
pub struct Controller<U, L> {
    inner: Arc<Inner<U, L>>,
}

impl<U, L> Clone for Controller<U, L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<U, L> Controller<U, L>
where
    U: Unit + 'static,
    L: Logger + Send + Sync + 'static,
{
    /// Create a controller, seeding the cache from the unit's status.
    ///
    /// # Errors
    ///
    /// Propagates the unit's error when the status query fails; no
    /// controller is created in that case.
    pub async fn new(unit: U, logger: L, scheduler: Scheduler) -> Result<Self, GreenhouseError> {
        let status = unit.status().await.inspect_err(|err| {
            tracing::error!(unit = unit.name(), error = %err, "error creating controller");
        })?;

        tracing::debug!(unit = unit.name(), %status, "controller created");

        Ok(Self {
            inner: Arc::new(Inner {
                unit,
                logger,
                scheduler,
                is_on: Mutex::new(status.is_on()),
            }),
        })
    }

    /// Name of the controlled unit.
    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.unit.name()
    }

    /// The raw unit, for callers that want to query the hardware directly.
    #[must_use]
    pub fn unit(&self) -> &U {
        &self.inner.unit
    }

    /// Cached state. Waits for an in-flight transition to finish.
    pub async fn is_on(&self) -> bool {
        *self.inner.is_on.lock().await
    }

    /// Turn the unit on after `delay`, then off again `duration` later.
    ///
    /// Both transitions go through the scheduler. `duration` is not checked;
    /// callers are expected to reject empty durations themselves.
    pub async fn turn_unit_on(&self, delay: Duration, duration: Duration) {
        let name = self.name().to_string();

        let controller = self.clone();
        self.inner
            .scheduler
            .schedule(format!("turn on {name}"), delay, move || {
                let controller = controller.clone();
                async move { controller.turn_on_now().await }
            })
            .await;

        let controller = self.clone();
        self.inner
            .scheduler
            .schedule(
                format!("turn off {name}"),
                delay.saturating_add(duration),
                move || {
                    let controller = controller.clone();
                    async move { controller.turn_off_now().await }
                },
            )
            .await;
    }

    /// Turn the unit off right away, bypassing the scheduler.
    pub async fn turn_unit_off(&self) {
        self.turn_off_now().await;
    }

    async fn turn_on_now(&self) {
        self.transition(UnitStatus::On).await;
    }

    async fn turn_off_now(&self) {
        self.transition(UnitStatus::Off).await;
    }

    async fn transition(&self, target: UnitStatus) {
        let mut is_on = self.inner.is_on.lock().await;
        if *is_on == target.is_on() {
            return;
        }

        let result = match target {
            UnitStatus::On => self.inner.unit.on().await,
            UnitStatus::Off => self.inner.unit.off().await,
        };

        let name = self.name();
        match result {
            Ok(()) => {
                *is_on = target.is_on();
                tracing::info!(unit = name, status = %target, "unit transitioned");
                self.log_detached(LogLevel::Info, format!("{name} was turned {target}"));
            }
            Err(err) => {
                tracing::error!(
                    unit = name,
                    status = %target,
                    error = %err,
                    "unit transition failed"
                );
                self.log_detached(
                    LogLevel::Error,
                    format!("error turning {target} {name}: {}", describe(&err)),
                );
            }
        }
    }

    /// Hand `message` to the log sink without waiting for it.
    fn log_detached(&self, level: LogLevel, message: String) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            if let Err(err) = inner.logger.log(level, message.clone()).await {
                tracing::warn!(%message, error = %err, "error logging message");
            }
        });
    }
}

/// Render an error together with its source chain.
fn describe(err: &GreenhouseError) -> String {
    let mut out = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
