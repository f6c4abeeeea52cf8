//! Storage ports — stat history and the leveled log sink.

use std::future::Future;
use std::sync::Arc;

use greenhouse_domain::error::GreenhouseError;
use greenhouse_domain::log::{LogEntry, LogLevel};
use greenhouse_domain::stat::{Stat, StatType};
use greenhouse_domain::time::Timestamp;

/// Repository for recording and querying [`Stat`]s.
pub trait Storage {
    /// Persist a new reading.
    fn record(&self, stat: Stat) -> impl Future<Output = Result<(), GreenhouseError>> + Send;

    /// Readings of `stat_type` taken within `[start, end]`, oldest first.
    fn fetch(
        &self,
        stat_type: StatType,
        start: Timestamp,
        end: Timestamp,
    ) -> impl Future<Output = Result<Vec<Stat>, GreenhouseError>> + Send;

    /// The most recent reading of `stat_type`, if any.
    fn latest(
        &self,
        stat_type: StatType,
    ) -> impl Future<Output = Result<Option<Stat>, GreenhouseError>> + Send;
}

/// Sink for leveled log messages that are kept for later query.
///
/// Must be safe for concurrent use: several controllers and fired actions
/// may log at the same time.
pub trait Logger {
    /// Record `message` at `level`, returning the stored entry.
    fn log(
        &self,
        level: LogLevel,
        message: String,
    ) -> impl Future<Output = Result<LogEntry, GreenhouseError>> + Send;

    /// Entries at `min_level` or above recorded within `[start, end]`.
    fn logs(
        &self,
        min_level: LogLevel,
        start: Timestamp,
        end: Timestamp,
    ) -> impl Future<Output = Result<Vec<LogEntry>, GreenhouseError>> + Send;
}

impl<T: Storage + Send + Sync> Storage for Arc<T> {
    fn record(&self, stat: Stat) -> impl Future<Output = Result<(), GreenhouseError>> + Send {
        (**self).record(stat)
    }

    fn fetch(
        &self,
        stat_type: StatType,
        start: Timestamp,
        end: Timestamp,
    ) -> impl Future<Output = Result<Vec<Stat>, GreenhouseError>> + Send {
        (**self).fetch(stat_type, start, end)
    }

    fn latest(
        &self,
        stat_type: StatType,
    ) -> impl Future<Output = Result<Option<Stat>, GreenhouseError>> + Send {
        (**self).latest(stat_type)
    }
}

impl<T: Logger + Send + Sync> Logger for Arc<T> {
    fn log(
        &self,
        level: LogLevel,
        message: String,
    ) -> impl Future<Output = Result<LogEntry, GreenhouseError>> + Send {
        (**self).log(level, message)
    }

    fn logs(
        &self,
        min_level: LogLevel,
        start: Timestamp,
        end: Timestamp,
    ) -> impl Future<Output = Result<Vec<LogEntry>, GreenhouseError>> + Send {
        (**self).logs(min_level, start, end)
    }
}
