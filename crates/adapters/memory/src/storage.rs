//! Ring-buffer implementation of [`Storage`] and [`Logger`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::{PoisonError, RwLock};

use greenhouse_app::ports::{Logger, Storage};
use greenhouse_domain::error::{GreenhouseError, ValidationError};
use greenhouse_domain::log::{LogEntry, LogLevel};
use greenhouse_domain::stat::{Stat, StatType};
use greenhouse_domain::time::{Timestamp, between, now};

use crate::error::MemoryError;
use crate::ring::Ring;

const URL_PREFIX: &str = "mock://";
const URL_HOST: &str = "fake";

/// Keeps the most recent `limit` stats per type and `limit` log entries.
#[derive(Debug)]
pub struct MemoryStorage {
    limit: usize,
    stats: RwLock<HashMap<StatType, Ring<Stat>>>,
    logs: RwLock<Ring<LogEntry>>,
}

impl MemoryStorage {
    /// Create an empty storage keeping `limit` records of each kind.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroLimit`] when `limit` is zero.
    pub fn new(limit: usize) -> Result<Self, ValidationError> {
        if limit == 0 {
            return Err(ValidationError::ZeroLimit);
        }
        Ok(Self {
            limit,
            stats: RwLock::new(HashMap::new()),
            logs: RwLock::new(Ring::new(limit)),
        })
    }

    /// Build from a `mock://fake/<limit>` connection string.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::UnsupportedUrl`] for any other shape,
    /// [`MemoryError::InvalidLimit`] when the limit is not a number and
    /// [`MemoryError::Validation`] when it is zero.
    pub fn from_url(url: &str) -> Result<Self, MemoryError> {
        let unsupported = || MemoryError::UnsupportedUrl {
            url: url.to_string(),
        };
        let rest = url.strip_prefix(URL_PREFIX).ok_or_else(unsupported)?;
        let (host, limit) = rest.split_once('/').ok_or_else(unsupported)?;
        if host != URL_HOST {
            return Err(unsupported());
        }
        let limit: usize = limit.parse()?;
        Self::new(limit).map_err(MemoryError::from)
    }

    /// Retention limit per stat type and for the log.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Storage for MemoryStorage {
    fn record(&self, stat: Stat) -> impl Future<Output = Result<(), GreenhouseError>> + Send {
        let mut stats = self.stats.write().unwrap_or_else(PoisonError::into_inner);
        stats
            .entry(stat.stat_type)
            .or_insert_with(|| Ring::new(self.limit))
            .push(stat);
        async { Ok(()) }
    }

    fn fetch(
        &self,
        stat_type: StatType,
        start: Timestamp,
        end: Timestamp,
    ) -> impl Future<Output = Result<Vec<Stat>, GreenhouseError>> + Send {
        let stats = self.stats.read().unwrap_or_else(PoisonError::into_inner);
        let result: Vec<Stat> = stats
            .get(&stat_type)
            .map(|ring| {
                ring.iter()
                    .filter(|stat| between(stat.when, start, end))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        async { Ok(result) }
    }

    fn latest(
        &self,
        stat_type: StatType,
    ) -> impl Future<Output = Result<Option<Stat>, GreenhouseError>> + Send {
        let stats = self.stats.read().unwrap_or_else(PoisonError::into_inner);
        let result = stats
            .get(&stat_type)
            .and_then(|ring| ring.iter().max_by_key(|stat| stat.when).cloned());
        async { Ok(result) }
    }
}

impl Logger for MemoryStorage {
    fn log(
        &self,
        level: LogLevel,
        message: String,
    ) -> impl Future<Output = Result<LogEntry, GreenhouseError>> + Send {
        match level {
            LogLevel::Debug => tracing::debug!("{message}"),
            LogLevel::Info => tracing::info!("{message}"),
            LogLevel::Warn => tracing::warn!("{message}"),
            LogLevel::Error => tracing::error!("{message}"),
        }

        let entry = LogEntry {
            when: now(),
            level,
            message,
        };
        self.logs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.clone());
        async { Ok(entry) }
    }

    fn logs(
        &self,
        min_level: LogLevel,
        start: Timestamp,
        end: Timestamp,
    ) -> impl Future<Output = Result<Vec<LogEntry>, GreenhouseError>> + Send {
        let logs = self.logs.read().unwrap_or_else(PoisonError::into_inner);
        let result: Vec<LogEntry> = logs
            .iter()
            .filter(|entry| entry.level >= min_level && between(entry.when, start, end))
            .cloned()
            .collect();
        async { Ok(result) }
    }
}
