//! Scheduler — runs named actions after a delay and tracks the pending ones.
//!
//! Every action scheduled with a positive delay gets its own tokio task that
//! waits for either the delay to elapse or a cancellation signal. The
//! scheduler keeps the set of actions that have neither fired nor been
//! cancelled so callers can list or cancel them.
//!
//! A zero delay is special: the action is awaited inline, inside the
//! caller's task, before [`Scheduler::schedule`] returns, and no handle is
//! produced. Callers therefore block for the whole action with a zero delay
//! and not at all with a positive one.
//!
//! Cancellation races the timer. An action whose delay elapses at the same
//! moment it is cancelled may still run.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Notify;

use greenhouse_domain::id::ActionId;
use greenhouse_domain::time::{Timestamp, now};

type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type PerformFn = dyn Fn() -> BoxFuture + Send + Sync;

/// Handle to a pending delayed action.
///
/// Handles are cheap to clone; every clone refers to the same action.
#[derive(Clone)]
pub struct Action {
    id: ActionId,
    name: Arc<str>,
    created: Timestamp,
    start: Timestamp,
    perform: Arc<PerformFn>,
    signal: Arc<Notify>,
    scheduler: Weak<Inner>,
}

impl Action {
    #[must_use]
    pub fn id(&self) -> ActionId {
        self.id
    }

    /// Name given when the action was scheduled.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// When the action was scheduled.
    #[must_use]
    pub fn created(&self) -> Timestamp {
        self.created
    }

    /// When the action is due to fire (`created + delay`).
    #[must_use]
    pub fn start(&self) -> Timestamp {
        self.start
    }

    /// Run the wrapped callback directly, independent of the timer.
    pub async fn perform(&self) {
        (self.perform)().await;
    }

    /// Cancel the action.
    ///
    /// Removes it from the pending set and stops it from firing if its
    /// delay has not elapsed yet. Cancelling an action that already fired,
    /// or was already cancelled, does nothing.
    pub fn cancel(&self) {
        self.signal.notify_one();
        if let Some(inner) = self.scheduler.upgrade()
            && inner.remove(self.id)
        {
            tracing::debug!(action = %self.name, id = %self.id, "action cancelled");
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("created", &self.created)
            .field("start", &self.start)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct Inner {
    next_id: AtomicU64,
    pending: Mutex<HashMap<ActionId, Action>>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, HashMap<ActionId, Action>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert(&self, action: Action) {
        self.lock().insert(action.id, action);
    }

    fn remove(&self, id: ActionId) -> bool {
        self.lock().remove(&id).is_some()
    }
}

/// Drops a fired action from the pending set once its callback finishes,
/// even if the callback panics.
struct Fired {
    scheduler: Weak<Inner>,
    id: ActionId,
}

impl Drop for Fired {
    fn drop(&mut self) {
        if let Some(inner) = self.scheduler.upgrade() {
            inner.remove(self.id);
        }
    }
}

/// Engine executing delayed actions, shared by every controller.
///
/// Cloning yields another handle onto the same pending set.
#[derive(Clone, Default)]
pub struct Scheduler {
    inner: Arc<Inner>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` after `delay`.
    ///
    /// With a zero delay the action is awaited right here and `None` is
    /// returned. Otherwise the action is registered as pending, a task is
    /// spawned to fire it, and its handle is returned.
    pub async fn schedule<F, Fut>(
        &self,
        name: impl Into<String>,
        delay: Duration,
        action: F,
    ) -> Option<Action>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let name: Arc<str> = name.into().into();

        if delay.is_zero() {
            tracing::debug!(action = %name, "running action inline");
            action().await;
            return None;
        }

        let created = now();
        let start = TimeDelta::from_std(delay)
            .ok()
            .and_then(|delta| created.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let id = ActionId::from_raw(self.inner.next_id.fetch_add(1, Ordering::Relaxed));

        let handle = Action {
            id,
            name,
            created,
            start,
            perform: Arc::new(move || Box::pin(action()) as BoxFuture),
            signal: Arc::new(Notify::new()),
            scheduler: Arc::downgrade(&self.inner),
        };
        self.inner.insert(handle.clone());

        tracing::debug!(
            action = %handle.name,
            id = %handle.id,
            delay_ms = delay.as_millis(),
            "action scheduled"
        );

        let task = handle.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(delay) => {
                    tracing::debug!(action = %task.name, id = %task.id, "action firing");
                    let _fired = Fired {
                        scheduler: Weak::clone(&task.scheduler),
                        id: task.id,
                    };
                    (task.perform)().await;
                }
                () = task.signal.notified() => {}
            }
        });

        Some(handle)
    }

    /// Snapshot of the pending actions, in scheduling order.
    #[must_use]
    pub fn actions(&self) -> Vec<Action> {
        let mut actions: Vec<Action> = self.inner.lock().values().cloned().collect();
        actions.sort_by_key(Action::id);
        actions
    }

    /// Number of pending actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Cancel every pending action.
    ///
    /// Returns once the pending set is empty; the underlying tasks wind down
    /// on their own.
    pub fn cancel_all(&self) {
        let drained: Vec<Action> = self.inner.lock().drain().map(|(_, action)| action).collect();
        for action in &drained {
            action.signal.notify_one();
        }
        tracing::info!(count = drained.len(), "cancelled pending actions");
    }
}

impl fmt::Display for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Scheduler:{")?;
        for action in self.actions() {
            write!(f, "{{{}:{}}}", action.name, action.start)?;
        }
        f.write_str("}")
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.actions())
            .finish()
    }
}
