//! In-memory appointment store for fast, deterministic testing.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity

use agenda_core::appointment::{Appointment, AppointmentId, AppointmentStatus};
use agenda_core::error::StoreError;
use agenda_core::store::{
    AppointmentEvent, AppointmentEventStream, AppointmentFilter, AppointmentStore,
};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

/// In-memory [`AppointmentStore`] backed by a `HashMap`.
///
/// Implements the full contract: append-only creation, atomic
/// compare-and-set on the status field (under the store lock, so racing
/// transitions are serialized exactly like a production store would), and
/// `watch` subscriptions that replay existing records before live changes.
///
/// # Example
///
/// ```
/// use agenda_testing::InMemoryAppointmentStore;
///
/// let store = InMemoryAppointmentStore::new();
/// assert!(store.is_empty());
/// ```
#[derive(Clone, Default)]
pub struct InMemoryAppointmentStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    records: HashMap<AppointmentId, Appointment>,
    watchers: Vec<Watcher>,
    unavailable: bool,
}

struct Watcher {
    filter: AppointmentFilter,
    sender: mpsc::UnboundedSender<Result<AppointmentEvent, StoreError>>,
}

impl Inner {
    /// Fans an event out to all matching watchers, reaping dead ones.
    ///
    /// A watcher matches when the record matches its filter now or matched
    /// it as `previous`, so a status-filtered watcher still sees the change
    /// that carries a record out of its set.
    fn publish(&mut self, event: &AppointmentEvent, previous: Option<&Appointment>) {
        self.watchers.retain(|watcher| {
            let matches_now = watcher.filter.matches(event.appointment());
            let matched_before = previous.is_some_and(|prior| watcher.filter.matches(prior));
            if matches_now || matched_before {
                watcher.sender.send(Ok(event.clone())).is_ok()
            } else {
                true
            }
        });
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable {
            Err(StoreError::Unavailable("simulated outage".to_string()))
        } else {
            Ok(())
        }
    }
}

impl InMemoryAppointmentStore {
    /// Create a new empty in-memory appointment store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate (or end) a store outage.
    ///
    /// While unavailable, every operation returns
    /// [`StoreError::Unavailable`]; existing watch streams stay open.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Number of stored appointments. Useful for assertions in tests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    /// Synchronous lookup for test assertions.
    #[must_use]
    pub fn get(&self, id: AppointmentId) -> Option<Appointment> {
        self.lock().records.get(&id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }
}

impl AppointmentStore for InMemoryAppointmentStore {
    fn create(
        &self,
        appointment: Appointment,
    ) -> Pin<Box<dyn Future<Output = Result<AppointmentId, StoreError>> + Send + '_>> {
        Box::pin(async move {
            let mut inner = self.lock();
            inner.check_available()?;

            let id = appointment.id;
            inner.records.insert(id, appointment.clone());
            inner.publish(&AppointmentEvent::Created(appointment), None);
            Ok(id)
        })
    }

    fn get_by_id(
        &self,
        id: AppointmentId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Appointment>, StoreError>> + Send + '_>> {
        Box::pin(async move {
            let inner = self.lock();
            inner.check_available()?;
            Ok(inner.records.get(&id).cloned())
        })
    }

    fn compare_and_set_status(
        &self,
        id: AppointmentId,
        expected: AppointmentStatus,
        new: AppointmentStatus,
    ) -> Pin<Box<dyn Future<Output = Result<bool, StoreError>> + Send + '_>> {
        Box::pin(async move {
            let mut inner = self.lock();
            inner.check_available()?;

            let Some(record) = inner.records.get_mut(&id) else {
                return Ok(false);
            };
            if record.status != expected {
                return Ok(false);
            }
            let previous = record.clone();
            record.status = new;
            let updated = record.clone();
            inner.publish(&AppointmentEvent::StatusChanged(updated), Some(&previous));
            Ok(true)
        })
    }

    fn watch(
        &self,
        filter: AppointmentFilter,
    ) -> Pin<Box<dyn Future<Output = Result<AppointmentEventStream, StoreError>> + Send + '_>> {
        Box::pin(async move {
            let mut inner = self.lock();
            inner.check_available()?;

            let (sender, mut receiver) = mpsc::unbounded_channel();

            // Replay existing matching records (oldest first) before any
            // live event, under the same lock as registration so a watcher
            // never misses or double-sees a write.
            let mut existing: Vec<&Appointment> = inner
                .records
                .values()
                .filter(|appointment| filter.matches(appointment))
                .collect();
            existing.sort_by_key(|appointment| (appointment.created_at, appointment.id));
            for appointment in existing {
                let _ = sender.send(Ok(AppointmentEvent::Created(appointment.clone())));
            }

            inner.watchers.push(Watcher { filter, sender });
            drop(inner);

            let stream = async_stream::stream! {
                while let Some(item) = receiver.recv().await {
                    yield item;
                }
            };
            Ok(Box::pin(stream) as AppointmentEventStream)
        })
    }
}
