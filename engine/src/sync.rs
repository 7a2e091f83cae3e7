//! Live synchronization of appointment views.
//!
//! [`SyncLayer`] consumes the appointment store's watch stream once and keeps
//! a materialized view of every record, ordered by `created_at` descending
//! (most recent first). Consumers call [`SyncLayer::subscribe`] to get an
//! initial snapshot plus an infinite stream of whole-record updates.
//!
//! # Fan-out
//!
//! Each subscriber owns an unbounded delivery queue. Publishing is a
//! non-blocking send into every matching queue, so one slow subscriber never
//! stalls the writer or any other subscriber. Snapshot and queue registration
//! happen under one lock, so no update falls between a subscription's
//! snapshot and its first event.
//!
//! # Cancellation
//!
//! Dropping a [`Subscription`] (or calling [`Subscription::cancel`]) ends
//! delivery; the layer reaps the dead queue on the next publish.

use agenda_core::appointment::{Appointment, AppointmentId};
use agenda_core::error::EngineError;
use agenda_core::store::{AppointmentEvent, AppointmentFilter, AppointmentStore};
use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt};
use std::collections::BTreeMap;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Ordered key of the materialized view: ascending `(created_at, id)`,
/// iterated in reverse for most-recent-first snapshots. The id component
/// disambiguates identical timestamps.
type ViewKey = (DateTime<Utc>, AppointmentId);

#[derive(Default)]
struct Inner {
    view: BTreeMap<ViewKey, Appointment>,
    subscribers: Vec<SubscriberHandle>,
}

struct SubscriberHandle {
    filter: AppointmentFilter,
    sender: mpsc::UnboundedSender<AppointmentEvent>,
}

/// Maintains live, ordered appointment views and fans out updates.
pub struct SyncLayer {
    inner: Mutex<Inner>,
}

impl SyncLayer {
    /// Starts the layer over the given store.
    ///
    /// Establishes a single `watch(All)` subscription and spawns the task
    /// that folds its events into the view. The task exits when the layer is
    /// dropped or the store ends the stream.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the watch subscription cannot be
    /// established.
    pub async fn start(store: Arc<dyn AppointmentStore>) -> Result<Arc<Self>, EngineError> {
        let mut stream = store.watch(AppointmentFilter::All).await?;

        let layer = Arc::new(Self {
            inner: Mutex::new(Inner::default()),
        });

        let weak = Arc::downgrade(&layer);
        tokio::spawn(async move {
            while let Some(result) = stream.next().await {
                let Some(layer) = weak.upgrade() else { break };
                match result {
                    Ok(event) => layer.apply(&event),
                    Err(error) => {
                        tracing::warn!(%error, "appointment watch stream error");
                    }
                }
            }
            tracing::debug!("appointment watch stream ended");
        });

        Ok(layer)
    }

    /// Subscribes to all appointments matching `filter`.
    ///
    /// The returned subscription carries a snapshot ordered most recent
    /// first and then yields every matching create or status change, in an
    /// order consistent with write order. A change that moves a record out
    /// of the filtered set (a pending view's appointment getting confirmed,
    /// say) is still delivered, so the consumer can drop the record from its
    /// view. A subscription is not restartable; call `subscribe` again for a
    /// fresh session.
    #[must_use]
    pub fn subscribe(&self, filter: AppointmentFilter) -> Subscription {
        let (sender, receiver) = mpsc::unbounded_channel();

        let mut inner = self.lock();
        let snapshot: Vec<Appointment> = inner
            .view
            .values()
            .rev()
            .filter(|appointment| filter.matches(appointment))
            .cloned()
            .collect();
        inner
            .subscribers
            .push(SubscriberHandle { filter, sender });

        tracing::debug!(?filter, snapshot_len = snapshot.len(), "subscription established");
        Subscription { snapshot, receiver }
    }

    /// Number of appointments currently pending an administrator decision.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.lock()
            .view
            .values()
            .filter(|appointment| appointment.is_pending())
            .count()
    }

    /// Folds one store event into the view and fans it out.
    ///
    /// An event is delivered to a subscriber when the record matches its
    /// filter now or matched it before this change. The second case is what
    /// lets a status-filtered view observe the event that carries a record
    /// out of its set. Dead subscribers (dropped receivers) are reaped here.
    fn apply(&self, event: &AppointmentEvent) {
        let appointment = event.appointment();
        let mut inner = self.lock();

        let previous = inner
            .view
            .insert((appointment.created_at, appointment.id), appointment.clone());

        inner.subscribers.retain(|subscriber| {
            let matches_now = subscriber.filter.matches(appointment);
            let matched_before = previous
                .as_ref()
                .is_some_and(|prior| subscriber.filter.matches(prior));
            if matches_now || matched_before {
                subscriber.sender.send(event.clone()).is_ok()
            } else {
                true
            }
        });
    }

    /// Locks the view, tolerating poison: a panicked subscriber thread must
    /// not take the whole layer down.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// A live view session: an initial snapshot plus an infinite update stream.
///
/// Implements [`Stream`] over [`AppointmentEvent`]; dropping it terminates
/// the session with no further deliveries.
pub struct Subscription {
    snapshot: Vec<Appointment>,
    receiver: mpsc::UnboundedReceiver<AppointmentEvent>,
}

impl Subscription {
    /// The view at subscription time, ordered most recent first.
    #[must_use]
    pub fn snapshot(&self) -> &[Appointment] {
        &self.snapshot
    }

    /// Waits for the next update event.
    ///
    /// Returns `None` only after the layer itself has shut down.
    pub async fn next_update(&mut self) -> Option<AppointmentEvent> {
        self.receiver.recv().await
    }

    /// Terminates the subscription.
    ///
    /// Equivalent to dropping it: no further events are delivered and the
    /// delivery queue is released.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Stream for Subscription {
    type Item = AppointmentEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("snapshot_len", &self.snapshot.len())
            .finish_non_exhaustive()
    }
}
