//! Appointment store contract and live-update events.
//!
//! The appointment store persists [`Appointment`] records and supports a live
//! subscription per query via [`AppointmentStore::watch`]. Creation is
//! append-only; the `status` field is the only mutable attribute and is
//! written exclusively through [`AppointmentStore::compare_and_set_status`],
//! so racing transitions on one record are serialized by the store and
//! exactly one wins.
//!
//! Update events carry the whole record, not field-level deltas, to keep
//! consumers simple.

use crate::appointment::{Appointment, AppointmentId, AppointmentStatus};
use crate::error::StoreError;
use crate::identity::UserId;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// A change to an appointment record, carrying its new full state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentEvent {
    /// A new appointment was created (always `Pending`).
    Created(Appointment),
    /// An appointment's status changed.
    StatusChanged(Appointment),
}

impl AppointmentEvent {
    /// The record after the change.
    #[must_use]
    pub const fn appointment(&self) -> &Appointment {
        match self {
            Self::Created(appointment) | Self::StatusChanged(appointment) => appointment,
        }
    }

    /// Stable name of the event kind, for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::StatusChanged(_) => "status_changed",
        }
    }
}

/// Which appointments a query or subscription covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentFilter {
    /// Every appointment (the administrator's view).
    All,
    /// Appointments owned by one user ("my appointments").
    ForUser(UserId),
    /// Appointments currently in the given status (dashboard queries).
    WithStatus(AppointmentStatus),
}

impl AppointmentFilter {
    /// Whether the given record matches this filter.
    #[must_use]
    pub fn matches(&self, appointment: &Appointment) -> bool {
        match self {
            Self::All => true,
            Self::ForUser(user_id) => appointment.user_id == *user_id,
            Self::WithStatus(status) => appointment.status == *status,
        }
    }
}

/// Stream of appointment change events from a subscription.
///
/// Infinite; a subscription ends only when the consumer drops the stream.
pub type AppointmentEventStream =
    Pin<Box<dyn Stream<Item = Result<AppointmentEvent, StoreError>> + Send>>;

/// Persistence contract for appointment records.
///
/// # Concurrency
///
/// - `create` is append-only; no record is ever created twice for the same
///   submission (the engine never retries submissions on its own).
/// - `compare_and_set_status` must be atomic with respect to concurrent calls
///   on the same id: of two racing transitions, exactly one observes `true`.
/// - `watch` delivery must not block the writer that produced an event.
///
/// # Dyn Compatibility
///
/// This trait uses explicit `Pin<Box<dyn Future>>` returns instead of
/// `async fn` to enable trait object usage (`Arc<dyn AppointmentStore>`).
pub trait AppointmentStore: Send + Sync {
    /// Persists a new appointment record and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the round-trip fails; no
    /// partial write occurs on failure.
    fn create(
        &self,
        appointment: Appointment,
    ) -> Pin<Box<dyn Future<Output = Result<AppointmentId, StoreError>> + Send + '_>>;

    /// Loads an appointment by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the round-trip fails.
    fn get_by_id(
        &self,
        id: AppointmentId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Appointment>, StoreError>> + Send + '_>>;

    /// Atomically sets `status` to `new` iff it currently equals `expected`.
    ///
    /// Returns `true` when the swap applied, `false` when the current status
    /// differed from `expected` (including when the id does not exist).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the round-trip fails.
    fn compare_and_set_status(
        &self,
        id: AppointmentId,
        expected: AppointmentStatus,
        new: AppointmentStatus,
    ) -> Pin<Box<dyn Future<Output = Result<bool, StoreError>> + Send + '_>>;

    /// Subscribes to changes of all records matching `filter`.
    ///
    /// The stream first replays every existing matching record as a
    /// [`AppointmentEvent::Created`] (oldest first), then delivers live
    /// changes. A change that moves a record out of the filtered set (a
    /// [`AppointmentFilter::WithStatus`] watcher's record changing status)
    /// is still delivered, so consumers can drop the record from their view.
    /// Events for one record are delivered in write order; across
    /// independent records no cross-ordering is guaranteed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the subscription cannot be
    /// established.
    fn watch(
        &self,
        filter: AppointmentFilter,
    ) -> Pin<Box<dyn Future<Output = Result<AppointmentEventStream, StoreError>> + Send + '_>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointment::Slot;
    use chrono::{NaiveDate, NaiveTime, Utc};

    #[allow(clippy::unwrap_used)] // Panics: hardcoded test date/time always parse
    fn appointment_for(user_id: UserId) -> Appointment {
        Appointment::new(
            AppointmentId::new(),
            user_id,
            "client@example.com",
            "Consultation",
            Slot::new(
                NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            ),
            Utc::now(),
        )
    }

    #[test]
    fn filter_all_matches_everything() {
        let appointment = appointment_for(UserId::new());
        assert!(AppointmentFilter::All.matches(&appointment));
    }

    #[test]
    fn filter_for_user_matches_owner_only() {
        let owner = UserId::new();
        let appointment = appointment_for(owner);

        assert!(AppointmentFilter::ForUser(owner).matches(&appointment));
        assert!(!AppointmentFilter::ForUser(UserId::new()).matches(&appointment));
    }

    #[test]
    fn filter_with_status_tracks_current_status() {
        let appointment = appointment_for(UserId::new());
        assert!(AppointmentFilter::WithStatus(AppointmentStatus::Pending).matches(&appointment));

        let confirmed = appointment.with_status(AppointmentStatus::Confirmed);
        assert!(!AppointmentFilter::WithStatus(AppointmentStatus::Pending).matches(&confirmed));
        assert!(AppointmentFilter::WithStatus(AppointmentStatus::Confirmed).matches(&confirmed));
    }

    #[test]
    fn event_exposes_record_and_kind() {
        let appointment = appointment_for(UserId::new());
        let created = AppointmentEvent::Created(appointment.clone());
        assert_eq!(created.kind(), "created");
        assert_eq!(created.appointment().id, appointment.id);

        let changed =
            AppointmentEvent::StatusChanged(appointment.with_status(AppointmentStatus::Cancelled));
        assert_eq!(changed.kind(), "status_changed");
    }
}
