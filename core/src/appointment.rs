//! Appointment records and their status state machine.
//!
//! An [`Appointment`] is created by a client booking request and lives forever
//! in the appointment store (the core never deletes records). Its only mutable
//! attribute is [`AppointmentStatus`], which moves exactly once from
//! [`AppointmentStatus::Pending`] to one of the two terminal states under
//! administrator action.

use crate::identity::UserId;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an appointment.
///
/// # Examples
///
/// ```
/// use agenda_core::appointment::AppointmentId;
///
/// let id = AppointmentId::new();
/// assert_ne!(id, AppointmentId::new());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AppointmentId(Uuid);

impl AppointmentId {
    /// Creates a new random `AppointmentId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an `AppointmentId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AppointmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of an appointment.
///
/// `Pending` is the initial status assigned at submission. `Confirmed` and
/// `Cancelled` are terminal: once reached, no further transition is permitted.
/// Re-issuing the transition that already happened is a no-op, not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    /// Awaiting an administrator decision.
    Pending,
    /// Approved by the administrator (terminal).
    Confirmed,
    /// Rejected by the administrator (terminal).
    Cancelled,
}

impl AppointmentStatus {
    /// Whether this status admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::Cancelled)
    }

    /// Whether this is the initial `Pending` status.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// Target of an administrator transition.
///
/// A separate type rather than [`AppointmentStatus`] so that "transition back
/// to pending" is unrepresentable in the engine's API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalStatus {
    /// Approve the appointment.
    Confirmed,
    /// Reject the appointment.
    Cancelled,
}

impl TerminalStatus {
    /// The corresponding [`AppointmentStatus`] value.
    #[must_use]
    pub const fn as_status(self) -> AppointmentStatus {
        match self {
            Self::Confirmed => AppointmentStatus::Confirmed,
            Self::Cancelled => AppointmentStatus::Cancelled,
        }
    }
}

impl fmt::Display for TerminalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_status().fmt(f)
    }
}

impl From<TerminalStatus> for AppointmentStatus {
    fn from(target: TerminalStatus) -> Self {
        target.as_status()
    }
}

/// A requested (date, time) pair, produced by successful validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Requested calendar date.
    pub date: NaiveDate,
    /// Requested time of day.
    pub time: NaiveTime,
}

impl Slot {
    /// Creates a slot from an already-parsed date and time.
    #[must_use]
    pub const fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.time.format("%H:%M"))
    }
}

/// Raw booking input as submitted by a client.
///
/// Date and time are carried as text because the client supplies them as
/// text; the availability validator owns parsing and well-formedness checks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingCandidate {
    /// Name of the requested service.
    pub service_name: String,
    /// Requested date, expected as `YYYY-MM-DD`.
    pub date: String,
    /// Requested time of day, expected as `HH:MM`.
    pub time: String,
}

impl BookingCandidate {
    /// Creates a candidate from raw client input.
    #[must_use]
    pub fn new(
        service_name: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            date: date.into(),
            time: time.into(),
        }
    }
}

/// A persisted appointment record.
///
/// Every attribute except `status` is immutable after creation. `created_at`
/// is server-assigned at submission and is the ordering key for live views
/// (most recent first).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Unique identifier, assigned at submission.
    pub id: AppointmentId,
    /// Owning user (read access; never status mutation).
    pub user_id: UserId,
    /// Owning user's email, for the administrator's view.
    pub user_email: String,
    /// Name snapshot of the requested service.
    ///
    /// A snapshot rather than a live service id so the record survives later
    /// edits or deletion of the service.
    pub service_name: String,
    /// Requested calendar date.
    pub date: NaiveDate,
    /// Requested time of day.
    pub time: NaiveTime,
    /// Current lifecycle status.
    pub status: AppointmentStatus,
    /// Server-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Creates a new `Pending` appointment for the given owner and slot.
    #[must_use]
    pub fn new(
        id: AppointmentId,
        user_id: UserId,
        user_email: impl Into<String>,
        service_name: impl Into<String>,
        slot: Slot,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            user_email: user_email.into(),
            service_name: service_name.into(),
            date: slot.date,
            time: slot.time,
            status: AppointmentStatus::Pending,
            created_at,
        }
    }

    /// The requested slot of this appointment.
    #[must_use]
    pub const fn slot(&self) -> Slot {
        Slot::new(self.date, self.time)
    }

    /// Whether the appointment is still awaiting a decision.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    /// Returns a copy of this record with the given status.
    #[must_use]
    pub fn with_status(&self, status: AppointmentStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::UserId;

    #[allow(clippy::unwrap_used)] // Panics: hardcoded test date/time always parse
    fn sample(created_at: DateTime<Utc>) -> Appointment {
        let slot = Slot::new(
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        );
        Appointment::new(
            AppointmentId::new(),
            UserId::new(),
            "client@example.com",
            "Consultation",
            slot,
            created_at,
        )
    }

    #[test]
    fn new_appointment_starts_pending() {
        let appointment = sample(Utc::now());
        assert_eq!(appointment.status, AppointmentStatus::Pending);
        assert!(appointment.is_pending());
    }

    #[test]
    fn terminal_statuses() {
        assert!(!AppointmentStatus::Pending.is_terminal());
        assert!(AppointmentStatus::Confirmed.is_terminal());
        assert!(AppointmentStatus::Cancelled.is_terminal());
    }

    #[test]
    fn terminal_target_maps_to_status() {
        assert_eq!(
            TerminalStatus::Confirmed.as_status(),
            AppointmentStatus::Confirmed
        );
        assert_eq!(
            TerminalStatus::Cancelled.as_status(),
            AppointmentStatus::Cancelled
        );
    }

    #[test]
    fn with_status_leaves_other_fields_untouched() {
        let appointment = sample(Utc::now());
        let confirmed = appointment.with_status(AppointmentStatus::Confirmed);
        assert_eq!(confirmed.status, AppointmentStatus::Confirmed);
        assert_eq!(confirmed.id, appointment.id);
        assert_eq!(confirmed.slot(), appointment.slot());
        assert_eq!(confirmed.created_at, appointment.created_at);
    }

    #[test]
    fn status_display() {
        assert_eq!(AppointmentStatus::Pending.to_string(), "pending");
        assert_eq!(TerminalStatus::Cancelled.to_string(), "cancelled");
    }
}
