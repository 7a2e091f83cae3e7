//! Service catalog and the singleton practice schedule.
//!
//! The catalog store holds the [`Service`] records clients can book and the
//! single [`PracticeSchedule`] used to admit booking requests. The engine
//! reads the schedule on every submission; only the administrator mutates it,
//! as a single atomic replace. The schedule is a named configuration record
//! in the store, never ambient or static state, so tests can substitute it
//! freely.

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;
use uuid::Uuid;

/// Default appointment duration offered when creating a service, in minutes.
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

/// Unique identifier for a service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceId(Uuid);

impl ServiceId {
    /// Creates a new random `ServiceId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a `ServiceId` from an existing UUID.
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

impl Default for ServiceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Money value object, cents-based to avoid floating point errors.
///
/// Non-negative by construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Creates a `Money` value from cents.
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Returns the amount in cents.
    #[must_use]
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Errors constructing catalog records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A service must have a non-empty name.
    #[error("service name cannot be empty")]
    EmptyServiceName,

    /// A service must have a positive duration.
    #[error("service duration must be positive")]
    ZeroDuration,

    /// A schedule's opening time must precede its closing time.
    #[error("opening time {opening} must precede closing time {closing}")]
    InvalidHours {
        /// Requested opening time.
        opening: chrono::NaiveTime,
        /// Requested closing time.
        closing: chrono::NaiveTime,
    },
}

/// A bookable service offered by the practice.
///
/// Appointments reference services by name snapshot, so editing or deleting
/// a service never touches existing appointment records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Unique identifier.
    pub id: ServiceId,
    /// Display name, non-empty.
    pub name: String,
    /// Price of one appointment.
    pub price: Money,
    /// Appointment duration in minutes, positive.
    pub duration_minutes: u32,
}

impl Service {
    /// Creates a service, validating its invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyServiceName`] if `name` is empty after
    /// trimming, and [`CatalogError::ZeroDuration`] if `duration_minutes`
    /// is zero.
    pub fn new(
        name: impl Into<String>,
        price: Money,
        duration_minutes: u32,
    ) -> Result<Self, CatalogError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CatalogError::EmptyServiceName);
        }
        if duration_minutes == 0 {
            return Err(CatalogError::ZeroDuration);
        }
        Ok(Self {
            id: ServiceId::new(),
            name,
            price,
            duration_minutes,
        })
    }
}

/// The practice's singleton opening/closing window.
///
/// A request's time must lie within `[opening, closing)` to be admitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeSchedule {
    /// Opening time of day.
    pub opening: chrono::NaiveTime,
    /// Closing time of day, strictly after `opening`.
    pub closing: chrono::NaiveTime,
    /// Free-text attendance label shown to clients (e.g. "Mon-Sat").
    /// Informational only; plays no part in validation.
    pub days: Option<String>,
}

impl PracticeSchedule {
    /// Creates a schedule, enforcing `opening < closing`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidHours`] if `opening` is not strictly
    /// before `closing`.
    pub fn new(
        opening: chrono::NaiveTime,
        closing: chrono::NaiveTime,
        days: Option<String>,
    ) -> Result<Self, CatalogError> {
        if opening >= closing {
            return Err(CatalogError::InvalidHours { opening, closing });
        }
        Ok(Self {
            opening,
            closing,
            days,
        })
    }

    /// Whether a time of day falls within `[opening, closing)`.
    #[must_use]
    pub fn admits(&self, time: chrono::NaiveTime) -> bool {
        time >= self.opening && time < self.closing
    }
}

impl fmt::Display for PracticeSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.opening.format("%H:%M"),
            self.closing.format("%H:%M")
        )
    }
}

/// Catalog and practice-schedule store.
///
/// Reads take no lock (implementations return a consistent snapshot); the
/// schedule write is a single atomic replace.
///
/// # Dyn Compatibility
///
/// This trait uses explicit `Pin<Box<dyn Future>>` returns instead of
/// `async fn` to enable trait object usage (`Arc<dyn CatalogStore>`).
pub trait CatalogStore: Send + Sync {
    /// The current practice schedule, if one has been configured.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store round-trip fails.
    fn get_schedule(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<PracticeSchedule>, StoreError>> + Send + '_>>;

    /// Replaces the practice schedule atomically.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store round-trip fails.
    fn set_schedule(
        &self,
        schedule: PracticeSchedule,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>>;

    /// All services currently offered.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store round-trip fails.
    fn list_services(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Service>, StoreError>> + Send + '_>>;

    /// Adds a service to the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store round-trip fails.
    fn add_service(
        &self,
        service: Service,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>>;

    /// Removes a service from the catalog. Removing an unknown id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store round-trip fails.
    fn remove_service(
        &self,
        id: ServiceId,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[allow(clippy::unwrap_used)] // Panics: hardcoded test times always construct
    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn schedule_rejects_inverted_hours() {
        let result = PracticeSchedule::new(time(18, 0), time(8, 0), None);
        assert!(matches!(result, Err(CatalogError::InvalidHours { .. })));

        let result = PracticeSchedule::new(time(8, 0), time(8, 0), None);
        assert!(matches!(result, Err(CatalogError::InvalidHours { .. })));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn schedule_window_is_half_open() {
        let schedule = PracticeSchedule::new(time(8, 0), time(18, 0), None).unwrap();
        assert!(schedule.admits(time(8, 0)));
        assert!(schedule.admits(time(17, 59)));
        assert!(!schedule.admits(time(18, 0)));
        assert!(!schedule.admits(time(7, 59)));
    }

    #[test]
    fn service_validates_name_and_duration() {
        assert!(matches!(
            Service::new("  ", Money::from_cents(1500), 30),
            Err(CatalogError::EmptyServiceName)
        ));
        assert!(matches!(
            Service::new("Massage", Money::from_cents(1500), 0),
            Err(CatalogError::ZeroDuration)
        ));
        assert!(Service::new("Massage", Money::from_cents(1500), DEFAULT_DURATION_MINUTES).is_ok());
    }

    #[test]
    fn money_display() {
        assert_eq!(Money::from_cents(2550).to_string(), "25.50");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert!(Money::from_cents(0).is_zero());
    }
}
