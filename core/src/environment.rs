//! Injected dependencies shared by engine components.
//!
//! All external concerns are abstracted behind traits so business logic can
//! run identically in production and under deterministic tests.

use chrono::{DateTime, Utc};

/// Clock trait - abstracts time operations for testability.
///
/// The engine takes the current time from here both for validation (the "no
/// retroactive bookings" check) and for server-assigned `created_at`
/// timestamps, so a fixed clock makes every time-dependent path
/// deterministic.
pub trait Clock: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
