//! Mock implementations of environment traits.

use agenda_core::environment::Clock;
use agenda_core::identity::{Identity, IdentityProvider, Role, UserId};
use chrono::{DateTime, Utc};

/// Fixed clock for deterministic tests.
///
/// Always returns the same time, making tests reproducible.
///
/// # Example
///
/// ```
/// use agenda_testing::mocks::FixedClock;
/// use agenda_core::environment::Clock;
/// use chrono::Utc;
///
/// let clock = FixedClock::new(Utc::now());
/// assert_eq!(clock.now(), clock.now());
/// ```
#[derive(Debug, Clone)]
pub struct FixedClock {
    time: DateTime<Utc>,
}

impl FixedClock {
    /// Create a new fixed clock with the given time.
    #[must_use]
    pub const fn new(time: DateTime<Utc>) -> Self {
        Self { time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.time
    }
}

/// Create a default fixed clock for tests (2026-08-25 12:00:00 UTC).
///
/// # Panics
///
/// This function will panic if the hardcoded timestamp fails to parse,
/// which should never happen in practice.
#[must_use]
#[allow(clippy::expect_used)]
pub fn test_clock() -> FixedClock {
    FixedClock::new(
        DateTime::parse_from_rfc3339("2026-08-25T12:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc),
    )
}

/// Identity provider with a fixed, session-resolved identity.
///
/// Mirrors how sessions work in production: the role is resolved once when
/// the session is established and simply handed back on every call.
#[derive(Debug, Clone)]
pub struct StaticIdentityProvider {
    identity: Option<Identity>,
}

impl StaticIdentityProvider {
    /// A session carrying the given identity.
    #[must_use]
    pub const fn of(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// A session with no authenticated user.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { identity: None }
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn current_user(&self) -> Option<Identity> {
        self.identity.clone()
    }
}

/// A fresh administrator identity for tests.
#[must_use]
pub fn test_admin() -> Identity {
    Identity::new(UserId::new(), "admin@example.com", Role::Administrator)
}

/// A fresh client identity for tests.
#[must_use]
pub fn test_client(email: &str) -> Identity {
    Identity::new(UserId::new(), email, Role::Client)
}
