//! Caller identity and role resolution.
//!
//! The engine never inspects credentials. An external identity provider
//! resolves the session once at authentication time and hands the engine an
//! [`Identity`] with an explicit [`Role`]. Role is a first-class attribute,
//! not something inferred from the email address, so authorization decisions
//! are uniform across every call site.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identifier for a user, assigned by the identity provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random `UserId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a `UserId` from an existing UUID.
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

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capability level of an authenticated caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A client who may book appointments and view their own.
    Client,
    /// The practice administrator who may transition appointments and manage
    /// the catalog and schedule.
    Administrator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Client => "client",
            Self::Administrator => "administrator",
        };
        write!(f, "{s}")
    }
}

/// An authenticated caller, as resolved by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable user identifier.
    pub user_id: UserId,
    /// Email address the user signed up with.
    pub email: String,
    /// Explicit role, resolved once at authentication time.
    pub role: Role,
}

impl Identity {
    /// Creates an identity.
    #[must_use]
    pub fn new(user_id: UserId, email: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            email: email.into(),
            role,
        }
    }

    /// Whether this caller carries the administrator capability.
    #[must_use]
    pub const fn is_administrator(&self) -> bool {
        matches!(self.role, Role::Administrator)
    }
}

/// Resolves the current session's identity.
///
/// Implementations are session-scoped: the identity (including its role) is
/// resolved when the session is established and simply handed back here.
/// `None` means no authenticated user is present.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the engine environment holds them
/// behind `Arc<dyn IdentityProvider>`.
pub trait IdentityProvider: Send + Sync {
    /// The identity of the current session, if any.
    fn current_user(&self) -> Option<Identity>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn administrator_capability_comes_from_role() {
        // The admin's email is irrelevant; only the role attribute counts.
        let admin = Identity::new(UserId::new(), "someone@example.com", Role::Administrator);
        let client = Identity::new(UserId::new(), "admin@admin.com", Role::Client);

        assert!(admin.is_administrator());
        assert!(!client.is_administrator());
    }

    #[test]
    fn user_id_display_round_trip() {
        let uuid = Uuid::new_v4();
        let id = UserId::from_uuid(uuid);
        assert_eq!(id.to_string(), uuid.to_string());
    }
}
