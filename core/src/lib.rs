//! # Agenda Core
//!
//! Shared domain types and collaborator contracts for the agenda appointment
//! booking engine.
//!
//! This crate defines WHAT the system talks about; the active components live
//! in `agenda-engine`:
//!
//! - **Appointments**: the [`appointment::Appointment`] record and its
//!   monotonic pending → confirmed/cancelled status machine
//! - **Catalog**: [`catalog::Service`] records and the singleton
//!   [`catalog::PracticeSchedule`] admission window
//! - **Identity**: [`identity::Identity`] with an explicit
//!   [`identity::Role`], resolved once at authentication time
//! - **Contracts**: dyn-compatible traits for the appointment store
//!   ([`store::AppointmentStore`]), the catalog store
//!   ([`catalog::CatalogStore`]) and the identity provider
//!   ([`identity::IdentityProvider`]), plus the [`environment::Clock`]
//!   abstraction
//! - **Errors**: the machine-distinguishable taxonomy in [`error`]
//!
//! ## Architecture Principles
//!
//! - External collaborators behind traits, injected via an environment
//! - No ambient or static state (the practice schedule is a store record)
//! - Whole-record update events, delivered per-subscriber
//! - Explicit `Result` errors; nothing is silently swallowed

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

pub mod appointment;
pub mod catalog;
pub mod environment;
pub mod error;
pub mod identity;
pub mod store;

pub use appointment::{
    Appointment, AppointmentId, AppointmentStatus, BookingCandidate, Slot, TerminalStatus,
};
pub use catalog::{CatalogStore, Money, PracticeSchedule, Service, ServiceId};
pub use environment::{Clock, SystemClock};
pub use error::{EngineError, StoreError, ValidationError};
pub use identity::{Identity, IdentityProvider, Role, UserId};
pub use store::{AppointmentEvent, AppointmentEventStream, AppointmentFilter, AppointmentStore};
