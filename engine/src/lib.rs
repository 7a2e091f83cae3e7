//! # Agenda Engine
//!
//! The active components of the agenda appointment system:
//!
//! - [`validator`] — pure admissibility checks for booking candidates
//! - [`lifecycle`] — the [`lifecycle::BookingEngine`] state machine:
//!   submission creates `Pending` appointments, administrator transitions
//!   move them monotonically and idempotently to `Confirmed` or `Cancelled`
//! - [`sync`] — the [`sync::SyncLayer`] publish/subscribe fan-out keeping
//!   every live view (a client's own appointments, the administrator's full
//!   list) consistent with the write order
//!
//! Storage and transport are collaborator traits from `agenda-core`; the
//! in-memory implementations in `agenda-testing` back the test suites.
//!
//! ## Example
//!
//! ```ignore
//! use agenda_engine::lifecycle::{BookingEngine, EngineEnvironment};
//! use agenda_engine::sync::SyncLayer;
//! use agenda_core::{AppointmentFilter, BookingCandidate, TerminalStatus};
//!
//! let engine = BookingEngine::new(EngineEnvironment::new(
//!     appointments.clone(),
//!     catalog,
//!     identity,
//!     clock,
//! ));
//! let sync = SyncLayer::start(appointments).await?;
//!
//! let mut admin_view = sync.subscribe(AppointmentFilter::All);
//! let appointment = engine
//!     .submit(BookingCandidate::new("Consultation", "2026-09-01", "09:00"))
//!     .await?;
//! engine.transition(appointment.id, TerminalStatus::Confirmed).await?;
//! ```

pub mod lifecycle;
pub mod sync;
pub mod validator;

pub use lifecycle::{BookingEngine, EngineEnvironment};
pub use sync::{Subscription, SyncLayer};
pub use validator::validate;
