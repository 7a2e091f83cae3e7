//! The appointment lifecycle engine.
//!
//! [`BookingEngine`] owns the two state-changing operations of the system:
//! client submission (creating a `Pending` appointment) and administrator
//! transition (moving it exactly once to a terminal status). All external
//! collaborators are injected through [`EngineEnvironment`], so the engine
//! itself holds no global state and runs identically against production
//! stores and in-memory test doubles.
//!
//! # Concurrency
//!
//! `submit` and `transition` may suspend only on the persistence round-trip.
//! Racing transitions on the same appointment are serialized by the store's
//! compare-and-set on the status field: exactly one wins the
//! pending → terminal step, the loser re-reads and reports the idempotent or
//! rejected outcome. Never a lost update, never both targets applied.

use crate::validator;
use agenda_core::appointment::{Appointment, AppointmentId, BookingCandidate, TerminalStatus};
use agenda_core::catalog::{CatalogStore, PracticeSchedule, Service, ServiceId};
use agenda_core::environment::Clock;
use agenda_core::error::EngineError;
use agenda_core::identity::{Identity, IdentityProvider, Role};
use agenda_core::store::AppointmentStore;
use std::sync::Arc;

/// Injected dependencies of the lifecycle engine.
///
/// One environment per session: the identity provider is session-scoped,
/// while the stores and clock are shared across all sessions.
#[derive(Clone)]
pub struct EngineEnvironment {
    /// Appointment persistence.
    pub appointments: Arc<dyn AppointmentStore>,
    /// Service catalog and practice schedule.
    pub catalog: Arc<dyn CatalogStore>,
    /// The current session's identity.
    pub identity: Arc<dyn IdentityProvider>,
    /// Time source for validation and `created_at` assignment.
    pub clock: Arc<dyn Clock>,
}

impl EngineEnvironment {
    /// Creates an environment from its collaborators.
    #[must_use]
    pub fn new(
        appointments: Arc<dyn AppointmentStore>,
        catalog: Arc<dyn CatalogStore>,
        identity: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            appointments,
            catalog,
            identity,
            clock,
        }
    }
}

/// The appointment lifecycle engine.
///
/// Cheap to clone; sessions typically hold their own engine over a shared
/// pair of stores.
#[derive(Clone)]
pub struct BookingEngine {
    env: EngineEnvironment,
}

impl BookingEngine {
    /// Creates an engine over the given environment.
    #[must_use]
    pub const fn new(env: EngineEnvironment) -> Self {
        Self { env }
    }

    /// Submits a booking candidate on behalf of the current session.
    ///
    /// Validates the candidate against the schedule snapshot read for this
    /// call, then persists a `Pending` appointment with a server-assigned
    /// `created_at`. Overlapping slot requests are not deduplicated; the
    /// administrator resolves conflicts by cancelling one of them. There is
    /// no idempotency key either, so callers must not retry a submission
    /// that may have committed.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Unauthenticated`] without a session identity
    /// - [`EngineError::Rejected`] with the validator's reason
    /// - [`EngineError::Store`] if persistence fails (no partial write)
    pub async fn submit(&self, candidate: BookingCandidate) -> Result<Appointment, EngineError> {
        let caller = self.authenticated()?;

        let schedule = self.env.catalog.get_schedule().await?;
        let now = self.env.clock.now();
        let slot = validator::validate(&candidate, schedule.as_ref(), now)?;

        let appointment = Appointment::new(
            AppointmentId::new(),
            caller.user_id,
            caller.email,
            candidate.service_name.trim(),
            slot,
            now,
        );
        let id = self.env.appointments.create(appointment.clone()).await?;

        tracing::info!(
            appointment_id = %id,
            user_id = %appointment.user_id,
            service = %appointment.service_name,
            slot = %slot,
            "appointment submitted"
        );
        Ok(appointment)
    }

    /// Transitions an appointment to a terminal status.
    ///
    /// Only the administrator may call this. A `Pending` appointment moves to
    /// `target`; re-issuing a transition that already happened returns the
    /// record unchanged; flipping one terminal status to the other fails.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Unauthenticated`] / [`EngineError::Unauthorized`]
    /// - [`EngineError::NotFound`] for an unknown id
    /// - [`EngineError::InvalidTransition`] when flipping a terminal status
    /// - [`EngineError::Store`] if the round-trip fails (safe to retry:
    ///   this operation is idempotent)
    pub async fn transition(
        &self,
        id: AppointmentId,
        target: TerminalStatus,
    ) -> Result<Appointment, EngineError> {
        let caller = self.administrator()?;
        let target_status = target.as_status();

        loop {
            let current = self
                .env
                .appointments
                .get_by_id(id)
                .await?
                .ok_or(EngineError::NotFound(id))?;

            if !current.status.is_pending() {
                if current.status == target_status {
                    tracing::debug!(
                        appointment_id = %id,
                        status = %target_status,
                        "transition already applied"
                    );
                    return Ok(current);
                }
                return Err(EngineError::InvalidTransition {
                    from: current.status,
                    to: target_status,
                });
            }

            let won = self
                .env
                .appointments
                .compare_and_set_status(id, current.status, target_status)
                .await?;
            if won {
                tracing::info!(
                    appointment_id = %id,
                    status = %target_status,
                    admin = %caller.user_id,
                    "appointment transitioned"
                );
                return Ok(current.with_status(target_status));
            }
            // Lost the race: another transition landed first. Re-read and
            // report the idempotent or rejected outcome.
        }
    }

    /// Replaces the practice schedule (administrator only, atomic replace).
    ///
    /// # Errors
    ///
    /// - [`EngineError::Unauthenticated`] / [`EngineError::Unauthorized`]
    /// - [`EngineError::Store`] if the round-trip fails
    pub async fn set_schedule(&self, schedule: PracticeSchedule) -> Result<(), EngineError> {
        let caller = self.administrator()?;
        self.env.catalog.set_schedule(schedule.clone()).await?;
        tracing::info!(hours = %schedule, admin = %caller.user_id, "practice schedule updated");
        Ok(())
    }

    /// Adds a service to the catalog (administrator only).
    ///
    /// # Errors
    ///
    /// - [`EngineError::Unauthenticated`] / [`EngineError::Unauthorized`]
    /// - [`EngineError::Store`] if the round-trip fails
    pub async fn add_service(&self, service: Service) -> Result<(), EngineError> {
        self.administrator()?;
        let (name, id) = (service.name.clone(), service.id);
        self.env.catalog.add_service(service).await?;
        tracing::info!(service = %name, service_id = %id, "service added");
        Ok(())
    }

    /// Removes a service from the catalog (administrator only).
    ///
    /// Existing appointments keep their service name snapshot.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Unauthenticated`] / [`EngineError::Unauthorized`]
    /// - [`EngineError::Store`] if the round-trip fails
    pub async fn remove_service(&self, id: ServiceId) -> Result<(), EngineError> {
        self.administrator()?;
        self.env.catalog.remove_service(id).await?;
        tracing::info!(service_id = %id, "service removed");
        Ok(())
    }

    /// All services currently offered. Unauthenticated read; the public
    /// offers page lists these.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Store`] if the round-trip fails
    pub async fn services(&self) -> Result<Vec<Service>, EngineError> {
        Ok(self.env.catalog.list_services().await?)
    }

    /// The current session's identity, or `Unauthenticated`.
    fn authenticated(&self) -> Result<Identity, EngineError> {
        self.env
            .identity
            .current_user()
            .ok_or(EngineError::Unauthenticated)
    }

    /// The current session's identity if it carries the administrator
    /// capability.
    fn administrator(&self) -> Result<Identity, EngineError> {
        let caller = self.authenticated()?;
        if caller.is_administrator() {
            Ok(caller)
        } else {
            Err(EngineError::Unauthorized {
                required: Role::Administrator,
            })
        }
    }
}
