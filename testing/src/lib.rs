//! # Agenda Testing
//!
//! Testing utilities for the agenda booking engine.
//!
//! This crate provides in-memory implementations of every external
//! collaborator the engine depends on, plus deterministic environment
//! mocks:
//!
//! - [`InMemoryAppointmentStore`]: `HashMap`-backed appointment store with
//!   real compare-and-set and watch semantics
//! - [`InMemoryCatalogStore`]: schedule and service catalog
//! - [`mocks::StaticIdentityProvider`]: session-resolved identities
//! - [`mocks::FixedClock`]: deterministic time
//!
//! ## Example
//!
//! ```ignore
//! use agenda_testing::{mocks, InMemoryAppointmentStore, InMemoryCatalogStore};
//!
//! let appointments = Arc::new(InMemoryAppointmentStore::new());
//! let catalog = Arc::new(InMemoryCatalogStore::with_schedule(schedule));
//! let identity = Arc::new(mocks::StaticIdentityProvider::of(mocks::test_admin()));
//! let clock = Arc::new(mocks::test_clock());
//! ```

pub mod appointment_store;
pub mod catalog_store;
pub mod mocks;

pub use appointment_store::InMemoryAppointmentStore;
pub use catalog_store::InMemoryCatalogStore;
pub use mocks::{FixedClock, StaticIdentityProvider, test_admin, test_client, test_clock};

/// Initialise compact tracing output for a test run.
///
/// Safe to call from every test; only the first call installs the
/// subscriber. Honors `RUST_LOG`.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .compact()
        .try_init();
}
