//! In-memory catalog and schedule store for testing.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity

use agenda_core::catalog::{CatalogStore, PracticeSchedule, Service, ServiceId};
use agenda_core::error::StoreError;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

/// In-memory [`CatalogStore`].
///
/// The schedule lives in an `RwLock<Option<_>>`: reads are consistent
/// snapshots, the write is a single atomic replace, exactly the sharing
/// policy the engine expects of a production store.
#[derive(Clone, Default)]
pub struct InMemoryCatalogStore {
    inner: Arc<RwLock<CatalogInner>>,
}

#[derive(Default)]
struct CatalogInner {
    schedule: Option<PracticeSchedule>,
    services: Vec<Service>,
    unavailable: bool,
}

impl CatalogInner {
    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable {
            Err(StoreError::Unavailable("simulated outage".to_string()))
        } else {
            Ok(())
        }
    }
}

impl InMemoryCatalogStore {
    /// Create a new store with no schedule and no services.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-configured with the given schedule.
    #[must_use]
    pub fn with_schedule(schedule: PracticeSchedule) -> Self {
        let store = Self::new();
        store.inner.write().unwrap().schedule = Some(schedule);
        store
    }

    /// Number of services in the catalog. Useful for assertions in tests.
    #[must_use]
    pub fn service_count(&self) -> usize {
        self.inner.read().unwrap().services.len()
    }

    /// Simulate (or end) a store outage.
    ///
    /// While unavailable, every operation returns
    /// [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.write().unwrap().unavailable = unavailable;
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn get_schedule(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<PracticeSchedule>, StoreError>> + Send + '_>>
    {
        Box::pin(async move {
            let inner = self.inner.read().unwrap();
            inner.check_available()?;
            Ok(inner.schedule.clone())
        })
    }

    fn set_schedule(
        &self,
        schedule: PracticeSchedule,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>> {
        Box::pin(async move {
            let mut inner = self.inner.write().unwrap();
            inner.check_available()?;
            inner.schedule = Some(schedule);
            Ok(())
        })
    }

    fn list_services(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Service>, StoreError>> + Send + '_>> {
        Box::pin(async move {
            let inner = self.inner.read().unwrap();
            inner.check_available()?;
            Ok(inner.services.clone())
        })
    }

    fn add_service(
        &self,
        service: Service,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>> {
        Box::pin(async move {
            let mut inner = self.inner.write().unwrap();
            inner.check_available()?;
            inner.services.push(service);
            Ok(())
        })
    }

    fn remove_service(
        &self,
        id: ServiceId,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>> {
        Box::pin(async move {
            let mut inner = self.inner.write().unwrap();
            inner.check_available()?;
            inner.services.retain(|service| service.id != id);
            Ok(())
        })
    }
}
