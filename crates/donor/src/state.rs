//! Application state shared across handlers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use make_lpa_core::PostcodeRule;

use crate::config::DonorConfig;
use crate::services::PlaceClient;
use crate::store::DonorStore;

/// Source of the current time.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the store, the postcode lookup client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DonorConfig,
    store: DonorStore,
    places: PlaceClient,
    postcode_rule: PostcodeRule,
    clock: Clock,
}

impl AppState {
    /// Create a new application state using the system clock.
    #[must_use]
    pub fn new(config: DonorConfig, store: DonorStore) -> Self {
        Self::with_clock(config, store, Arc::new(Utc::now))
    }

    /// Create a new application state with a fixed source of time.
    #[must_use]
    pub fn with_clock(config: DonorConfig, store: DonorStore, clock: Clock) -> Self {
        let places = PlaceClient::new(&config.ordnance_survey);
        let postcode_rule = config.postcode_rule();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                places,
                postcode_rule,
                clock,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &DonorConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn store(&self) -> &DonorStore {
        &self.inner.store
    }

    /// Get a reference to the OS Places API client.
    #[must_use]
    pub fn places(&self) -> &PlaceClient {
        &self.inner.places
    }

    #[must_use]
    pub fn postcode_rule(&self) -> &PostcodeRule {
        &self.inner.postcode_rule
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        (self.inner.clock)()
    }
}
