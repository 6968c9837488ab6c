//! Integration tests for the Make an LPA donor pages.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory store and mocked OS Places API
//! cargo test -p make-lpa-integration-tests
//!
//! # Include the PostgreSQL store tests
//! DATABASE_URL=postgres://localhost/make_lpa_test \
//!     cargo test -p make-lpa-integration-tests -- --include-ignored
//! ```
//!
//! Each test starts the donor router on an ephemeral port with a fixed,
//! movable clock, and points postcode lookup at a `wiremock` server.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, TimeZone, Utc};
use make_lpa_core::Provided;
use make_lpa_donor::config::DonorConfig;
use make_lpa_donor::state::AppState;
use make_lpa_donor::store::DonorStore;
use reqwest::Client;
use reqwest::redirect::Policy;
use wiremock::MockServer;

/// API key accepted by the configuration checks.
pub const API_KEY: &str = "aB3xY9mK2nL5pQ7rT0uW4zC6";

/// A running donor server and its collaborators.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub store: DonorStore,
    pub places: MockServer,
    clock: Arc<Mutex<DateTime<Utc>>>,
}

/// The time every test starts at.
///
/// # Panics
///
/// Never; the date is a valid constant.
#[must_use]
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0)
        .single()
        .expect("valid start time")
}

impl TestContext {
    /// Start a server with an in-memory store holding `provided`.
    pub async fn start(provided: Provided) -> Self {
        Self::with_store(DonorStore::memory(), provided).await
    }

    /// Start a server over `store`, saving `provided` into it first.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started or `provided` cannot be saved.
    pub async fn with_store(store: DonorStore, provided: Provided) -> Self {
        let places = MockServer::start().await;

        let base = places.uri();
        let config = DonorConfig::from_vars(move |key| match key {
            "ORDNANCE_SURVEY_BASE_URL" => Some(base.clone()),
            "ORDNANCE_SURVEY_API_KEY" => Some(API_KEY.to_string()),
            _ => None,
        })
        .expect("Failed to build test configuration");

        let mut provided = provided;
        store
            .put(&mut provided, start_time())
            .await
            .expect("Failed to save test LPA");

        let clock = Arc::new(Mutex::new(start_time()));
        let reader = Arc::clone(&clock);
        let state = AppState::with_clock(
            config,
            store.clone(),
            Arc::new(move || *reader.lock().unwrap_or_else(PoisonError::into_inner)),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read test address");

        tokio::spawn(async move {
            axum::serve(listener, make_lpa_donor::app(state))
                .await
                .expect("Test server error");
        });

        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            store,
            places,
            clock,
        }
    }

    /// Absolute URL for a path on the server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        *self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move the server's clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.clock.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}
