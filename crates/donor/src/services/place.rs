//! Ordnance Survey Places API client for postcode lookups.
//!
//! Looks up every delivery point at a postcode and turns each one into an
//! [`Address`]. Results are cached using `moka` (5-minute TTL).

use std::sync::Arc;
use std::time::Duration;

use make_lpa_core::{Address, DEFAULT_COUNTRY, LookupError, PostcodeLookup, lookup_postcode_query};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::OrdnanceSurveyConfig;

/// Path of the postcode search, relative to the API base URL.
const POSTCODE_PATH: &str = "/search/places/v1/postcode";

/// Errors that can occur when interacting with the OS Places API.
#[derive(Debug, Error)]
pub enum PlaceError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API rejected the postcode.
    #[error("bad request ({status_code}): {message}")]
    BadRequest { status_code: u16, message: String },

    /// API returned another non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<PlaceError> for LookupError {
    fn from(err: PlaceError) -> Self {
        match err {
            PlaceError::BadRequest {
                status_code,
                message,
            } => Self::InvalidPostcode {
                status_code,
                message,
            },
            other => Self::Failed(other.to_string()),
        }
    }
}

/// One delivery point address as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct AddressDetails {
    pub address: String,
    pub sub_building_name: String,
    pub building_name: String,
    pub building_number: String,
    pub thoroughfare_name: String,
    pub dependent_locality: String,
    pub post_town: String,
    pub postcode: String,
}

impl AddressDetails {
    /// Lay the delivery point out as address lines.
    ///
    /// The building (sub-building first) goes on its own line, then the
    /// numbered street, then the dependent locality.
    #[must_use]
    pub fn to_address(&self) -> Address {
        let building = join_present(&[&self.sub_building_name, &self.building_name], ", ");
        let street = join_present(&[&self.building_number, &self.thoroughfare_name], " ");

        let mut lines = [building, street, self.dependent_locality.clone()]
            .into_iter()
            .filter(|line| !line.is_empty());

        Address {
            line1: lines.next().unwrap_or_default(),
            line2: lines.next().unwrap_or_default(),
            line3: lines.next().unwrap_or_default(),
            town_or_city: self.post_town.clone(),
            postcode: self.postcode.clone(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

fn join_present(parts: &[&String], separator: &str) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .map(|part| part.as_str())
        .collect::<Vec<_>>()
        .join(separator)
}

#[derive(Debug, Deserialize)]
struct PostcodeResponse {
    #[serde(default)]
    results: Vec<PostcodeResult>,
}

#[derive(Debug, Deserialize)]
struct PostcodeResult {
    #[serde(rename = "DPA")]
    dpa: AddressDetails,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    statuscode: u16,
    message: String,
}

/// Client for the OS Places API.
///
/// Cheap to clone; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct PlaceClient {
    inner: Arc<PlaceClientInner>,
}

struct PlaceClientInner {
    client: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
    cache: Cache<String, Vec<Address>>,
}

impl PlaceClient {
    /// Create a new OS Places API client.
    #[must_use]
    pub fn new(config: &OrdnanceSurveyConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let endpoint = format!(
            "{}{POSTCODE_PATH}",
            config.base_url.as_str().trim_end_matches('/')
        );

        Self {
            inner: Arc::new(PlaceClientInner {
                client: reqwest::Client::new(),
                endpoint,
                api_key: config.api_key.clone(),
                cache,
            }),
        }
    }

    /// Find the addresses at a postcode.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceError::BadRequest`] when the API rejects the postcode,
    /// and another variant when the request or response handling fails.
    #[instrument(skip(self))]
    pub async fn find_addresses(&self, postcode: &str) -> Result<Vec<Address>, PlaceError> {
        let query = lookup_postcode_query(postcode);

        if let Some(addresses) = self.inner.cache.get(&query).await {
            debug!("Cache hit for postcode");
            return Ok(addresses);
        }

        let response = self
            .inner
            .client
            .get(&self.inner.endpoint)
            .query(&[
                ("postcode", query.as_str()),
                ("key", self.inner.api_key.expose_secret()),
            ])
            .timeout(Duration::from_secs(10))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == reqwest::StatusCode::BAD_REQUEST {
            let error: ErrorResponse = serde_json::from_str(&body)?;
            return Err(PlaceError::BadRequest {
                status_code: error.error.statuscode,
                message: error.error.message,
            });
        }

        if !status.is_success() {
            return Err(PlaceError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let response: PostcodeResponse = serde_json::from_str(&body)?;
        let addresses: Vec<Address> = response
            .results
            .iter()
            .map(|result| result.dpa.to_address())
            .collect();

        debug!(count = addresses.len(), "Postcode lookup complete");
        self.inner.cache.insert(query, addresses.clone()).await;

        Ok(addresses)
    }
}

impl PostcodeLookup for PlaceClient {
    async fn lookup_postcode(&self, postcode: &str) -> Result<Vec<Address>, LookupError> {
        Ok(self.find_addresses(postcode).await?)
    }
}
