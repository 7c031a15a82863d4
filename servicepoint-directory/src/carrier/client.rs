//! Carrier business-location HTTP client.
//!
//! Provides async methods for querying the carrier's service point
//! endpoints. Authentication is a per-client API key sent as a query
//! parameter, so the HTTP client itself is shared between clients.

use std::future::Future;
use std::time::Duration;

use crate::context::ClientContext;
use crate::domain::ServicePoint;

use super::convert::to_service_points;
use super::error::CarrierError;
use super::types::ServicePointListDto;

/// Default base URL for the carrier's business-location API.
const DEFAULT_BASE_URL: &str = "https://api2.postnord.com/rest/businesslocation";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 3;

/// Read-only view of the carrier's service point API.
///
/// The directory is generic over this trait so tests can substitute a
/// canned client; see [`super::mock::MockCarrierClient`].
pub trait CarrierApi {
    /// Fetch every service point for the client's country.
    fn fetch_all(
        &self,
        ctx: &ClientContext,
    ) -> impl Future<Output = Result<Vec<ServicePoint>, CarrierError>> + Send;

    /// Fetch a single service point by id, bypassing the bulk list.
    ///
    /// Returns `Ok(None)` when the carrier reports no match.
    fn fetch_by_id(
        &self,
        ctx: &ClientContext,
        id: &str,
    ) -> impl Future<Output = Result<Option<ServicePoint>, CarrierError>> + Send;

    /// Fetch the raw wire-format document for the client's country.
    ///
    /// Used to refresh the on-disk snapshot; the body is returned verbatim.
    fn fetch_all_raw(
        &self,
        ctx: &ClientContext,
    ) -> impl Future<Output = Result<String, CarrierError>> + Send;
}

/// Configuration for the carrier client.
#[derive(Debug, Clone)]
pub struct CarrierConfig {
    /// Base URL for the API (defaults to the carrier's production API)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl CarrierConfig {
    /// Create a config with the production base URL and the default
    /// 3 second timeout.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set a custom request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for CarrierConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the carrier's service point API.
#[derive(Debug, Clone)]
pub struct CarrierClient {
    http: reqwest::Client,
    base_url: String,
}

impl CarrierClient {
    /// Create a new carrier client with the given configuration.
    pub fn new(config: CarrierConfig) -> Result<Self, CarrierError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Perform a GET and return the response body after status checks.
    async fn get_body(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<String, CarrierError> {
        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(CarrierError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CarrierError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        // The API signals some failures as an empty or literal-null body
        if body.trim().is_empty() || body == "null" {
            return Err(CarrierError::MissingPayload);
        }

        Ok(body)
    }

    fn parse_document(body: &str) -> Result<ServicePointListDto, CarrierError> {
        serde_json::from_str(body).map_err(|e| CarrierError::Json {
            message: e.to_string(),
        })
    }
}

impl CarrierApi for CarrierClient {
    async fn fetch_all(&self, ctx: &ClientContext) -> Result<Vec<ServicePoint>, CarrierError> {
        let url = format!(
            "{}/v1/servicepoint/getServicePointInformation.json",
            self.base_url
        );
        let query = [
            ("apikey", ctx.api_key.clone()),
            ("countryCode", ctx.country.to_string()),
        ];

        let body = self.get_body(&url, &query).await?;
        let root = Self::parse_document(&body)?;

        to_service_points(&root).ok_or(CarrierError::MissingPayload)
    }

    async fn fetch_by_id(
        &self,
        ctx: &ClientContext,
        id: &str,
    ) -> Result<Option<ServicePoint>, CarrierError> {
        let url = format!(
            "{}/v1/servicepoint/findByServicePointId.json",
            self.base_url
        );
        let query = [
            ("apikey", ctx.api_key.clone()),
            ("countryCode", ctx.country.to_string()),
            ("servicePointId", id.to_string()),
        ];

        let body = self.get_body(&url, &query).await?;
        let root = Self::parse_document(&body)?;

        let points = to_service_points(&root).ok_or(CarrierError::MissingPayload)?;
        Ok(points.into_iter().next())
    }

    async fn fetch_all_raw(&self, ctx: &ClientContext) -> Result<String, CarrierError> {
        let url = format!(
            "{}/v1/servicepoint/getServicePointInformation.json",
            self.base_url
        );
        let query = [
            ("apikey", ctx.api_key.clone()),
            ("countryCode", ctx.country.to_string()),
        ];

        self.get_body(&url, &query).await
    }
}
