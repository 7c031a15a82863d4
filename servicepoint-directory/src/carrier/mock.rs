//! Mock carrier client for testing without API access.
//!
//! Serves canned service points and programmable failure modes, and counts
//! calls so tests can assert which paths touched the carrier.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::context::ClientContext;
use crate::domain::ServicePoint;

use super::client::CarrierApi;
use super::error::CarrierError;

/// Failure mode for mock calls.
#[derive(Debug, Clone, Copy)]
pub enum MockFailure {
    /// Transport-level failure: no response at all.
    NoResponse,
    /// HTTP error status.
    Status(u16),
    /// Response body that does not parse as the wire format.
    BadBody,
}

impl MockFailure {
    fn to_error(self) -> CarrierError {
        match self {
            MockFailure::NoResponse => CarrierError::Api {
                status: 0,
                message: "service response was null".to_string(),
            },
            MockFailure::Status(401 | 403) => CarrierError::Unauthorized,
            MockFailure::Status(status) => CarrierError::Api {
                status,
                message: String::new(),
            },
            MockFailure::BadBody => CarrierError::Json {
                message: "expected wire format document".to_string(),
            },
        }
    }
}

/// Mock carrier client.
///
/// Clones share their call counters, so a test can keep a handle and
/// inspect how often the directory reached for the carrier.
#[derive(Clone, Default)]
pub struct MockCarrierClient {
    /// Points served by the bulk list endpoint.
    directory: Vec<ServicePoint>,

    /// Points served by the find-by-id endpoint, keyed by id.
    live: HashMap<String, ServicePoint>,

    /// Raw document served by the raw list fetch.
    raw: Option<String>,

    /// When set, every call fails with this mode.
    failure: Option<MockFailure>,

    all_calls: Arc<AtomicUsize>,
    by_id_calls: Arc<AtomicUsize>,
}

impl MockCarrierClient {
    /// Create a mock that serves nothing and never fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve these points from the bulk list endpoint.
    pub fn with_points(mut self, points: Vec<ServicePoint>) -> Self {
        self.directory = points;
        self
    }

    /// Serve this point from the find-by-id endpoint.
    pub fn with_live_point(mut self, point: ServicePoint) -> Self {
        self.live.insert(point.id.clone(), point);
        self
    }

    /// Serve this raw document from the raw list fetch.
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }

    /// Fail every call with the given mode.
    pub fn with_failure(mut self, failure: MockFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Number of bulk list fetches (including raw fetches) so far.
    pub fn all_calls(&self) -> usize {
        self.all_calls.load(Ordering::SeqCst)
    }

    /// Number of find-by-id fetches so far.
    pub fn by_id_calls(&self) -> usize {
        self.by_id_calls.load(Ordering::SeqCst)
    }
}

impl CarrierApi for MockCarrierClient {
    async fn fetch_all(&self, _ctx: &ClientContext) -> Result<Vec<ServicePoint>, CarrierError> {
        self.all_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(failure) = self.failure {
            return Err(failure.to_error());
        }

        Ok(self.directory.clone())
    }

    async fn fetch_by_id(
        &self,
        _ctx: &ClientContext,
        id: &str,
    ) -> Result<Option<ServicePoint>, CarrierError> {
        self.by_id_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(failure) = self.failure {
            return Err(failure.to_error());
        }

        Ok(self.live.get(id).cloned())
    }

    async fn fetch_all_raw(&self, _ctx: &ClientContext) -> Result<String, CarrierError> {
        self.all_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(failure) = self.failure {
            return Err(failure.to_error());
        }

        self.raw.clone().ok_or(CarrierError::MissingPayload)
    }
}
