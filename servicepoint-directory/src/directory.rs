//! Service point directory.
//!
//! Orchestrates the in-memory caches, the carrier API and the on-disk
//! snapshot. All remote failures are absorbed at this layer: callers get
//! an empty or absent result plus a log record, never a transport error.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::cache::MemoryCache;
use crate::carrier::{CarrierApi, CarrierError};
use crate::context::ClientContext;
use crate::domain::ServicePoint;
use crate::geo;
use crate::snapshot::{SnapshotError, SnapshotStore};

/// Cache key prefix for the full directory list, suffixed with the API key.
const LIST_KEY_PREFIX: &str = "ServicePointList_";

/// Cache key prefix for single service points, suffixed with the id.
const POINT_KEY_PREFIX: &str = "ServicePoint_";

/// Cache key for the snapshot-backed fallback directory.
const FALLBACK_KEY: &str = "ServicePointFallback";

/// Errors from [`ServicePointDirectory::refresh_snapshot`].
///
/// Unlike the lookup operations, snapshot refresh surfaces its failures so
/// the host can keep the previous snapshot and schedule a retry.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotRefreshError {
    /// Fetching the raw directory document failed
    #[error("fetching raw directory failed: {0}")]
    Fetch(#[from] CarrierError),

    /// Validating or writing the snapshot failed
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Directory of carrier service points.
///
/// Generic over [`CarrierApi`] so tests can substitute a canned client.
pub struct ServicePointDirectory<C> {
    carrier: C,
    lists: MemoryCache<Arc<Vec<ServicePoint>>>,
    points: MemoryCache<ServicePoint>,
}

impl<C: CarrierApi> ServicePointDirectory<C> {
    /// Create a directory backed by the given carrier client.
    pub fn new(carrier: C) -> Self {
        Self {
            carrier,
            lists: MemoryCache::new(),
            points: MemoryCache::new(),
        }
    }

    /// Fetch the full directory for the client's country.
    ///
    /// Served from cache unless `force_refresh` is set. Remote failures
    /// degrade to an empty list; a failed fetch is not cached, so the next
    /// call attempts the remote again.
    pub async fn get_all(
        &self,
        ctx: &ClientContext,
        force_refresh: bool,
    ) -> Arc<Vec<ServicePoint>> {
        let key = format!("{LIST_KEY_PREFIX}{}", ctx.api_key);

        if !force_refresh
            && let Some(cached) = self.lists.get(&key).await
        {
            return cached;
        }

        match self.carrier.fetch_all(ctx).await {
            Ok(points) => {
                let entry = Arc::new(points);
                self.lists.insert(&key, entry.clone(), ctx.cache_ttl).await;
                entry
            }
            Err(e) => {
                error!(country = %ctx.country, error = %e, "get all service points failed");
                Arc::new(Vec::new())
            }
        }
    }

    /// Look up a single service point by id.
    ///
    /// Checks the per-id cache, then scans the full directory, then falls
    /// back to a direct remote lookup. A blank id is rejected immediately
    /// without touching the cache or the network. A found result is cached
    /// under the client's TTL regardless of which path produced it.
    pub async fn get_one(
        &self,
        ctx: &ClientContext,
        id: &str,
        force_refresh: bool,
    ) -> Option<ServicePoint> {
        if id.trim().is_empty() {
            warn!(service_point_id = id, "invalid service point fetch request");
            return None;
        }

        let key = format!("{POINT_KEY_PREFIX}{id}");

        let mut result = None;
        if !force_refresh {
            if let Some(cached) = self.points.get(&key).await {
                return Some(cached);
            }

            result = self
                .get_all(ctx, false)
                .await
                .iter()
                .find(|point| point.id == id)
                .cloned();
        }

        if result.is_none() {
            info!(
                service_point_id = id,
                "service point not in cache, fetching directly from carrier"
            );
            result = match self.carrier.fetch_by_id(ctx, id).await {
                Ok(found) => found,
                Err(e) => {
                    error!(service_point_id = id, error = %e, "service point fetch failed");
                    None
                }
            };
        }

        if let Some(found) = &result {
            self.points.insert(&key, found.clone(), ctx.cache_ttl).await;
        }

        result
    }

    /// Find the `max_results` service points closest to a coordinate.
    ///
    /// Fetches the directory via [`Self::get_all`], so cached data is used
    /// when available. Distances are great-circle kilometres; the sort is
    /// stable, so ties keep directory order. A `max_results` of zero yields
    /// an empty list.
    pub async fn find_nearest(
        &self,
        ctx: &ClientContext,
        latitude: f64,
        longitude: f64,
        max_results: usize,
    ) -> Vec<ServicePoint> {
        let all = self.get_all(ctx, false).await;

        let mut ranked: Vec<(f64, &ServicePoint)> = all
            .iter()
            .map(|point| {
                let distance = geo::distance_km(latitude, longitude, point.northing, point.easting);
                (distance, point)
            })
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        ranked
            .into_iter()
            .take(max_results)
            .map(|(_, point)| point.clone())
            .collect()
    }

    /// Fetch the full directory from the snapshot file instead of the API.
    ///
    /// The parsed list is cached under its own key with the client's TTL.
    /// Read failures degrade to an empty list.
    pub async fn get_all_offline(
        &self,
        ctx: &ClientContext,
        force_refresh: bool,
    ) -> Arc<Vec<ServicePoint>> {
        if !force_refresh
            && let Some(cached) = self.lists.get(FALLBACK_KEY).await
        {
            return cached;
        }

        let store = SnapshotStore::new(&ctx.snapshot_path);
        match store.load() {
            Ok(points) => {
                let entry = Arc::new(points);
                self.lists
                    .insert(FALLBACK_KEY, entry.clone(), ctx.cache_ttl)
                    .await;
                entry
            }
            Err(e) => {
                error!(
                    path = %ctx.snapshot_path.display(),
                    error = %e,
                    "unable to read service points from snapshot"
                );
                Arc::new(Vec::new())
            }
        }
    }

    /// Refresh the on-disk snapshot from the carrier.
    ///
    /// Fetches the raw wire document and persists it. The snapshot file is
    /// only replaced once the document validates, so a bad fetch leaves the
    /// previous snapshot usable.
    pub async fn refresh_snapshot(
        &self,
        ctx: &ClientContext,
    ) -> Result<(), SnapshotRefreshError> {
        let raw = self.carrier.fetch_all_raw(ctx).await?;

        let store = SnapshotStore::new(&ctx.snapshot_path);
        store.save_raw(&raw)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::mock::{MockCarrierClient, MockFailure};
    use crate::domain::CountryCode;
    use tempfile::tempdir;

    fn ctx() -> ClientContext {
        ClientContext::new("test-key", CountryCode::parse("NO").unwrap(), "sp.json")
    }

    fn point(id: &str, northing: f64, easting: f64) -> ServicePoint {
        ServicePoint {
            id: id.to_string(),
            name: format!("POINT {id}"),
            northing,
            easting,
            coordinate_id: "EPSG:4326".to_string(),
            eligible_parcel_outlet: true,
            ..ServicePoint::default()
        }
    }

    #[tokio::test]
    async fn get_all_returns_mapped_points_and_caches() {
        let mock = MockCarrierClient::new()
            .with_points(vec![point("1", 59.0, 10.0), point("2", 60.0, 11.0)]);
        let directory = ServicePointDirectory::new(mock.clone());

        let first = directory.get_all(&ctx(), false).await;
        assert_eq!(first.len(), 2);

        let second = directory.get_all(&ctx(), false).await;
        assert_eq!(second.len(), 2);

        // Second call was served from cache
        assert_eq!(mock.all_calls(), 1);
    }

    #[tokio::test]
    async fn get_all_force_refresh_bypasses_cache() {
        let mock = MockCarrierClient::new().with_points(vec![point("1", 59.0, 10.0)]);
        let directory = ServicePointDirectory::new(mock.clone());

        directory.get_all(&ctx(), false).await;
        directory.get_all(&ctx(), true).await;

        assert_eq!(mock.all_calls(), 2);
    }

    #[tokio::test]
    async fn get_all_caches_per_api_key() {
        let mock = MockCarrierClient::new().with_points(vec![point("1", 59.0, 10.0)]);
        let directory = ServicePointDirectory::new(mock.clone());

        let other = ClientContext::new(
            "another-key",
            CountryCode::parse("SE").unwrap(),
            "sp.json",
        );

        directory.get_all(&ctx(), false).await;
        directory.get_all(&other, false).await;

        assert_eq!(mock.all_calls(), 2);
    }

    #[tokio::test]
    async fn get_all_transport_failure_degrades_to_empty() {
        let mock = MockCarrierClient::new().with_failure(MockFailure::NoResponse);
        let directory = ServicePointDirectory::new(mock);

        let result = directory.get_all(&ctx(), true).await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn get_all_unauthorized_degrades_to_empty() {
        let mock = MockCarrierClient::new().with_failure(MockFailure::Status(401));
        let directory = ServicePointDirectory::new(mock);

        let result = directory.get_all(&ctx(), true).await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn get_all_unparsable_body_degrades_to_empty() {
        let mock = MockCarrierClient::new().with_failure(MockFailure::BadBody);
        let directory = ServicePointDirectory::new(mock);

        let result = directory.get_all(&ctx(), false).await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn failed_fetch_is_not_negative_cached() {
        let mock = MockCarrierClient::new().with_failure(MockFailure::NoResponse);
        let directory = ServicePointDirectory::new(mock.clone());

        directory.get_all(&ctx(), false).await;
        directory.get_all(&ctx(), false).await;

        // Every call re-attempts the remote; nothing caches the failure
        assert_eq!(mock.all_calls(), 2);
    }

    #[tokio::test]
    async fn get_one_blank_id_returns_none_without_any_call() {
        let mock = MockCarrierClient::new().with_points(vec![point("1", 59.0, 10.0)]);
        let directory = ServicePointDirectory::new(mock.clone());

        assert!(directory.get_one(&ctx(), "", false).await.is_none());
        assert!(directory.get_one(&ctx(), "   ", false).await.is_none());

        assert_eq!(mock.all_calls(), 0);
        assert_eq!(mock.by_id_calls(), 0);
    }

    #[tokio::test]
    async fn get_one_found_via_directory_scan() {
        let mock = MockCarrierClient::new()
            .with_points(vec![point("3690898", 59.9, 10.75), point("3761681", 59.6, 11.3)]);
        let directory = ServicePointDirectory::new(mock.clone());

        let found = directory.get_one(&ctx(), "3690898", false).await;
        assert_eq!(found.unwrap().id, "3690898");
        assert_eq!(mock.by_id_calls(), 0);

        // Second lookup hits the per-id cache, no further bulk fetch
        let again = directory.get_one(&ctx(), "3690898", false).await;
        assert!(again.is_some());
        assert_eq!(mock.all_calls(), 1);
    }

    #[tokio::test]
    async fn get_one_falls_back_to_direct_lookup() {
        let mock = MockCarrierClient::new()
            .with_points(vec![point("3761681", 59.6, 11.3)])
            .with_live_point(point("3690898", 59.9, 10.75));
        let directory = ServicePointDirectory::new(mock.clone());

        let found = directory.get_one(&ctx(), "3690898", false).await;
        assert_eq!(found.unwrap().id, "3690898");
        assert_eq!(mock.by_id_calls(), 1);

        // The direct-lookup result was cached
        let again = directory.get_one(&ctx(), "3690898", false).await;
        assert!(again.is_some());
        assert_eq!(mock.by_id_calls(), 1);
    }

    #[tokio::test]
    async fn get_one_missing_everywhere_returns_none_and_is_not_cached() {
        let mock = MockCarrierClient::new().with_points(vec![point("3761681", 59.6, 11.3)]);
        let directory = ServicePointDirectory::new(mock.clone());

        assert!(directory.get_one(&ctx(), "0000000", false).await.is_none());
        assert_eq!(mock.by_id_calls(), 1);

        // A miss is not cached; the next call asks the carrier again
        assert!(directory.get_one(&ctx(), "0000000", false).await.is_none());
        assert_eq!(mock.by_id_calls(), 2);
    }

    #[tokio::test]
    async fn get_one_force_refresh_skips_cache_and_scan() {
        let mock = MockCarrierClient::new()
            .with_points(vec![point("3690898", 59.9, 10.75)])
            .with_live_point(point("3690898", 59.9, 10.75));
        let directory = ServicePointDirectory::new(mock.clone());

        // Populate both caches
        directory.get_one(&ctx(), "3690898", false).await;
        assert_eq!(mock.by_id_calls(), 0);

        let forced = directory.get_one(&ctx(), "3690898", true).await;
        assert!(forced.is_some());
        assert_eq!(mock.by_id_calls(), 1);
    }

    #[tokio::test]
    async fn get_one_remote_failure_degrades_to_none() {
        let mock = MockCarrierClient::new().with_failure(MockFailure::NoResponse);
        let directory = ServicePointDirectory::new(mock);

        let result = directory.get_one(&ctx(), "3690898", false).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn find_nearest_returns_closest_first() {
        // All points due north of the query, at increasing distance
        let mock = MockCarrierClient::new().with_points(vec![
            point("far", 59.5, 10.0),
            point("nearest", 59.05, 10.0),
            point("farther", 58.0, 10.0),
            point("near", 59.1, 10.0),
            point("farthest", 62.0, 10.0),
        ]);
        let directory = ServicePointDirectory::new(mock);

        let nearest = directory.find_nearest(&ctx(), 59.0, 10.0, 2).await;

        let ids: Vec<&str> = nearest.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["nearest", "near"]);
    }

    #[tokio::test]
    async fn find_nearest_zero_max_results_is_empty() {
        let mock = MockCarrierClient::new().with_points(vec![point("1", 59.0, 10.0)]);
        let directory = ServicePointDirectory::new(mock);

        let nearest = directory.find_nearest(&ctx(), 59.0, 10.0, 0).await;
        assert!(nearest.is_empty());
    }

    #[tokio::test]
    async fn find_nearest_ties_keep_directory_order() {
        let mock = MockCarrierClient::new().with_points(vec![
            point("first", 59.5, 10.5),
            point("second", 59.5, 10.5),
        ]);
        let directory = ServicePointDirectory::new(mock);

        let nearest = directory.find_nearest(&ctx(), 59.0, 10.0, 2).await;

        let ids: Vec<&str> = nearest.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn find_nearest_uses_the_list_cache() {
        let mock = MockCarrierClient::new().with_points(vec![point("1", 59.0, 10.0)]);
        let directory = ServicePointDirectory::new(mock.clone());

        directory.find_nearest(&ctx(), 59.0, 10.0, 1).await;
        directory.find_nearest(&ctx(), 59.0, 10.0, 1).await;

        assert_eq!(mock.all_calls(), 1);
    }

    const SNAPSHOT_DOC: &str = r#"{ "servicePointInformationResponse": { "servicePoints": [
        { "servicePointId": "3690898", "name": "COOP PRIX", "eligibleParcelOutlet": true,
          "coordinate": { "northing": 59.9, "easting": 10.7, "srId": "EPSG:4326" } }
    ] } }"#;

    #[tokio::test]
    async fn get_all_offline_reads_snapshot_and_caches() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("servicepoints.json");
        std::fs::write(&path, SNAPSHOT_DOC).unwrap();

        let directory = ServicePointDirectory::new(MockCarrierClient::new());
        let ctx = ClientContext::new("test-key", CountryCode::parse("NO").unwrap(), &path);

        let points = directory.get_all_offline(&ctx, false).await;
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].id, "3690898");

        // Served from cache even after the file disappears
        std::fs::remove_file(&path).unwrap();
        let cached = directory.get_all_offline(&ctx, false).await;
        assert_eq!(cached.len(), 1);
    }

    #[tokio::test]
    async fn get_all_offline_missing_file_degrades_to_empty() {
        let directory = ServicePointDirectory::new(MockCarrierClient::new());
        let ctx = ClientContext::new(
            "test-key",
            CountryCode::parse("NO").unwrap(),
            "/nonexistent/servicepoints.json",
        );

        let points = directory.get_all_offline(&ctx, false).await;
        assert!(points.is_empty());
    }

    #[tokio::test]
    async fn refresh_snapshot_persists_raw_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("servicepoints.json");

        let mock = MockCarrierClient::new().with_raw(SNAPSHOT_DOC);
        let directory = ServicePointDirectory::new(mock);
        let ctx = ClientContext::new("test-key", CountryCode::parse("NO").unwrap(), &path);

        directory.refresh_snapshot(&ctx).await.unwrap();

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk, SNAPSHOT_DOC);
    }

    #[tokio::test]
    async fn refresh_snapshot_rejects_malformed_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("servicepoints.json");
        std::fs::write(&path, SNAPSHOT_DOC).unwrap();

        let mock = MockCarrierClient::new().with_raw("{ not json");
        let directory = ServicePointDirectory::new(mock);
        let ctx = ClientContext::new("test-key", CountryCode::parse("NO").unwrap(), &path);

        let result = directory.refresh_snapshot(&ctx).await;
        assert!(matches!(
            result,
            Err(SnapshotRefreshError::Snapshot(SnapshotError::Malformed { .. }))
        ));

        // The previous snapshot is untouched
        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk, SNAPSHOT_DOC);
    }

    #[tokio::test]
    async fn refresh_snapshot_surfaces_fetch_failure() {
        let mock = MockCarrierClient::new().with_failure(MockFailure::Status(401));
        let directory = ServicePointDirectory::new(mock);

        let result = directory.refresh_snapshot(&ctx()).await;
        assert!(matches!(result, Err(SnapshotRefreshError::Fetch(_))));
    }
}
