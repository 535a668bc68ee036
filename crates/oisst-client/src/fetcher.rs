//! The fetcher: strategy fallback, slice validation, per-date caching.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use sst_common::grid::{grids, DatasetGridSpec};
use sst_common::{LatLonWindow, SstGrid};
use tracing::{debug, info, warn};

use crate::access::AccessStrategy;
use crate::cache::{CacheStats, OutcomeCache};
use crate::dap::DapAsciiAccess;
use crate::ncss::NcssAccess;

/// Client configuration. Defaults point at the NOAA PSL THREDDS server.
#[derive(Debug, Clone)]
pub struct OisstConfig {
    /// Base URL of the OPeNDAP (`dodsC`) dataset directory
    pub dods_base_url: String,
    /// Base URL of the NetCDF Subset Service dataset directory
    pub ncss_base_url: String,
    /// Whole-request timeout; the remote service can stall indefinitely
    /// without one
    pub request_timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Number of distinct dates the outcome cache holds
    pub cache_capacity: usize,
}

impl Default for OisstConfig {
    fn default() -> Self {
        Self {
            dods_base_url: "https://psl.noaa.gov/thredds/dodsC/Datasets/noaa.oisst.v2.highres"
                .to_string(),
            ncss_base_url: "https://psl.noaa.gov/thredds/ncss/grid/Datasets/noaa.oisst.v2.highres"
                .to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            cache_capacity: 32,
        }
    }
}

/// Outcome of a successful dataset query.
///
/// `Absent` means the query itself worked but every sample in the window
/// was missing for that date. It is a cacheable outcome, not an error.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Grid(Arc<SstGrid>),
    Absent,
}

impl FetchOutcome {
    /// The grid, if one was materialized.
    pub fn grid(&self) -> Option<&SstGrid> {
        match self {
            FetchOutcome::Grid(grid) => Some(grid),
            FetchOutcome::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FetchOutcome::Absent)
    }
}

/// Failure of the fetch as a whole.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Every access strategy failed; the message carries the last failure
    /// for display. Never cached.
    #[error("data unavailable: {message}")]
    DataUnavailable { message: String },

    /// The window selects no grid cells.
    #[error("window selects no grid cells")]
    InvalidWindow,
}

/// Cached, fallback-capable fetcher for daily windowed SST slices.
pub struct SstFetcher {
    strategies: Vec<Box<dyn AccessStrategy>>,
    cache: OutcomeCache,
    spec: DatasetGridSpec,
}

impl SstFetcher {
    /// Build a fetcher with the standard strategy order: OPeNDAP ASCII
    /// first, NetCDF Subset Service as fallback.
    pub fn new(config: OisstConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        let strategies: Vec<Box<dyn AccessStrategy>> = vec![
            Box::new(DapAsciiAccess::new(client.clone(), config.dods_base_url)),
            Box::new(NcssAccess::new(client, config.ncss_base_url)),
        ];

        Ok(Self::with_strategies(strategies, config.cache_capacity))
    }

    /// Build a fetcher over an explicit strategy list, tried in order.
    pub fn with_strategies(
        strategies: Vec<Box<dyn AccessStrategy>>,
        cache_capacity: usize,
    ) -> Self {
        Self {
            strategies,
            cache: OutcomeCache::new(cache_capacity),
            spec: grids::oisst_quarter_degree(),
        }
    }

    /// Fetch the daily slice for `date` over `window`.
    ///
    /// Cache hits return without network I/O. On a miss, strategies run
    /// in order and the first success wins; an all-missing slice becomes
    /// `Absent`. Both outcomes are cached under the date key before
    /// returning. Failures are not cached.
    pub async fn fetch(
        &self,
        date: NaiveDate,
        window: &LatLonWindow,
    ) -> Result<FetchOutcome, FetchError> {
        if self.spec.lat_indices(window).is_none() || self.spec.lon_indices(window).is_none() {
            return Err(FetchError::InvalidWindow);
        }

        if let Some(outcome) = self.cache.get(date).await {
            debug!(%date, "outcome cache hit");
            return Ok(outcome);
        }

        let mut last_error: Option<String> = None;
        for strategy in &self.strategies {
            match strategy.fetch_slice(date, window).await {
                Ok(grid) => {
                    let outcome = if grid.all_missing() {
                        info!(%date, strategy = strategy.name(), "slice has no valid samples");
                        FetchOutcome::Absent
                    } else {
                        debug!(
                            %date,
                            strategy = strategy.name(),
                            width = grid.width,
                            height = grid.height,
                            valid = grid.valid_count(),
                            "slice materialized"
                        );
                        FetchOutcome::Grid(Arc::new(grid))
                    };
                    self.cache.insert(date, outcome.clone()).await;
                    return Ok(outcome);
                }
                Err(e) => {
                    warn!(
                        %date,
                        strategy = strategy.name(),
                        error = %e,
                        "access strategy failed"
                    );
                    last_error = Some(e.to_string());
                }
            }
        }

        Err(FetchError::DataUnavailable {
            message: last_error.unwrap_or_else(|| "no access strategies configured".to_string()),
        })
    }

    /// Current cache statistics.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn window() -> LatLonWindow {
        LatLonWindow::new(28.0, 42.0, 120.0, 135.0).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 2).unwrap()
    }

    fn small_grid(values: Vec<f32>) -> SstGrid {
        SstGrid::new(values, 2, 1, vec![28.125], vec![120.125, 120.375]).unwrap()
    }

    /// Strategy returning a fixed slice, counting calls.
    struct Scripted {
        name: &'static str,
        calls: Arc<AtomicUsize>,
        values: Option<Vec<f32>>,
    }

    impl Scripted {
        fn ok(name: &'static str, values: Vec<f32>) -> (Box<dyn AccessStrategy>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Box::new(Self {
                    name,
                    calls: calls.clone(),
                    values: Some(values),
                }),
                calls,
            )
        }

        fn failing(name: &'static str) -> (Box<dyn AccessStrategy>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Box::new(Self {
                    name,
                    calls: calls.clone(),
                    values: None,
                }),
                calls,
            )
        }
    }

    #[async_trait]
    impl AccessStrategy for Scripted {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch_slice(
            &self,
            _date: NaiveDate,
            _window: &LatLonWindow,
        ) -> Result<SstGrid, AccessError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.values {
                Some(values) => Ok(small_grid(values.clone())),
                None => Err(AccessError::Decode("scripted failure".to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_repeat_fetch_hits_cache() {
        let (primary, calls) = Scripted::ok("primary", vec![21.5, 22.0]);
        let fetcher = SstFetcher::with_strategies(vec![primary], 8);

        let first = fetcher.fetch(date(), &window()).await.unwrap();
        let second = fetcher.fetch(date(), &window()).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.grid().unwrap().values, second.grid().unwrap().values);

        let stats = fetcher.cache_stats().await;
        assert_eq!(stats.hits, 1);
    }

    #[tokio::test]
    async fn test_fallback_attempted_after_primary_failure() {
        let (primary, primary_calls) = Scripted::failing("primary");
        let (fallback, fallback_calls) = Scripted::ok("fallback", vec![21.5, 22.0]);
        let fetcher = SstFetcher::with_strategies(vec![primary, fallback], 8);

        let outcome = fetcher.fetch(date(), &window()).await.unwrap();
        assert!(outcome.grid().is_some());
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_both_failures_are_unavailable_not_absent() {
        let (primary, _) = Scripted::failing("primary");
        let (fallback, _) = Scripted::failing("fallback");
        let fetcher = SstFetcher::with_strategies(vec![primary, fallback], 8);

        let err = fetcher.fetch(date(), &window()).await.unwrap_err();
        match err {
            FetchError::DataUnavailable { message } => {
                assert!(message.contains("scripted failure"));
            }
            other => panic!("expected DataUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let (primary, calls) = Scripted::failing("primary");
        let fetcher = SstFetcher::with_strategies(vec![primary], 8);

        assert!(fetcher.fetch(date(), &window()).await.is_err());
        assert!(fetcher.fetch(date(), &window()).await.is_err());
        // A failed fetch must retry on the next call.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_all_missing_slice_is_absent_and_cached() {
        let (primary, calls) = Scripted::ok("primary", vec![f32::NAN, f32::NAN]);
        let fetcher = SstFetcher::with_strategies(vec![primary], 8);

        let first = fetcher.fetch(date(), &window()).await.unwrap();
        assert!(first.is_absent());

        let second = fetcher.fetch(date(), &window()).await.unwrap();
        assert!(second.is_absent());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_window_rejected_before_any_access() {
        let (primary, calls) = Scripted::ok("primary", vec![21.5, 22.0]);
        let fetcher = SstFetcher::with_strategies(vec![primary], 8);

        // Narrower than one grid cell and clear of any cell center.
        let empty = LatLonWindow::new(28.01, 28.1, 120.01, 120.1).unwrap();
        let err = fetcher.fetch(date(), &empty).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidWindow));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
