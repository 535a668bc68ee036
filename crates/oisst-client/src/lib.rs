//! Client for the NOAA OISST v2 high-resolution daily SST dataset.
//!
//! One yearly resource per calendar year, addressed by a templated
//! identifier; windowed slices are fetched through an ordered list of
//! access strategies (OPeNDAP ASCII subset first, NetCDF Subset Service
//! as fallback) and cached in memory per date.

pub mod access;
pub mod cache;
pub mod dap;
pub mod fetcher;
pub mod ncss;

pub use access::{AccessError, AccessStrategy};
pub use cache::{CacheStats, OutcomeCache};
pub use dap::DapAsciiAccess;
pub use fetcher::{FetchError, FetchOutcome, OisstConfig, SstFetcher};
pub use ncss::NcssAccess;

/// File name of the yearly dataset resource.
pub fn resource_name(year: i32) -> String {
    format!("sst.day.mean.{year}.nc")
}
