//! Access strategies for the yearly dataset resource.

use async_trait::async_trait;
use chrono::NaiveDate;
use sst_common::{LatLonWindow, SstGrid};

/// Failure of a single access strategy. The fetcher treats any variant as
/// "try the next strategy"; only the last failure is surfaced.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("window selects no grid cells")]
    EmptyWindow,
}

impl From<netcdf3_parser::NetCdf3Error> for AccessError {
    fn from(err: netcdf3_parser::NetCdf3Error) -> Self {
        AccessError::Decode(err.to_string())
    }
}

impl From<sst_common::GridShapeError> for AccessError {
    fn from(err: sst_common::GridShapeError) -> Self {
        AccessError::Decode(err.to_string())
    }
}

/// One way of reading a windowed daily slice out of the remote resource.
///
/// Strategies are tried in order by the fetcher; each performs a
/// server-side windowed read (the rest of the yearly file is never
/// transferred) and an exact calendar-day time match.
#[async_trait]
pub trait AccessStrategy: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Fetch the windowed slice for one calendar day.
    async fn fetch_slice(
        &self,
        date: NaiveDate,
        window: &LatLonWindow,
    ) -> Result<SstGrid, AccessError>;
}

/// Map raw sample sentinels to NaN.
///
/// Covers the dataset's packed fill (-999 raw, well below any physical
/// SST after scaling) and the default float fill near 9.97e36.
pub(crate) fn decode_sample(v: f32) -> f32 {
    if !v.is_finite() || v.abs() >= 1.0e30 || v <= -900.0 {
        f32::NAN
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_sample_sentinels() {
        assert!(decode_sample(-9.96921e36).is_nan());
        assert!(decode_sample(9.96921e36).is_nan());
        assert!(decode_sample(-999.0).is_nan());
        assert!(decode_sample(f32::INFINITY).is_nan());
        assert_eq!(decode_sample(14.2), 14.2);
        assert_eq!(decode_sample(-1.8), -1.8);
    }
}
