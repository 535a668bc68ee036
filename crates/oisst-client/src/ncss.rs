//! Fallback access strategy: THREDDS NetCDF Subset Service.
//!
//! Requests a windowed classic NetCDF file for the exact day and decodes
//! it with `netcdf3-parser`. Used when the OPeNDAP endpoint misbehaves;
//! the subset is still a windowed read on the server side.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Datelike, NaiveDate};
use netcdf3_parser::NcFile;
use reqwest::Client;
use sst_common::{time, LatLonWindow, SstGrid};
use tracing::debug;

use crate::access::{decode_sample, AccessError, AccessStrategy};
use crate::resource_name;

pub struct NcssAccess {
    client: Client,
    base_url: String,
}

impl NcssAccess {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl AccessStrategy for NcssAccess {
    fn name(&self) -> &'static str {
        "ncss"
    }

    async fn fetch_slice(
        &self,
        date: NaiveDate,
        window: &LatLonWindow,
    ) -> Result<SstGrid, AccessError> {
        let url = format!("{}/{}", self.base_url, resource_name(date.year()));
        let query = [
            ("var", "sst".to_string()),
            ("north", window.lat_max.to_string()),
            ("south", window.lat_min.to_string()),
            ("west", window.lon_min.to_string()),
            ("east", window.lon_max.to_string()),
            ("horizStride", "1".to_string()),
            ("time", format!("{}T12:00:00Z", time::date_label(date))),
            ("accept", "netcdf3".to_string()),
        ];
        debug!(url = %url, "requesting NetCDF subset");

        let response = self.client.get(&url).query(&query).send().await?;
        if !response.status().is_success() {
            return Err(AccessError::Status {
                status: response.status(),
                url,
            });
        }
        let body = response.bytes().await?;

        decode_subset(body)
    }
}

/// Decode a windowed subset response into a grid with south-to-north rows.
fn decode_subset(body: Bytes) -> Result<SstGrid, AccessError> {
    let nc = NcFile::parse(body)?;

    let var = nc
        .variable("sst")
        .ok_or_else(|| AccessError::Decode("response has no sst variable".to_string()))?;
    let mut values: Vec<f32> = nc
        .read_scaled(var)?
        .into_iter()
        .map(decode_sample)
        .collect();

    let lat_var = nc
        .variable("lat")
        .or_else(|| nc.variable("latitude"))
        .ok_or_else(|| AccessError::Decode("response has no latitude axis".to_string()))?;
    let lon_var = nc
        .variable("lon")
        .or_else(|| nc.variable("longitude"))
        .ok_or_else(|| AccessError::Decode("response has no longitude axis".to_string()))?;
    let mut lats = nc.read_f64(lat_var)?;
    let lons = nc.read_f64(lon_var)?;

    let width = lons.len();
    let height = lats.len();
    if values.len() != width * height {
        return Err(AccessError::Decode(format!(
            "sst has {} samples for a {}x{} axis",
            values.len(),
            width,
            height
        )));
    }

    // Subset services may deliver rows north-first; normalize to the
    // dataset's south-to-north order.
    if height > 1 && lats[0] > lats[height - 1] {
        lats.reverse();
        let mut flipped = Vec::with_capacity(values.len());
        for row in (0..height).rev() {
            flipped.extend_from_slice(&values[row * width..(row + 1) * width]);
        }
        values = flipped;
    }

    Ok(SstGrid::new(values, width, height, lats, lons)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use netcdf3_parser::testdata;

    #[test]
    fn test_decode_subset() {
        let file = testdata::daily_subset_file(
            &[28.125, 28.375],
            &[120.125, 120.375, 120.625],
            &[1420, 1431, -999, 1502, 1513, 1524],
            0.01,
            -999,
        );
        let grid = decode_subset(Bytes::from(file)).unwrap();

        assert_eq!((grid.width, grid.height), (3, 2));
        assert!((grid.get(0, 0).unwrap() - 14.20).abs() < 1e-4);
        assert!(grid.get(0, 2).unwrap().is_nan());
        assert!((grid.get(1, 2).unwrap() - 15.24).abs() < 1e-4);
        assert!((grid.lats[0] - 28.125).abs() < 1e-6);
    }

    #[test]
    fn test_decode_subset_normalizes_north_first_rows() {
        // Same data delivered north-first.
        let file = testdata::daily_subset_file(
            &[28.375, 28.125],
            &[120.125, 120.375, 120.625],
            &[1502, 1513, 1524, 1420, 1431, -999],
            0.01,
            -999,
        );
        let grid = decode_subset(Bytes::from(file)).unwrap();

        assert!((grid.lats[0] - 28.125).abs() < 1e-6);
        assert!((grid.get(0, 0).unwrap() - 14.20).abs() < 1e-4);
        assert!(grid.get(0, 2).unwrap().is_nan());
        assert!((grid.get(1, 0).unwrap() - 15.02).abs() < 1e-4);
    }

    #[test]
    fn test_decode_subset_without_sst_variable() {
        let err = decode_subset(Bytes::from_static(b"CDF\x01\x00\x00\x00\x00"));
        assert!(err.is_err());
    }
}
