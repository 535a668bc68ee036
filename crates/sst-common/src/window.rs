//! Geographic selection windows.

use serde::{Deserialize, Serialize};

/// A latitude/longitude selection window in degrees.
///
/// Bounds are ordered: `lat_min <= lat_max` and `lon_min <= lon_max`.
/// Longitudes may be given in either -180..180 or 0..360 convention;
/// dataset index mapping normalizes them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLonWindow {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl LatLonWindow {
    /// Create a new window, rejecting out-of-order bounds.
    pub fn new(
        lat_min: f64,
        lat_max: f64,
        lon_min: f64,
        lon_max: f64,
    ) -> Result<Self, WindowError> {
        if lat_min > lat_max || lon_min > lon_max {
            return Err(WindowError::Unordered {
                lat_min,
                lat_max,
                lon_min,
                lon_max,
            });
        }
        if !(-90.0..=90.0).contains(&lat_min) || !(-90.0..=90.0).contains(&lat_max) {
            return Err(WindowError::LatitudeOutOfRange { lat_min, lat_max });
        }

        Ok(Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        })
    }

    /// Latitude span in degrees.
    pub fn lat_span(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    /// Longitude span in degrees.
    pub fn lon_span(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    /// Check if a point falls inside the window (inclusive bounds).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.lat_min && lat <= self.lat_max && lon >= self.lon_min && lon <= self.lon_max
    }

    /// Cache key fragment (quantized to avoid floating point issues).
    pub fn cache_key(&self) -> String {
        format!(
            "{:.4}_{:.4}_{:.4}_{:.4}",
            self.lat_min, self.lat_max, self.lon_min, self.lon_max
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error(
        "window bounds out of order: lat {lat_min}..{lat_max}, lon {lon_min}..{lon_max}"
    )]
    Unordered {
        lat_min: f64,
        lat_max: f64,
        lon_min: f64,
        lon_max: f64,
    },

    #[error("latitude bounds outside -90..90: {lat_min}..{lat_max}")]
    LatitudeOutOfRange { lat_min: f64, lat_max: f64 },
}
