//! Grid geometry for gridded SST datasets and materialized slices.

use crate::window::LatLonWindow;
use serde::{Deserialize, Serialize};

/// Geometry of a regular lat/lon dataset grid.
///
/// Cell centers are at `first_lat + j * dlat` / `first_lon + i * dlon`,
/// rows running south to north and columns west to east, row-major.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DatasetGridSpec {
    /// Number of points in the longitude direction
    pub nlon: usize,
    /// Number of points in the latitude direction
    pub nlat: usize,
    /// Grid step in the longitude direction (degrees)
    pub dlon: f64,
    /// Grid step in the latitude direction (degrees)
    pub dlat: f64,
    /// First cell-center longitude
    pub first_lon: f64,
    /// First cell-center latitude (southernmost row)
    pub first_lat: f64,
}

impl DatasetGridSpec {
    pub fn new(
        nlon: usize,
        nlat: usize,
        dlon: f64,
        dlat: f64,
        first_lon: f64,
        first_lat: f64,
    ) -> Self {
        Self {
            nlon,
            nlat,
            dlon,
            dlat,
            first_lon,
            first_lat,
        }
    }

    /// Latitude of row `j`.
    pub fn lat_of(&self, j: usize) -> f64 {
        self.first_lat + j as f64 * self.dlat
    }

    /// Longitude of column `i`.
    pub fn lon_of(&self, i: usize) -> f64 {
        self.first_lon + i as f64 * self.dlon
    }

    /// Inclusive row range of cell centers inside the latitude bounds.
    ///
    /// Matches exact inclusive selection: only centers with
    /// `lat_min <= lat <= lat_max` are taken. Returns `None` if no row
    /// falls inside the bounds.
    pub fn lat_indices(&self, window: &LatLonWindow) -> Option<(usize, usize)> {
        let j0 = ((window.lat_min - self.first_lat) / self.dlat).ceil().max(0.0) as usize;
        let j1 = ((window.lat_max - self.first_lat) / self.dlat).floor() as isize;
        if j1 < j0 as isize {
            return None;
        }
        let j1 = (j1 as usize).min(self.nlat - 1);
        if j0 > j1 {
            return None;
        }
        Some((j0, j1))
    }

    /// Inclusive column range of cell centers inside the longitude bounds.
    ///
    /// Negative longitudes are normalized to the 0..360 convention of the
    /// dataset. Windows crossing the antimeridian are not supported.
    pub fn lon_indices(&self, window: &LatLonWindow) -> Option<(usize, usize)> {
        let min_lon = normalize_lon(window.lon_min);
        let max_lon = normalize_lon(window.lon_max);
        if max_lon < min_lon {
            return None;
        }

        let i0 = ((min_lon - self.first_lon) / self.dlon).ceil().max(0.0) as usize;
        let i1 = ((max_lon - self.first_lon) / self.dlon).floor() as isize;
        if i1 < i0 as isize {
            return None;
        }
        let i1 = (i1 as usize).min(self.nlon - 1);
        if i0 > i1 {
            return None;
        }
        Some((i0, i1))
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.nlon * self.nlat
    }

    /// Check if the grid is empty.
    pub fn is_empty(&self) -> bool {
        self.nlon == 0 || self.nlat == 0
    }
}

fn normalize_lon(lon: f64) -> f64 {
    if lon < 0.0 {
        lon + 360.0
    } else {
        lon
    }
}

/// Well-known dataset grids.
pub mod grids {
    use super::*;

    /// OISST v2 high-resolution 0.25° global grid.
    ///
    /// 1440 x 720 cell centers, first at 0.125°E / 89.875°S.
    pub fn oisst_quarter_degree() -> DatasetGridSpec {
        DatasetGridSpec::new(1440, 720, 0.25, 0.25, 0.125, -89.875)
    }
}

/// A materialized slice of daily samples.
///
/// `values` is row-major with rows ordered south to north, as the dataset
/// stores them. NaN marks missing samples (land or ice-masked cells).
#[derive(Debug, Clone, PartialEq)]
pub struct SstGrid {
    pub values: Vec<f32>,
    pub width: usize,
    pub height: usize,
    /// Latitudes of each row, ascending, `len() == height`
    pub lats: Vec<f64>,
    /// Longitudes of each column, ascending, `len() == width`
    pub lons: Vec<f64>,
}

impl SstGrid {
    /// Assemble a grid, rejecting mismatched dimensions.
    pub fn new(
        values: Vec<f32>,
        width: usize,
        height: usize,
        lats: Vec<f64>,
        lons: Vec<f64>,
    ) -> Result<Self, GridShapeError> {
        if values.len() != width * height {
            return Err(GridShapeError::ValueCount {
                expected: width * height,
                actual: values.len(),
            });
        }
        if lats.len() != height || lons.len() != width {
            return Err(GridShapeError::CoordinateCount {
                lats: lats.len(),
                lons: lons.len(),
                width,
                height,
            });
        }

        Ok(Self {
            values,
            width,
            height,
            lats,
            lons,
        })
    }

    /// Value at `(row, col)`, row 0 being the southernmost.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(self.values[row * self.width + col])
    }

    /// Number of non-missing samples.
    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }

    /// True when every sample is missing.
    pub fn all_missing(&self) -> bool {
        self.valid_count() == 0
    }

    /// Minimum and maximum over non-missing samples.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        let mut bounds: Option<(f32, f32)> = None;
        for &v in &self.values {
            if v.is_nan() {
                continue;
            }
            bounds = Some(match bounds {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            });
        }
        bounds
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GridShapeError {
    #[error("grid has {actual} values, expected {expected}")]
    ValueCount { expected: usize, actual: usize },

    #[error("coordinate vectors ({lats} lats, {lons} lons) do not match grid {width}x{height}")]
    CoordinateCount {
        lats: usize,
        lons: usize,
        width: usize,
        height: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oisst_window_indices() {
        let spec = grids::oisst_quarter_degree();
        let window = LatLonWindow::new(28.0, 42.0, 120.0, 135.0).unwrap();

        let (j0, j1) = spec.lat_indices(&window).unwrap();
        assert_eq!((j0, j1), (472, 527));
        assert!((spec.lat_of(j0) - 28.125).abs() < 1e-9);
        assert!((spec.lat_of(j1) - 41.875).abs() < 1e-9);

        let (i0, i1) = spec.lon_indices(&window).unwrap();
        assert_eq!((i0, i1), (480, 539));
        assert!((spec.lon_of(i0) - 120.125).abs() < 1e-9);
        assert!((spec.lon_of(i1) - 134.875).abs() < 1e-9);
    }

    #[test]
    fn test_negative_longitude_normalized() {
        let spec = grids::oisst_quarter_degree();
        let window = LatLonWindow::new(25.0, 50.0, -125.0, -66.0).unwrap();

        let (i0, i1) = spec.lon_indices(&window).unwrap();
        assert!(spec.lon_of(i0) >= 235.0);
        assert!(spec.lon_of(i1) <= 294.0);
    }

    #[test]
    fn test_window_between_cell_centers_is_empty() {
        let spec = grids::oisst_quarter_degree();
        // Narrower than one cell and clear of any center.
        let window = LatLonWindow::new(28.01, 28.1, 120.01, 120.1).unwrap();
        assert!(spec.lat_indices(&window).is_none());
        assert!(spec.lon_indices(&window).is_none());
    }

    #[test]
    fn test_grid_shape_validation() {
        let err = SstGrid::new(vec![0.0; 5], 3, 2, vec![0.0; 2], vec![0.0; 3]);
        assert!(err.is_err());

        let grid = SstGrid::new(
            vec![1.0, f32::NAN, 3.0, 4.0, 5.0, 6.0],
            3,
            2,
            vec![10.0, 10.25],
            vec![20.0, 20.25, 20.5],
        )
        .unwrap();
        assert_eq!(grid.get(0, 2), Some(3.0));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.valid_count(), 5);
        assert_eq!(grid.min_max(), Some((1.0, 6.0)));
    }

    #[test]
    fn test_all_missing() {
        let grid = SstGrid::new(
            vec![f32::NAN; 4],
            2,
            2,
            vec![0.0, 0.25],
            vec![0.0, 0.25],
        )
        .unwrap();
        assert!(grid.all_missing());
        assert_eq!(grid.min_max(), None);
    }
}
