//! Geographic bounding boxes.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};

/// A lon/lat bounding box in degrees.
///
/// Longitudes and latitudes are treated as planar coordinates; no
/// antimeridian wrapping is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Smallest box enclosing every finite point of the given coordinates.
    ///
    /// Returns `None` when no finite coordinate pair exists.
    pub fn enclosing(lons: &[f64], lats: &[f64]) -> Option<Self> {
        let mut bbox: Option<Self> = None;
        for (&lon, &lat) in lons.iter().zip(lats) {
            if !lon.is_finite() || !lat.is_finite() {
                continue;
            }
            bbox = Some(match bbox {
                None => Self::new(lon, lat, lon, lat),
                Some(b) => Self::new(
                    b.min_lon.min(lon),
                    b.min_lat.min(lat),
                    b.max_lon.max(lon),
                    b.max_lat.max(lat),
                ),
            });
        }
        bbox
    }

    /// Reject boxes with non-finite or inverted corners.
    pub fn validate(&self) -> GridResult<()> {
        let corners = [self.min_lon, self.min_lat, self.max_lon, self.max_lat];
        if corners.iter().any(|c| !c.is_finite()) {
            return Err(GridError::InvalidBbox(format!("{:?} has non-finite corners", self)));
        }
        if self.min_lon > self.max_lon || self.min_lat > self.max_lat {
            return Err(GridError::InvalidBbox(format!("{:?} is inverted", self)));
        }
        Ok(())
    }

    /// Width in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Height in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Center point as (lon, lat).
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    /// Check if a point is contained within this bbox (edges inclusive).
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }

    /// Check if this bbox intersects another.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_lon < other.max_lon
            && self.max_lon > other.min_lon
            && self.min_lat < other.max_lat
            && self.max_lat > other.min_lat
    }

    /// Compute the intersection of two bounding boxes.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        if !self.intersects(other) {
            return None;
        }

        Some(BoundingBox {
            min_lon: self.min_lon.max(other.min_lon),
            min_lat: self.min_lat.max(other.min_lat),
            max_lon: self.max_lon.min(other.max_lon),
            max_lat: self.max_lat.min(other.max_lat),
        })
    }
}
