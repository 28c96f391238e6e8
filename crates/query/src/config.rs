use serde::{Deserialize, Serialize};
use spatialrel_core::{Result, SpatialRelError};

/// Grid and distance discretization for [`value_map`](crate::value_map).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Planar center of the sampled square.
    pub center: [f64; 2],
    /// Half the side length of the sampled square.
    pub half_extent: f64,
    /// Samples per axis; the grid is `cells x cells`.
    pub cells: usize,
    /// Upper truncation bound of the distance distribution.
    pub radius_limit: f64,
    /// Number of evenly spaced radii in `[0, radius_limit]`.
    pub radius_bins: usize,
    /// Spread used for pairs whose learned deviation is smaller.
    pub min_sigma: f64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0],
            half_extent: 10.0,
            cells: 30,
            radius_limit: 7.0,
            radius_bins: 100,
            min_sigma: 0.05,
        }
    }
}

impl QueryConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.center.iter().all(|c| c.is_finite()) {
            return Err(SpatialRelError::InvalidConfig(
                "center must be finite".into(),
            ));
        }
        if !(self.half_extent.is_finite() && self.half_extent > 0.0) {
            return Err(SpatialRelError::InvalidConfig(format!(
                "half_extent must be positive, got {}",
                self.half_extent
            )));
        }
        if self.cells == 0 {
            return Err(SpatialRelError::InvalidConfig("cells must be > 0".into()));
        }
        if !(self.radius_limit.is_finite() && self.radius_limit > 0.0) {
            return Err(SpatialRelError::InvalidConfig(format!(
                "radius_limit must be positive, got {}",
                self.radius_limit
            )));
        }
        if self.radius_bins < 2 {
            return Err(SpatialRelError::InvalidConfig(
                "radius_bins must be >= 2".into(),
            ));
        }
        if !(self.min_sigma.is_finite() && self.min_sigma > 0.0) {
            return Err(SpatialRelError::InvalidConfig(format!(
                "min_sigma must be positive, got {}",
                self.min_sigma
            )));
        }
        Ok(())
    }

    /// Sample coordinates along one axis centred on `origin`.
    pub(crate) fn axis(&self, origin: f64) -> Vec<f64> {
        if self.cells == 1 {
            return vec![origin];
        }
        let step = 2.0 * self.half_extent / (self.cells - 1) as f64;
        (0..self.cells)
            .map(|k| origin - self.half_extent + step * k as f64)
            .collect()
    }

    /// Evenly spaced radii `0..=radius_limit`.
    pub(crate) fn radii(&self) -> Vec<f64> {
        let last = (self.radius_bins - 1) as f64;
        (0..self.radius_bins)
            .map(|k| self.radius_limit * k as f64 / last)
            .collect()
    }

    /// Index of the radius bin a planar distance falls in. Distances at or
    /// beyond `radius_limit` land in the last bin.
    pub(crate) fn radius_bin(&self, distance: f64) -> usize {
        let last = self.radius_bins - 1;
        if distance >= self.radius_limit {
            return last;
        }
        let step = self.radius_limit / last as f64;
        ((distance / step).floor() as usize).min(last)
    }
}
