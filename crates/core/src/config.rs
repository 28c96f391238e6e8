use serde::{Deserialize, Serialize};

use crate::error::{Result, SpatialRelError};

/// Tuning parameters shared by the scene builder and both relation models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Size of the label space; every label must be `< max_labels`.
    pub max_labels: usize,
    /// Separations at or below this distance are classified as the same position.
    pub same_threshold: f64,
    /// Separations strictly above this distance are classified as unrelated.
    pub no_relation_threshold: f64,
    /// Whether the z axis participates in the continuous distance model.
    pub use_3d: bool,
    /// Standard deviation reported for pairs that never co-occurred.
    pub deviation_sentinel: f64,
    /// Bearing-offset sector, in degrees, mapped to FRONT. Its mirror maps to
    /// BEHIND, offsets below the lower bound to LEFT, above the upper to RIGHT.
    pub front_sector: (f64, f64),
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_labels: 130,
            same_threshold: 0.1,
            no_relation_threshold: 2.0,
            use_3d: false,
            deviation_sentinel: 1_000_000.0,
            front_sector: (45.0, 135.0),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_labels == 0 {
            return Err(SpatialRelError::InvalidConfig(
                "max_labels must be > 0".into(),
            ));
        }
        if self.max_labels > u32::MAX as usize {
            return Err(SpatialRelError::InvalidConfig(format!(
                "max_labels must fit in a u32 label, got {}",
                self.max_labels
            )));
        }
        if !self.same_threshold.is_finite() || self.same_threshold < 0.0 {
            return Err(SpatialRelError::InvalidConfig(format!(
                "same_threshold must be finite and >= 0, got {}",
                self.same_threshold
            )));
        }
        if !self.no_relation_threshold.is_finite() || self.no_relation_threshold < 0.0 {
            return Err(SpatialRelError::InvalidConfig(format!(
                "no_relation_threshold must be finite and >= 0, got {}",
                self.no_relation_threshold
            )));
        }
        if self.same_threshold > self.no_relation_threshold {
            return Err(SpatialRelError::InvalidConfig(format!(
                "same_threshold ({}) exceeds no_relation_threshold ({})",
                self.same_threshold, self.no_relation_threshold
            )));
        }
        if !self.deviation_sentinel.is_finite() || self.deviation_sentinel <= 0.0 {
            return Err(SpatialRelError::InvalidConfig(format!(
                "deviation_sentinel must be finite and > 0, got {}",
                self.deviation_sentinel
            )));
        }
        let (lo, hi) = self.front_sector;
        if !(lo > 0.0 && lo < hi && hi < 180.0) {
            return Err(SpatialRelError::InvalidConfig(format!(
                "front_sector must satisfy 0 < lo < hi < 180, got ({}, {})",
                lo, hi
            )));
        }
        Ok(())
    }

    /// Checks that `label` fits the configured label space.
    pub fn check_label(&self, label: u32, point_index: usize) -> Result<()> {
        if (label as usize) < self.max_labels {
            Ok(())
        } else {
            Err(SpatialRelError::LabelOutOfRange {
                label,
                max_labels: self.max_labels,
                point_index,
            })
        }
    }
}
