use nalgebra::DMatrix;
use spatialrel_core::{Result, SpatialRelError};
use spatialrel_stats::PairStatistics;
use tracing::debug;

use crate::config::QueryConfig;
use crate::normal::TruncatedNormal;

/// Scores over a square planar grid. Row `r` is the `r`-th x sample, column
/// `c` the `c`-th y sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueMap {
    values: DMatrix<f64>,
    xs: Vec<f64>,
    ys: Vec<f64>,
    contributing: usize,
}

/// Highest scoring grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestCell {
    pub row: usize,
    pub col: usize,
    pub position: [f64; 2],
    pub value: f64,
}

impl ValueMap {
    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Planar position sampled by cell `(row, col)`.
    pub fn position(&self, row: usize, col: usize) -> [f64; 2] {
        [self.xs[row], self.ys[col]]
    }

    /// Number of anchors whose learned pair statistics shaped the map.
    pub fn contributing_anchors(&self) -> usize {
        self.contributing
    }

    /// Cell with the largest value, first in row-major order on ties. `None`
    /// when no cell scored above zero.
    pub fn best_cell(&self) -> Option<BestCell> {
        let mut best: Option<BestCell> = None;
        for row in 0..self.values.nrows() {
            for col in 0..self.values.ncols() {
                let value = self.values[(row, col)];
                if value > best.map_or(0.0, |b| b.value) {
                    best = Some(BestCell {
                        row,
                        col,
                        position: self.position(row, col),
                        value,
                    });
                }
            }
        }
        best
    }
}

/// Scores every grid cell as a placement for `target` given anchor objects
/// observed at planar positions.
///
/// Each anchor adds the truncated-normal density of its distance to the cell,
/// using the learned distance statistics of the `(target, anchor)` pair.
/// Anchors whose pair was never observed contribute nothing.
pub fn value_map(
    stats: &PairStatistics,
    target: u32,
    anchors: &[(u32, [f64; 2])],
    config: &QueryConfig,
) -> Result<ValueMap> {
    config.validate()?;
    let max_labels = stats.max_labels();
    if target as usize >= max_labels {
        return Err(SpatialRelError::LabelOutOfRange {
            label: target,
            max_labels,
            point_index: 0,
        });
    }
    for (index, (label, _)) in anchors.iter().enumerate() {
        if *label as usize >= max_labels {
            return Err(SpatialRelError::LabelOutOfRange {
                label: *label,
                max_labels,
                point_index: index,
            });
        }
    }

    let xs = config.axis(config.center[0]);
    let ys = config.axis(config.center[1]);
    let radii = config.radii();
    let mut values = DMatrix::<f64>::zeros(xs.len(), ys.len());
    let mut contributing = 0;

    for &(label, [ax, ay]) in anchors {
        let stat = stats.get(target, label);
        if !stat.is_observed() {
            continue;
        }
        let sigma = stat.std_dev.max(config.min_sigma);
        let Some(dist) = TruncatedNormal::new(stat.mean, sigma, 0.0, config.radius_limit) else {
            debug!(
                target_label = target,
                anchor = label,
                mean = stat.mean,
                "pair has no mass in radius range"
            );
            continue;
        };
        let table: Vec<f64> = radii.iter().map(|r| dist.pdf(*r)).collect();

        for (row, x) in xs.iter().enumerate() {
            for (col, y) in ys.iter().enumerate() {
                let d = (x - ax).hypot(y - ay);
                values[(row, col)] += table[config.radius_bin(d)];
            }
        }
        contributing += 1;
    }

    debug!(
        target_label = target,
        anchors = anchors.len(),
        contributing,
        "value map computed"
    );

    Ok(ValueMap {
        values,
        xs,
        ys,
        contributing,
    })
}
