use rayon::prelude::*;
use spatialrel_core::AnalysisConfig;
use spatialrel_scene::Dataset;
use tracing::info;

use crate::pair::{PairStat, PairStatistics};

/// Reduces a [`Dataset`] into per-pair centroid distance statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceAggregator {
    use_3d: bool,
    deviation_sentinel: f64,
}

impl DistanceAggregator {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            use_3d: config.use_3d,
            deviation_sentinel: config.deviation_sentinel,
        }
    }

    /// Centroid distances between labels `i` and `j` over every scene where
    /// both appear, in scene order. Non-positive distances are not samples.
    pub fn samples(&self, dataset: &Dataset, i: u32, j: u32) -> Vec<f64> {
        dataset
            .scenes()
            .iter()
            .filter_map(|scene| scene.pair(i, j))
            .map(|(a, b)| a.distance_to(b, self.use_3d))
            .filter(|d| *d > 0.0)
            .collect()
    }

    /// Computes [`PairStatistics`] for the dataset's whole label space.
    ///
    /// Pairs are evaluated in parallel; each pair reads the scenes in order, so
    /// repeated runs produce bit-identical matrices.
    pub fn aggregate(&self, dataset: &Dataset) -> PairStatistics {
        let labels = dataset.observed_labels();
        let pairs: Vec<(u32, u32)> = labels
            .iter()
            .enumerate()
            .flat_map(|(k, &i)| labels[k + 1..].iter().map(move |&j| (i, j)))
            .collect();

        let results: Vec<(u32, u32, PairStat)> = pairs
            .par_iter()
            .filter_map(|&(i, j)| {
                let samples = self.samples(dataset, i, j);
                PairStat::from_samples(&samples).map(|stat| (i, j, stat))
            })
            .collect();

        let mut stats = PairStatistics::unobserved(dataset.max_labels(), self.deviation_sentinel);
        for (i, j, stat) in &results {
            stats.set_pair(*i, *j, *stat);
        }

        info!(
            scenes = dataset.len(),
            labels = labels.len(),
            observed_pairs = results.len(),
            "pair statistics aggregated"
        );
        stats
    }
}
