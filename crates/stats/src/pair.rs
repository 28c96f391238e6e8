use spatialrel_core::LabelMatrix;

/// Mean reported for label pairs that never co-occurred.
pub const UNOBSERVED_MEAN: f64 = -1.0;

/// Distance statistics for one label pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairStat {
    pub mean: f64,
    pub std_dev: f64,
    pub count: usize,
}

impl PairStat {
    pub fn unobserved(deviation_sentinel: f64) -> Self {
        Self {
            mean: UNOBSERVED_MEAN,
            std_dev: deviation_sentinel,
            count: 0,
        }
    }

    /// Population mean and standard deviation of `samples`, or `None` when
    /// there are no samples.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let first = *samples.first()?;
        let n = samples.len() as f64;

        // Identical samples get an exact zero spread; the two-pass formula can
        // leave rounding residue when the mean is not representable.
        if samples.iter().all(|d| *d == first) {
            return Some(Self {
                mean: first,
                std_dev: 0.0,
                count: samples.len(),
            });
        }

        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            mean,
            std_dev: variance.sqrt(),
            count: samples.len(),
        })
    }

    pub fn is_observed(&self) -> bool {
        self.count > 0
    }
}

/// Symmetric matrix of [`PairStat`] over the whole label space.
///
/// Cells of pairs that never co-occurred, and the unused diagonal, hold
/// [`PairStat::unobserved`].
#[derive(Debug, Clone, PartialEq)]
pub struct PairStatistics {
    cells: LabelMatrix<PairStat>,
    deviation_sentinel: f64,
}

impl PairStatistics {
    pub fn unobserved(max_labels: usize, deviation_sentinel: f64) -> Self {
        Self {
            cells: LabelMatrix::filled(max_labels, PairStat::unobserved(deviation_sentinel)),
            deviation_sentinel,
        }
    }

    pub fn max_labels(&self) -> usize {
        self.cells.dim()
    }

    pub fn deviation_sentinel(&self) -> f64 {
        self.deviation_sentinel
    }

    pub fn get(&self, i: u32, j: u32) -> &PairStat {
        self.cells.get(i as usize, j as usize)
    }

    /// Records `stat` for the unordered pair `{i, j}`.
    ///
    /// # Panics
    ///
    /// Panics if `i == j` or either label is out of range.
    pub fn set_pair(&mut self, i: u32, j: u32, stat: PairStat) {
        assert_ne!(i, j, "self pairs carry no statistic");
        self.cells.set_symmetric(i as usize, j as usize, stat);
    }

    /// Observed unordered pairs `(i, j, stat)` with `i < j`.
    pub fn observed_pairs(&self) -> impl Iterator<Item = (u32, u32, &PairStat)> + '_ {
        self.cells
            .upper_pairs()
            .map(move |(i, j)| (i as u32, j as u32, self.cells.get(i, j)))
            .filter(|(_, _, s)| s.is_observed())
    }

    /// All unordered pairs `(i, j, stat)` with `i < j`, sentinels included.
    pub fn upper_pairs(&self) -> impl Iterator<Item = (u32, u32, &PairStat)> + '_ {
        self.cells
            .upper_pairs()
            .map(move |(i, j)| (i as u32, j as u32, self.cells.get(i, j)))
    }

    pub fn matrix(&self) -> &LabelMatrix<PairStat> {
        &self.cells
    }
}
