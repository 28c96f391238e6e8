use numpy::PyArray2;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use spatialrel_core::{AnalysisConfig, SpatialRelError};
use spatialrel_query::{value_map, QueryConfig};
use spatialrel_relations::RelationClassifier;
use spatialrel_scene::{Dataset, SceneBuilder};
use spatialrel_stats::DistanceAggregator;

use crate::points::{extract_points, ScenePoints};

fn to_py_err(err: SpatialRelError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

#[pyclass(name = "BestCell")]
#[derive(Debug, Clone)]
pub struct PyBestCell {
    #[pyo3(get)]
    pub row: usize,
    #[pyo3(get)]
    pub col: usize,
    #[pyo3(get)]
    pub position: [f64; 2],
    #[pyo3(get)]
    pub value: f64,
}

#[pymethods]
impl PyBestCell {
    pub fn __repr__(&self) -> String {
        format!(
            "BestCell(x={:.3}, y={:.3}, value={:.6})",
            self.position[0], self.position[1], self.value
        )
    }
}

/// Collection of labelled scenes with optional observer positions.
#[pyclass(name = "Dataset")]
pub struct PyDataset {
    config: AnalysisConfig,
    inner: Dataset,
}

#[pymethods]
impl PyDataset {
    #[new]
    #[pyo3(signature = (max_labels=130, same_threshold=0.1, no_relation_threshold=2.0, use_3d=false))]
    pub fn new(
        max_labels: usize,
        same_threshold: f64,
        no_relation_threshold: f64,
        use_3d: bool,
    ) -> PyResult<Self> {
        let config = AnalysisConfig {
            max_labels,
            same_threshold,
            no_relation_threshold,
            use_3d,
            ..AnalysisConfig::default()
        };
        config.validate().map_err(to_py_err)?;
        Ok(Self {
            inner: Dataset::new(config.max_labels),
            config,
        })
    }

    /// Summarize an `(N, 3)` point array with per-point labels into a scene.
    #[pyo3(signature = (points, labels, reference=None))]
    pub fn add_scene(
        &mut self,
        points: &Bound<'_, PyAny>,
        labels: Vec<u32>,
        reference: Option<(f64, f64)>,
    ) -> PyResult<()> {
        let builder = SceneBuilder::from_config(&self.config);
        let scene = match extract_points(points, &labels)? {
            ScenePoints::Wide(points) => builder.build(points),
            ScenePoints::Cloud(cloud) => builder.build_cloud(&cloud),
        }
        .map_err(to_py_err)?;
        self.inner
            .push(scene, reference.map(|(x, y)| [x, y]))
            .map_err(to_py_err)
    }

    #[getter]
    pub fn max_labels(&self) -> usize {
        self.inner.max_labels()
    }

    /// Number of scenes each label appears in.
    pub fn presence_counts(&self) -> Vec<usize> {
        self.inner.presence_counts()
    }

    /// Returns `(mean, std_dev, count)` as `(max_labels, max_labels)` arrays.
    pub fn pair_statistics<'py>(
        &self,
        py: Python<'py>,
    ) -> PyResult<(
        Bound<'py, PyArray2<f64>>,
        Bound<'py, PyArray2<f64>>,
        Bound<'py, PyArray2<u64>>,
    )> {
        let stats = DistanceAggregator::new(&self.config).aggregate(&self.inner);
        let matrix = stats.matrix();
        let mean: Vec<Vec<f64>> = matrix.rows().map(|r| r.iter().map(|s| s.mean).collect()).collect();
        let std_dev: Vec<Vec<f64>> = matrix
            .rows()
            .map(|r| r.iter().map(|s| s.std_dev).collect())
            .collect();
        let count: Vec<Vec<u64>> = matrix
            .rows()
            .map(|r| r.iter().map(|s| s.count as u64).collect())
            .collect();
        Ok((
            PyArray2::from_vec2_bound(py, &mean)?,
            PyArray2::from_vec2_bound(py, &std_dev)?,
            PyArray2::from_vec2_bound(py, &count)?,
        ))
    }

    /// Relation codes (0 same, 1 left, 2 right, 3 front, 4 behind, 5 unrelated).
    pub fn relations<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let relations = RelationClassifier::new(&self.config).classify(&self.inner);
        let codes: Vec<Vec<u8>> = relations
            .rows()
            .map(|r| r.iter().map(|rel| rel.code()).collect())
            .collect();
        Ok(PyArray2::from_vec2_bound(py, &codes)?)
    }

    /// Placement scores for `target` around `(label, x, y)` anchors; rows are x samples.
    #[pyo3(signature = (target, anchors, cells=30, half_extent=10.0))]
    pub fn value_map<'py>(
        &self,
        py: Python<'py>,
        target: u32,
        anchors: Vec<(u32, f64, f64)>,
        cells: usize,
        half_extent: f64,
    ) -> PyResult<(Bound<'py, PyArray2<f64>>, Option<PyBestCell>)> {
        let query = QueryConfig {
            cells,
            half_extent,
            ..QueryConfig::default()
        };
        let stats = DistanceAggregator::new(&self.config).aggregate(&self.inner);
        let anchors: Vec<(u32, [f64; 2])> =
            anchors.into_iter().map(|(l, x, y)| (l, [x, y])).collect();
        let map = value_map(&stats, target, &anchors, &query).map_err(to_py_err)?;

        let values = map.values();
        let rows: Vec<Vec<f64>> = values
            .row_iter()
            .map(|r| r.iter().copied().collect())
            .collect();
        let best = map.best_cell().map(|b| PyBestCell {
            row: b.row,
            col: b.col,
            position: b.position,
            value: b.value,
        });
        Ok((PyArray2::from_vec2_bound(py, &rows)?, best))
    }

    pub fn __len__(&self) -> usize {
        self.inner.len()
    }

    pub fn __repr__(&self) -> String {
        format!(
            "Dataset(scenes={}, max_labels={})",
            self.inner.len(),
            self.inner.max_labels()
        )
    }
}
