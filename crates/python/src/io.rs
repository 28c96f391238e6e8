use numpy::{PyArray1, PyArray2};
use pyo3::exceptions::PyIOError;
use pyo3::prelude::*;
use spatialrel_core::LabelledCloud;

use crate::points::{extract_points, ScenePoints};

/// Returns `(points, labels)`: an `(N, 3)` float32 array and a uint32 array.
#[pyfunction(name = "read_labelled_pcd")]
pub fn read_labelled_pcd_py<'py>(
    py: Python<'py>,
    path: &str,
) -> PyResult<(Bound<'py, PyArray2<f32>>, Bound<'py, PyArray1<u32>>)> {
    let cloud =
        spatialrel_io::read_labelled_pcd(path).map_err(|e| PyIOError::new_err(e.to_string()))?;
    let rows: Vec<Vec<f32>> = (0..cloud.len())
        .map(|i| vec![cloud.x[i], cloud.y[i], cloud.z[i]])
        .collect();
    let points = if rows.is_empty() {
        PyArray2::zeros_bound(py, [0, 3], false)
    } else {
        PyArray2::from_vec2_bound(py, &rows)?
    };
    Ok((points, PyArray1::from_vec_bound(py, cloud.labels)))
}

#[pyfunction(name = "write_labelled_pcd")]
pub fn write_labelled_pcd_py(
    path: &str,
    points: &Bound<'_, PyAny>,
    labels: Vec<u32>,
) -> PyResult<()> {
    let cloud = match extract_points(points, &labels)? {
        ScenePoints::Cloud(cloud) => cloud,
        ScenePoints::Wide(points) => {
            let mut cloud = LabelledCloud::new();
            for p in points {
                cloud.push(p.x as f32, p.y as f32, p.z as f32, p.label);
            }
            cloud
        }
    };
    spatialrel_io::write_labelled_pcd(path, &cloud).map_err(|e| PyIOError::new_err(e.to_string()))
}
