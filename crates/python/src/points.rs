use numpy::{PyArray2, PyArrayMethods, PyUntypedArrayMethods};
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use spatialrel_core::{LabelledCloud, LabelledPoint};

/// Labelled points decoded from an `(N, 3)` NumPy array. `float64` input keeps
/// full precision; `float32` input is kept in the cloud layout.
pub enum ScenePoints {
    Wide(Vec<LabelledPoint>),
    Cloud(LabelledCloud),
}

pub fn extract_points(array: &Bound<'_, PyAny>, labels: &[u32]) -> PyResult<ScenePoints> {
    if let Ok(arr) = array.downcast::<PyArray2<f64>>() {
        let data = contiguous_rows(arr, labels.len())?;
        let points = data
            .chunks_exact(3)
            .zip(labels)
            .map(|(p, &label)| LabelledPoint::new(p[0], p[1], p[2], label))
            .collect();
        return Ok(ScenePoints::Wide(points));
    }
    if let Ok(arr) = array.downcast::<PyArray2<f32>>() {
        let data = contiguous_rows(arr, labels.len())?;
        return Ok(ScenePoints::Cloud(LabelledCloud::from_array(&data, labels)));
    }
    Err(PyTypeError::new_err(
        "expected NumPy array with dtype float32 or float64, shape (N, 3)",
    ))
}

fn contiguous_rows<T>(array: &Bound<'_, PyArray2<T>>, expected_rows: usize) -> PyResult<Vec<T>>
where
    T: numpy::Element + Copy,
{
    if !array.is_c_contiguous() {
        return Err(PyValueError::new_err(
            "array must be C-contiguous (row-major). \
             Use numpy.ascontiguousarray(arr) to convert.",
        ));
    }
    let readonly = array.readonly();
    let shape = readonly.shape();
    if shape.len() != 2 || shape[1] != 3 {
        return Err(PyValueError::new_err("expected shape (N, 3)"));
    }
    if shape[0] != expected_rows {
        return Err(PyValueError::new_err(format!(
            "{} points were given with {} labels",
            shape[0], expected_rows
        )));
    }
    let slice = readonly
        .as_slice()
        .map_err(|_| PyValueError::new_err("failed to read array as contiguous slice"))?;
    Ok(slice.to_vec())
}
