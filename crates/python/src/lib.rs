#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;

mod dataset;
mod io;
mod points;

#[pymodule]
fn spatialrel(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<dataset::PyDataset>()?;
    m.add_class::<dataset::PyBestCell>()?;

    m.add_function(wrap_pyfunction!(io::read_labelled_pcd_py, m)?)?;
    m.add_function(wrap_pyfunction!(io::write_labelled_pcd_py, m)?)?;

    Ok(())
}
