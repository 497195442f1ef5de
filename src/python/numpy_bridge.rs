//! Zero-copy numpy array interface.

use numpy::{PyArray1, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::prelude::*;

/// Convert numpy array to Vec<i64>.
pub fn numpy_to_vec_i64(arr: PyReadonlyArray1<i64>) -> Vec<i64> {
    arr.as_slice().unwrap().to_vec()
}

/// Convert Vec<f64> to numpy array.
pub fn vec_to_numpy_f64<'py>(py: Python<'py>, vec: Vec<f64>) -> &'py PyArray1<f64> {
    PyArray1::from_vec(py, vec)
}

/// Split a (rows x instruments) numpy array into per-instrument columns.
pub fn array2_to_columns(arr: &PyReadonlyArray2<f64>) -> Vec<Vec<f64>> {
    let view = arr.as_array();
    let (rows, cols) = view.dim();
    (0..cols)
        .map(|c| (0..rows).map(|r| view[[r, c]]).collect())
        .collect()
}
