use std::str::FromStr;

use log::LevelFilter;
use numpy::{AllowTypeChange, PyArray1, PyArray2, PyArray3, PyArrayLikeDyn, PyArrayMethods};
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use stag_bridge::core::{init_with_level, DEFAULT_ERROR_CORRECTION, SUPPORTED_LIBRARY_HDS};
use stag_bridge::{
    decode_ids, decode_point_groups, BorderColor, BridgeError, ConvertError, Detection,
    DetectParams, MarkerEngine, PointGroup, RawDetection, DEFAULT_BORDER_COLOR,
    INVALID_BORDER_COLOR,
};

type CornersArray<'py> = Bound<'py, PyArray3<f32>>;
type IdsArray<'py> = Bound<'py, PyArray2<i32>>;

fn convert_error(err: ConvertError) -> PyErr {
    match err {
        ConvertError::TypeConversion { .. } => PyTypeError::new_err(err.to_string()),
        ConvertError::InvalidArgument(_) | ConvertError::ShapeMismatch { .. } => {
            PyValueError::new_err(err.to_string())
        }
    }
}

/// Engine errors are Python exceptions already and are re-raised as they are.
fn bridge_error(err: BridgeError<PyErr>) -> PyErr {
    match err {
        BridgeError::Engine(err) => err,
        BridgeError::Convert(err) => convert_error(err),
    }
}

/// Flatten each element of `obj` into `f32` values via `numpy.asarray`.
fn groups_from_py(obj: &Bound<'_, PyAny>) -> PyResult<Vec<Vec<f32>>> {
    let mut groups = Vec::new();
    for item in obj.try_iter()? {
        let item = item?;
        let values: PyArrayLikeDyn<'_, f32, AllowTypeChange> = item.extract()?;
        groups.push(values.as_array().iter().copied().collect());
    }
    Ok(groups)
}

/// Flatten an id iterable of any shape into `f64` values.
///
/// `f64` keeps non-integral input visible so that it fails id decoding
/// instead of being truncated by numpy.
fn ids_from_py(obj: &Bound<'_, PyAny>) -> PyResult<Vec<f64>> {
    let values: PyArrayLikeDyn<'_, f64, AllowTypeChange> = obj.extract()?;
    Ok(values.as_array().iter().copied().collect())
}

fn border_color_from_py(obj: &Bound<'_, PyAny>) -> PyResult<Vec<f64>> {
    if obj.len()? != 3 {
        return Err(convert_error(ConvertError::InvalidArgument(
            INVALID_BORDER_COLOR.to_string(),
        )));
    }
    obj.try_iter()?
        .map(|item| item?.extract::<f64>())
        .collect()
}

fn points_to_py(groups: &[PointGroup]) -> Vec<Vec<[f32; 2]>> {
    groups
        .iter()
        .map(|group| group.iter().map(|p| [p.x, p.y]).collect())
        .collect()
}

fn detection_to_py<'py>(
    py: Python<'py>,
    detection: &Detection,
) -> PyResult<(CornersArray<'py>, IdsArray<'py>, CornersArray<'py>)> {
    let (n, corners_per_marker, coords) = detection.corners.dim();
    let corners = PyArray1::from_vec(py, detection.corners.iter().copied().collect())
        .reshape([n, corners_per_marker, coords])?;

    let ids = PyArray1::from_vec(py, detection.ids.iter().copied().collect())
        .reshape([detection.len(), 1])?;

    let (m, corners_per_marker, coords) = detection.rejected.dim();
    let rejected = PyArray1::from_vec(py, detection.rejected.iter().copied().collect())
        .reshape([m, corners_per_marker, coords])?;

    Ok((corners, ids, rejected))
}

/// Adapter for an engine implemented in Python.
///
/// The object must provide `detect(image, libraryHD, errorCorrection)` and
/// `draw_overlay(image, groups, ids, color)`. Whatever those methods raise
/// reaches the caller untouched.
struct PyEngine<'py> {
    inner: Bound<'py, PyAny>,
}

impl<'py> MarkerEngine for PyEngine<'py> {
    type Image = Bound<'py, PyAny>;
    type Error = PyErr;

    fn detect(
        &self,
        image: &Bound<'py, PyAny>,
        library_hd: i32,
        error_correction: i32,
    ) -> PyResult<RawDetection> {
        let result = self
            .inner
            .call_method1("detect", (image.clone(), library_hd, error_correction))?;
        let (corners, ids, rejected): (Bound<'py, PyAny>, Bound<'py, PyAny>, Bound<'py, PyAny>) =
            result.extract()?;

        Ok(RawDetection {
            corners: decode_point_groups(groups_from_py(&corners)?).map_err(convert_error)?,
            ids: decode_ids(ids_from_py(&ids)?).map_err(convert_error)?,
            rejected: decode_point_groups(groups_from_py(&rejected)?).map_err(convert_error)?,
        })
    }

    fn draw_overlay(
        &self,
        image: &mut Bound<'py, PyAny>,
        corners: &[PointGroup],
        ids: &[i32],
        color: BorderColor,
    ) -> PyResult<()> {
        self.inner.call_method1(
            "draw_overlay",
            (
                image.clone(),
                points_to_py(corners),
                ids.to_vec(),
                (color.b, color.g, color.r),
            ),
        )?;
        Ok(())
    }
}

/// Detect STag markers in given image.
///
/// Parameters:
///  image : ndarray (HxWxC)
///      Input image. Supported channel counts are decided by the engine.
///  libraryHD : int
///      The HD library that is used. Engines ship [11, 13, 15, 17, 19, 21, 23].
///  errorCorrection : int, optional
///      Maximum number of corrected bit errors, 0 <= errorCorrection <= (HD-1)/2.
///      If omitted or set to -1, the maximum for the given HD library is used.
///  engine : object
///      Marker engine providing `detect` and `draw_overlay`.
///
/// Returns:
///  (corners, ids, rejectedImgPoints): float32 (N,4,2), int32 (N,1), float32 (M,4,2).
#[pyfunction]
#[pyo3(
    name = "detectMarkers",
    signature = (image, libraryHD, errorCorrection=DEFAULT_ERROR_CORRECTION, *, engine)
)]
#[allow(non_snake_case)]
fn detect_markers<'py>(
    py: Python<'py>,
    image: Bound<'py, PyAny>,
    libraryHD: i32,
    errorCorrection: i32,
    engine: Bound<'py, PyAny>,
) -> PyResult<(CornersArray<'py>, IdsArray<'py>, CornersArray<'py>)> {
    let engine = PyEngine { inner: engine };
    let params = DetectParams::new(libraryHD).with_error_correction(errorCorrection);
    let detection =
        stag_bridge::detect_markers(&engine, &image, &params).map_err(bridge_error)?;
    detection_to_py(py, &detection)
}

/// Draw detected markers in image.
///
/// Parameters:
///  image : ndarray (HxWxC)
///      Input/output image, drawn into in place and returned.
///  corners : iterable (Nx4x2)
///      Marker corners. Every element must hold exactly 8 numbers.
///  ids : iterable, optional
///      Identifiers for the markers in `corners`. Defaults to no ids.
///  border_color : tuple (b, g, r), optional
///      Color of marker borders. Defaults to (50, 255, 50).
///  engine : object
///      Marker engine providing `detect` and `draw_overlay`.
#[pyfunction]
#[pyo3(
    name = "drawDetectedMarkers",
    signature = (image, corners, ids=None, border_color=None, *, engine)
)]
fn draw_detected_markers<'py>(
    image: Bound<'py, PyAny>,
    corners: &Bound<'py, PyAny>,
    ids: Option<&Bound<'py, PyAny>>,
    border_color: Option<&Bound<'py, PyAny>>,
    engine: Bound<'py, PyAny>,
) -> PyResult<Bound<'py, PyAny>> {
    let groups = groups_from_py(corners)?;
    let ids = match ids {
        Some(ids) if !ids.is_none() => ids_from_py(ids)?,
        _ => Vec::new(),
    };
    let color = match border_color {
        Some(color) if !color.is_none() => border_color_from_py(color)?,
        _ => DEFAULT_BORDER_COLOR.to_array().map(f64::from).to_vec(),
    };

    let engine = PyEngine { inner: engine };
    let mut image = image;
    let drawn = stag_bridge::draw_detected_markers(&engine, &mut image, groups, ids, &color)
        .map_err(bridge_error)?;
    Ok(drawn.clone())
}

/// Install a stderr logger for the binding layer ("error" .. "trace").
#[pyfunction]
#[pyo3(signature = (level="info"))]
fn init_logging(level: &str) -> PyResult<()> {
    let level = LevelFilter::from_str(level)
        .map_err(|_| PyValueError::new_err(format!("unknown log level: {level}")))?;
    init_with_level(level).map_err(|err| PyValueError::new_err(err.to_string()))
}

#[pymodule]
fn stag(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(detect_markers, m)?)?;
    m.add_function(wrap_pyfunction!(draw_detected_markers, m)?)?;
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;
    m.add("SUPPORTED_LIBRARY_HDS", SUPPORTED_LIBRARY_HDS.to_vec())?;
    Ok(())
}
