use std::sync::Mutex;

use approx::assert_abs_diff_eq;
use image::{Rgb, RgbImage};
use nalgebra::Point2;
use ndarray::{arr3, Array3};
use stag_bridge::core::{is_supported_library_hd, max_error_correction};
use stag_bridge::{
    detect_markers, detect_markers_default, draw_detected_markers, draw_detected_markers_default,
    BorderColor, BridgeError, ConvertError, DetectParams, Detection, MarkerEngine, PointGroup,
    RawDetection,
};

#[derive(Debug, PartialEq, thiserror::Error)]
enum FakeEngineError {
    #[error("unsupported library HD {0}")]
    UnsupportedLibraryHd(i32),
    #[error("errorCorrection {got} out of range 0..={max}")]
    ErrorCorrectionOutOfRange { got: i32, max: i32 },
}

#[derive(Clone, Debug, PartialEq)]
struct DrawCall {
    groups: Vec<PointGroup>,
    ids: Vec<i32>,
    color: BorderColor,
}

/// Returns a scripted detection and paints corner pixels on draw.
#[derive(Default)]
struct FakeEngine {
    scripted: RawDetection,
    detect_calls: Mutex<Vec<(i32, i32)>>,
    draw_calls: Mutex<Vec<DrawCall>>,
}

impl FakeEngine {
    fn with_detection(scripted: RawDetection) -> Self {
        Self {
            scripted,
            ..Self::default()
        }
    }

    fn detect_calls(&self) -> Vec<(i32, i32)> {
        self.detect_calls.lock().unwrap().clone()
    }

    fn draw_calls(&self) -> Vec<DrawCall> {
        self.draw_calls.lock().unwrap().clone()
    }
}

impl MarkerEngine for FakeEngine {
    type Image = RgbImage;
    type Error = FakeEngineError;

    fn detect(
        &self,
        _image: &RgbImage,
        library_hd: i32,
        error_correction: i32,
    ) -> Result<RawDetection, FakeEngineError> {
        self.detect_calls
            .lock()
            .unwrap()
            .push((library_hd, error_correction));
        if !is_supported_library_hd(library_hd) {
            return Err(FakeEngineError::UnsupportedLibraryHd(library_hd));
        }
        let max = max_error_correction(library_hd);
        if error_correction != -1 && !(0..=max).contains(&error_correction) {
            return Err(FakeEngineError::ErrorCorrectionOutOfRange {
                got: error_correction,
                max,
            });
        }
        Ok(self.scripted.clone())
    }

    fn draw_overlay(
        &self,
        image: &mut RgbImage,
        corners: &[PointGroup],
        ids: &[i32],
        color: BorderColor,
    ) -> Result<(), FakeEngineError> {
        for pt in corners.iter().flatten() {
            let (x, y) = (pt.x as u32, pt.y as u32);
            if x < image.width() && y < image.height() {
                image.put_pixel(x, y, Rgb([color.r as u8, color.g as u8, color.b as u8]));
            }
        }
        self.draw_calls.lock().unwrap().push(DrawCall {
            groups: corners.to_vec(),
            ids: ids.to_vec(),
            color,
        });
        Ok(())
    }
}

fn init_logging() {
    let _ = stag_bridge::core::init_with_level(log::LevelFilter::Debug);
}

fn quad(points: [(f32, f32); 4]) -> PointGroup {
    points.iter().map(|&(x, y)| Point2::new(x, y)).collect()
}

fn unit_square() -> Vec<Vec<f32>> {
    vec![vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]]
}

#[test]
fn detection_arrays_are_well_shaped_for_any_count() {
    init_logging();
    let img = RgbImage::new(8, 8);
    for (n, m) in [(0, 0), (1, 0), (3, 2), (0, 4)] {
        let scripted = RawDetection {
            corners: (0..n)
                .map(|i| quad([(i as f32, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]))
                .collect(),
            ids: (0..n as i32).collect(),
            rejected: (0..m)
                .map(|_| quad([(5.0, 5.0), (6.0, 5.0), (6.0, 6.0), (5.0, 6.0)]))
                .collect(),
        };
        let engine = FakeEngine::with_detection(scripted);

        let detection = detect_markers_default(&engine, &img, 21).expect("detect");
        assert_eq!(detection.corners.shape(), &[n, 4, 2]);
        assert_eq!(detection.ids.shape(), &[n, 1]);
        assert_eq!(detection.rejected.shape(), &[m, 4, 2]);
        assert_eq!(detection.len(), n);
        assert_eq!(detection.rejected_len(), m);
        if n == 0 && m == 0 {
            assert_eq!(detection, Detection::empty());
            assert!(detection.is_empty());
        }
    }
}

#[test]
fn detection_truncates_engine_coordinates() {
    let engine = FakeEngine::with_detection(RawDetection {
        corners: vec![quad([(3.9, 4.2), (10.99, 4.5), (10.1, 12.7), (3.2, 12.01)])],
        ids: vec![17],
        rejected: vec![quad([(0.5, 0.5), (2.5, 0.5), (2.5, 2.5), (0.5, 2.5)])],
    });

    let (corners, ids, rejected) = detect_markers_default(&engine, &RgbImage::new(4, 4), 15)
        .expect("detect")
        .into_tuple();

    assert_eq!(
        corners,
        arr3(&[[[3.0_f32, 4.0], [10.0, 4.0], [10.0, 12.0], [3.0, 12.0]]])
    );
    assert_eq!(ids[[0, 0]], 17);
    assert_eq!(
        rejected,
        arr3(&[[[0.0_f32, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]]])
    );
}

#[test]
fn omitted_error_correction_forwards_the_sentinel() {
    let engine = FakeEngine::default();
    let img = RgbImage::new(2, 2);

    let implicit = detect_markers_default(&engine, &img, 19).expect("default");
    let explicit = detect_markers(&engine, &img, &DetectParams::new(19).with_error_correction(-1))
        .expect("explicit");

    assert_eq!(implicit, explicit);
    assert_eq!(engine.detect_calls(), vec![(19, -1), (19, -1)]);
}

#[test]
fn engine_errors_pass_through_unchanged() {
    let engine = FakeEngine::default();
    let img = RgbImage::new(2, 2);

    let err = detect_markers_default(&engine, &img, 12).unwrap_err();
    assert_eq!(err.to_string(), "unsupported library HD 12");
    assert_eq!(
        err.into_engine(),
        Some(FakeEngineError::UnsupportedLibraryHd(12))
    );

    let params = DetectParams::new(11).with_error_correction(6);
    let err = detect_markers(&engine, &img, &params).unwrap_err();
    assert!(matches!(
        err,
        BridgeError::Engine(FakeEngineError::ErrorCorrectionOutOfRange { got: 6, max: 5 })
    ));
    assert_eq!(engine.detect_calls(), vec![(12, -1), (11, 6)]);
}

#[test]
fn engine_ids_must_match_groups() {
    let engine = FakeEngine::with_detection(RawDetection {
        corners: vec![quad([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])],
        ids: vec![1, 2],
        rejected: Vec::new(),
    });
    let err = detect_markers_default(&engine, &RgbImage::new(2, 2), 21).unwrap_err();
    assert!(matches!(
        err,
        BridgeError::Convert(ConvertError::ShapeMismatch {
            expected: 1,
            got: 2,
            ..
        })
    ));
}

#[test]
fn draw_returns_the_same_image_and_mutates_it() {
    init_logging();
    let engine = FakeEngine::default();
    let mut img = RgbImage::new(4, 4);
    let before = img.clone();
    let img_ptr: *const RgbImage = &img;

    let out = draw_detected_markers(&engine, &mut img, unit_square(), [7], &[50, 255, 50])
        .expect("draw");
    assert!(std::ptr::eq(out, img_ptr));
    assert_eq!(*out.get_pixel(1, 1), Rgb([50, 255, 50]));
    assert_ne!(img, before);

    let calls = engine.draw_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].groups,
        vec![quad([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])]
    );
    assert_eq!(calls[0].ids, vec![7]);
    assert_eq!(calls[0].color, BorderColor::new(50, 255, 50));
}

#[test]
fn draw_defaults_match_explicit_arguments() {
    let engine = FakeEngine::default();
    let mut a = RgbImage::new(4, 4);
    let mut b = RgbImage::new(4, 4);

    draw_detected_markers_default(&engine, &mut a, unit_square()).expect("default");
    draw_detected_markers(
        &engine,
        &mut b,
        unit_square(),
        Vec::<i32>::new(),
        &[50, 255, 50],
    )
    .expect("explicit");

    assert_eq!(a, b);
    let calls = engine.draw_calls();
    assert_eq!(calls[0], calls[1]);
    assert!(calls[0].ids.is_empty());
    assert_eq!(calls[0].color, BorderColor::default());
}

#[test]
fn draw_keeps_fractional_client_coordinates() {
    let engine = FakeEngine::default();
    let mut img = RgbImage::new(4, 4);
    let corners = vec![vec![0.5_f32, 0.25, 2.5, 0.25, 2.5, 2.75, 0.5, 2.75]];

    draw_detected_markers(&engine, &mut img, corners, [1.0_f64], &[255, 0, 0]).expect("draw");

    let calls = engine.draw_calls();
    let call = &calls[0];
    assert_abs_diff_eq!(call.groups[0][0].x, 0.5);
    assert_abs_diff_eq!(call.groups[0][2].y, 2.75);
    assert_eq!(call.ids, vec![1]);
}

#[test]
fn invalid_color_fails_before_the_engine_runs() {
    let engine = FakeEngine::default();
    let mut img = RgbImage::new(4, 4);
    let before = img.clone();

    for color in [&[10, 20][..], &[10, 20, 30, 40][..]] {
        let err = draw_detected_markers(&engine, &mut img, unit_square(), [7], color).unwrap_err();
        match err {
            BridgeError::Convert(ConvertError::InvalidArgument(msg)) => {
                assert_eq!(msg, "Invalid value for border color.")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
    assert!(engine.draw_calls().is_empty());
    assert_eq!(img, before);
}

#[test]
fn malformed_corner_groups_fail_before_the_engine_runs() {
    let engine = FakeEngine::default();
    let mut img = RgbImage::new(4, 4);
    let corners = vec![vec![0.0_f32; 8], vec![0.0_f32; 7]];

    let err = draw_detected_markers_default(&engine, &mut img, corners).unwrap_err();
    assert!(matches!(
        err,
        BridgeError::Convert(ConvertError::ShapeMismatch {
            expected: 8,
            got: 7,
            ..
        })
    ));
    assert!(engine.draw_calls().is_empty());
}

#[test]
fn non_integer_ids_fail_with_type_conversion() {
    let engine = FakeEngine::default();
    let mut img = RgbImage::new(4, 4);
    let err =
        draw_detected_markers(&engine, &mut img, unit_square(), [1.5_f64], &[0, 0, 0]).unwrap_err();
    assert!(matches!(
        err,
        BridgeError::Convert(ConvertError::TypeConversion { index: 0, .. })
    ));
    assert!(engine.draw_calls().is_empty());
}

#[test]
fn id_count_mismatch_is_left_to_the_engine() {
    let engine = FakeEngine::default();
    let mut img = RgbImage::new(4, 4);
    let corners = vec![vec![0.0_f32; 8], vec![1.0_f32; 8]];

    draw_detected_markers(&engine, &mut img, corners, [3], &[0, 0, 255]).expect("draw");
    let calls = engine.draw_calls();
    let call = &calls[0];
    assert_eq!(call.groups.len(), 2);
    assert_eq!(call.ids, vec![3]);
}

#[test]
fn detection_output_feeds_straight_back_into_draw() {
    let scripted = RawDetection {
        corners: vec![
            quad([(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0)]),
            quad([(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]),
        ],
        ids: vec![4, 9],
        rejected: vec![quad([(2.0, 0.0), (3.0, 0.0), (3.0, 1.0), (2.0, 1.0)])],
    };
    let engine = FakeEngine::with_detection(scripted.clone());
    let mut img = RgbImage::new(4, 4);

    let detection = detect_markers_default(&engine, &img, 21).expect("detect");
    draw_detected_markers(
        &engine,
        &mut img,
        detection.corners.outer_iter(),
        detection.ids.iter(),
        &[50, 255, 50],
    )
    .expect("draw markers");
    draw_detected_markers_default(&engine, &mut img, detection.rejected.outer_iter())
        .expect("draw rejected");

    let calls = engine.draw_calls();
    assert_eq!(calls[0].groups, scripted.corners);
    assert_eq!(calls[0].ids, scripted.ids);
    assert_eq!(calls[1].groups, scripted.rejected);
    assert!(calls[1].ids.is_empty());
}

#[test]
fn detect_runs_concurrently_on_distinct_images() {
    let engine = FakeEngine::with_detection(RawDetection {
        corners: vec![quad([(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0)])],
        ids: vec![5],
        rejected: Vec::new(),
    });
    let images: Vec<RgbImage> = (0..4).map(|_| RgbImage::new(8, 8)).collect();
    let shared = &engine;

    let results: Vec<Array3<f32>> = std::thread::scope(|s| {
        let handles: Vec<_> = images
            .iter()
            .map(|img| {
                s.spawn(move || detect_markers_default(shared, img, 23).expect("detect"))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("join").corners)
            .collect()
    });

    assert!(results.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(engine.detect_calls().len(), 4);
}
