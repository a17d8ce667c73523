//! transforms 模块单元测试

use approx::assert_abs_diff_eq;
use ndarray::{Array1, array};

use crate::data::transforms::{chw_to_hwc, normalize_pixels};

#[test]
fn test_normalize_pixels() {
    let pixels: Array1<u8> = array![0, 51, 255];
    let normalized = normalize_pixels(&pixels);

    assert_abs_diff_eq!(normalized[0], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(normalized[1], 0.2, epsilon = 1e-6);
    assert_abs_diff_eq!(normalized[2], 1.0, epsilon = 1e-6);
}

#[test]
fn test_normalize_keeps_shape() {
    let pixels = ndarray::Array4::<u8>::from_elem((2, 32, 32, 3), 128);
    let normalized = normalize_pixels(&pixels);
    assert_eq!(normalized.shape(), &[2, 32, 32, 3]);
}

#[test]
fn test_chw_to_hwc() {
    // 3 通道 2x2：R 平面 0..4，G 平面 10..14，B 平面 20..24
    let pixels = [0, 1, 2, 3, 10, 11, 12, 13, 20, 21, 22, 23];
    let hwc = chw_to_hwc(&pixels, 3, 2, 2);

    assert_eq!(hwc.shape(), &[2, 2, 3]);
    assert_eq!(hwc[[0, 0, 0]], 0);
    assert_eq!(hwc[[0, 1, 1]], 11);
    assert_eq!(hwc[[1, 0, 2]], 22);
    assert_eq!(hwc.iter().take(3).copied().collect::<Vec<_>>(), vec![0, 10, 20]);
}

#[test]
#[should_panic(expected = "chw_to_hwc")]
fn test_chw_to_hwc_wrong_length() {
    chw_to_hwc(&[0; 5], 3, 2, 2);
}
