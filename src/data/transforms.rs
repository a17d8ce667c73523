//! 数据变换函数
//!
//! 提供常用的数据预处理操作，如像素归一化、通道布局转换等。

use ndarray::{Array, Array3, Dimension};

/// 将 0-255 像素值归一化到 0-1
///
/// # 参数
/// - `images`: 任意形状的字节数组，值范围 [0, 255]
///
/// # 返回
/// 同形状的 f32 数组，值范围 [0, 1]
pub fn normalize_pixels<D: Dimension>(images: &Array<u8, D>) -> Array<f32, D> {
    images.mapv(|v| f32::from(v) / 255.0)
}

/// 将通道优先（CHW）的扁平像素转为 [H, W, C] 数组
///
/// 结果满足 `hwc[[y, x, ch]] == pixels[ch * height * width + y * width + x]`
///
/// # Panics
/// 如果 `pixels.len() != channels * height * width`
pub fn chw_to_hwc(pixels: &[u8], channels: usize, height: usize, width: usize) -> Array3<u8> {
    let plane = height * width;
    assert_eq!(
        pixels.len(),
        channels * plane,
        "chw_to_hwc: 像素数必须为 {}x{}x{}，得到 {}",
        channels,
        height,
        width,
        pixels.len()
    );
    Array3::from_shape_fn((height, width, channels), |(y, x, ch)| {
        pixels[ch * plane + y * width + x]
    })
}
