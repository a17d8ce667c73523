//! CIFAR 二进制记录解析
//!
//! 记录格式（无文件头、无分隔符，仅靠位置分帧）：
//! - [0] 标签（unsigned byte）
//! - [1..3073] 像素，按通道平面存放：先 1024 个红色，再绿色，再蓝色；每个平面按行优先 32x32

use std::io::{Read, Write};
use std::path::Path;

use ndarray::Array3;

use super::error::DataError;
use super::transforms::chw_to_hwc;

/// 图像高度
pub const IMAGE_HEIGHT: usize = 32;
/// 图像宽度
pub const IMAGE_WIDTH: usize = 32;
/// 通道数（RGB）
pub const IMAGE_CHANNELS: usize = 3;
/// 单张图像的像素字节数
pub const PIXEL_BYTES: usize = IMAGE_CHANNELS * IMAGE_HEIGHT * IMAGE_WIDTH;
/// 单条记录的字节数（1 字节标签 + 像素）
pub const RECORD_BYTES: usize = 1 + PIXEL_BYTES;

/// 一条 CIFAR-10 记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CifarRecord {
    label: u8,
    /// 通道优先 [3, 32, 32] 的原始字节
    pixels: Vec<u8>,
}

impl CifarRecord {
    /// 由标签和 3072 字节像素构造记录
    ///
    /// # Panics
    /// 如果 `pixels` 长度不是 3072
    pub fn new(label: u8, pixels: Vec<u8>) -> Self {
        assert_eq!(
            pixels.len(),
            PIXEL_BYTES,
            "CifarRecord: 像素字节数必须为 {PIXEL_BYTES}，得到 {}",
            pixels.len()
        );
        Self { label, pixels }
    }

    pub fn label(&self) -> u8 {
        self.label
    }

    /// 通道优先的原始像素
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// 转为 [32, 32, 3]（高、宽、通道）布局
    ///
    /// 满足 `hwc[[h, w, c]] == pixels[c * 1024 + h * 32 + w]`
    pub fn to_hwc(&self) -> Array3<u8> {
        chw_to_hwc(&self.pixels, IMAGE_CHANNELS, IMAGE_HEIGHT, IMAGE_WIDTH)
    }

    /// 按磁盘格式编码为 3073 字节
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(RECORD_BYTES);
        bytes.push(self.label);
        bytes.extend_from_slice(&self.pixels);
        bytes
    }

    /// 将图像保存为 32x32 RGB PNG，便于肉眼检查
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), DataError> {
        let hwc = self.to_hwc();
        let img = image::RgbImage::from_raw(
            IMAGE_WIDTH as u32,
            IMAGE_HEIGHT as u32,
            hwc.into_raw_vec(),
        )
        .ok_or_else(|| DataError::ImageError("像素缓冲区大小不匹配".to_string()))?;
        img.save(path.as_ref())
            .map_err(|e| DataError::ImageError(e.to_string()))
    }
}

/// 将记录依次写入 `writer`（与分片文件格式一致）
pub fn write_records<'a, W: Write>(
    writer: &mut W,
    records: impl IntoIterator<Item = &'a CifarRecord>,
) -> Result<(), DataError> {
    for record in records {
        writer.write_all(&[record.label])?;
        writer.write_all(&record.pixels)?;
    }
    Ok(())
}

/// 从字节流中按顺序读取固定条数的记录
///
/// 数据流在凑满 `count` 条完整记录前结束时返回 [`DataError::TruncatedRecord`]，之后不再产出。
pub struct RecordReader<R> {
    reader: R,
    remaining: usize,
    index: usize,
    failed: bool,
}

impl<R: Read> RecordReader<R> {
    pub fn new(reader: R, count: usize) -> Self {
        Self {
            reader,
            remaining: count,
            index: 0,
            failed: false,
        }
    }

    /// 还未读取的记录数
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    fn read_record(&mut self) -> Result<CifarRecord, DataError> {
        let mut buf = vec![0u8; RECORD_BYTES];
        let mut filled = 0;
        while filled < RECORD_BYTES {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(DataError::TruncatedRecord {
                        record: self.index,
                        expected: RECORD_BYTES,
                        got: filled,
                    });
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => return Err(DataError::IoError(e)),
            }
        }

        let pixels = buf.split_off(1);
        Ok(CifarRecord {
            label: buf[0],
            pixels,
        })
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<CifarRecord, DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining == 0 {
            return None;
        }

        let result = self.read_record();
        match result {
            Ok(_) => {
                self.remaining -= 1;
                self.index += 1;
            }
            Err(_) => self.failed = true,
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, Some(self.remaining))
        }
    }
}
