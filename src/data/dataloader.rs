/*
 * @Description  : CifarBatches - 按分片顺序惰性读取 CIFAR 记录并组批
 *
 * 提供统一的批次迭代 API，支持：
 * - 多分片按固定顺序读取、多轮 (epochs) 重复
 * - 自动分批 (batch_size)，每个分片末尾不足一批的记录单独成批
 * - 可选像素归一化 (normalize)
 *
 * 同一时刻最多只打开一个分片文件，内存中最多只有一个批次。
 */

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use log::debug;
use ndarray::{Array1, Array4};

use super::error::DataError;
use super::record::{IMAGE_CHANNELS, IMAGE_HEIGHT, IMAGE_WIDTH, PIXEL_BYTES, RecordReader};
use super::transforms::normalize_pixels;

/// 批次中图像张量对应的键名
pub const IMAGE_KEY: &str = "image";

/// 批次图像：原始字节或归一化后的浮点数，形状均为 [N, 32, 32, 3]
#[derive(Debug, Clone, PartialEq)]
pub enum BatchImages {
    Raw(Array4<u8>),
    Normalized(Array4<f32>),
}

impl BatchImages {
    /// 图像数量
    pub fn len(&self) -> usize {
        self.shape()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            BatchImages::Raw(images) => images.shape(),
            BatchImages::Normalized(images) => images.shape(),
        }
    }

    pub fn as_raw(&self) -> Option<&Array4<u8>> {
        match self {
            BatchImages::Raw(images) => Some(images),
            BatchImages::Normalized(_) => None,
        }
    }

    pub fn as_normalized(&self) -> Option<&Array4<f32>> {
        match self {
            BatchImages::Normalized(images) => Some(images),
            BatchImages::Raw(_) => None,
        }
    }
}

/// 一个批次：图像 [N, 32, 32, 3] 与标签 [N]
#[derive(Debug, Clone, PartialEq)]
pub struct CifarBatch {
    images: BatchImages,
    labels: Array1<u8>,
}

impl CifarBatch {
    /// # Panics
    /// 如果图像数与标签数不一致
    pub fn new(images: BatchImages, labels: Array1<u8>) -> Self {
        assert_eq!(
            images.len(),
            labels.len(),
            "CifarBatch: 图像数和标签数必须一致，得到 {} vs {}",
            images.len(),
            labels.len()
        );
        Self { images, labels }
    }

    pub fn images(&self) -> &BatchImages {
        &self.images
    }

    pub fn labels(&self) -> &Array1<u8> {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// 以 [`IMAGE_KEY`] 为键的特征映射，交给训练代码使用
    pub fn features(&self) -> HashMap<&'static str, &BatchImages> {
        HashMap::from([(IMAGE_KEY, &self.images)])
    }

    /// 拆分为 (图像, 标签)
    pub fn into_parts(self) -> (BatchImages, Array1<u8>) {
        (self.images, self.labels)
    }
}

/// 一个分片文件及其记录数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shard {
    pub path: PathBuf,
    pub records: usize,
}

impl Shard {
    pub fn new(path: impl Into<PathBuf>, records: usize) -> Self {
        Self {
            path: path.into(),
            records,
        }
    }

    /// 打开分片文件，返回按记录读取的迭代器
    pub fn reader(&self) -> Result<RecordReader<BufReader<File>>, DataError> {
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DataError::FileNotFound(self.path.clone()),
            _ => DataError::IoError(e),
        })?;
        Ok(RecordReader::new(BufReader::new(file), self.records))
    }
}

/// 检查标签是否落在 [0, num_classes)
pub(crate) fn check_label(label: u8, num_classes: usize) -> Result<u8, DataError> {
    if usize::from(label) >= num_classes {
        return Err(DataError::InvalidLabel { label, num_classes });
    }
    Ok(label)
}

/// 由扁平的 HWC 像素构建 [N, 32, 32, 3] 数组
pub(crate) fn images_from_hwc(pixels: Vec<u8>) -> Result<Array4<u8>, DataError> {
    let n = pixels.len() / PIXEL_BYTES;
    let shape = (n, IMAGE_HEIGHT, IMAGE_WIDTH, IMAGE_CHANNELS);
    let got = pixels.len();
    Array4::from_shape_vec(shape, pixels).map_err(|_| DataError::ShapeMismatch {
        expected: vec![n, IMAGE_HEIGHT, IMAGE_WIDTH, IMAGE_CHANNELS],
        got,
    })
}

/// 批次迭代器
///
/// 每次 `next()` 只读取凑满一个批次所需的记录。出错时产出 `Some(Err(_))`，随后结束。
///
/// # 示例
/// ```ignore
/// for batch in dataset.train_batches(2, 500) {
///     let batch = batch?;
///     model.forward(batch.features()[IMAGE_KEY])?;
/// }
/// ```
pub struct CifarBatches {
    shards: Vec<Shard>,
    epochs: usize,
    batch_size: usize,
    normalize: bool,
    num_classes: usize,
    epoch: usize,
    shard_index: usize,
    current: Option<RecordReader<BufReader<File>>>,
    finished: bool,
}

impl CifarBatches {
    /// 创建批次迭代器（此时不打开任何文件）
    ///
    /// `epochs` 为 0 时不产出任何批次。
    ///
    /// # Panics
    /// 如果 `batch_size` 为 0
    pub fn new(
        shards: Vec<Shard>,
        epochs: usize,
        batch_size: usize,
        normalize: bool,
        num_classes: usize,
    ) -> Self {
        assert!(batch_size > 0, "CifarBatches: batch_size 必须大于 0");
        Self {
            shards,
            epochs,
            batch_size,
            normalize,
            num_classes,
            epoch: 0,
            shard_index: 0,
            current: None,
            finished: false,
        }
    }

    /// 完整遍历将产出的批次数
    pub fn num_batches(&self) -> usize {
        let per_epoch: usize = self
            .shards
            .iter()
            .map(|shard| shard.records.div_ceil(self.batch_size))
            .sum();
        per_epoch * self.epochs
    }

    fn fail(&mut self, error: DataError) -> Option<Result<CifarBatch, DataError>> {
        self.finished = true;
        self.current = None;
        Some(Err(error))
    }

    fn open_next_shard(&mut self) -> Result<bool, DataError> {
        if self.shards.is_empty() || self.epochs == 0 {
            return Ok(false);
        }
        if self.shard_index == self.shards.len() {
            self.epoch += 1;
            self.shard_index = 0;
            if self.epoch >= self.epochs {
                return Ok(false);
            }
        }
        let shard = &self.shards[self.shard_index];
        debug!(
            "第 {} 轮: 打开分片 {:?}（{} 条记录）",
            self.epoch + 1,
            shard.path,
            shard.records
        );
        self.current = Some(shard.reader()?);
        Ok(true)
    }

    fn build_batch(&self, pixels: Vec<u8>, labels: Vec<u8>) -> Result<CifarBatch, DataError> {
        let raw = images_from_hwc(pixels)?;
        let images = if self.normalize {
            BatchImages::Normalized(normalize_pixels(&raw))
        } else {
            BatchImages::Raw(raw)
        };
        Ok(CifarBatch::new(images, Array1::from(labels)))
    }
}

impl Iterator for CifarBatches {
    type Item = Result<CifarBatch, DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            if self.current.is_none() {
                match self.open_next_shard() {
                    Ok(true) => {}
                    Ok(false) => {
                        self.finished = true;
                        return None;
                    }
                    Err(e) => return self.fail(e),
                }
            }

            let batch_size = self.batch_size;
            let num_classes = self.num_classes;
            let Some(reader) = self.current.as_mut() else {
                continue;
            };

            let capacity = batch_size.min(reader.remaining());
            let mut labels = Vec::with_capacity(capacity);
            let mut pixels: Vec<u8> = Vec::with_capacity(capacity * PIXEL_BYTES);
            let mut error = None;
            while labels.len() < batch_size {
                match reader.next() {
                    None => break,
                    Some(Ok(record)) => match check_label(record.label(), num_classes) {
                        Ok(label) => {
                            labels.push(label);
                            pixels.extend(record.to_hwc().iter());
                        }
                        Err(e) => {
                            error = Some(e);
                            break;
                        }
                    },
                    Some(Err(e)) => {
                        error = Some(e);
                        break;
                    }
                }
            }
            if let Some(e) = error {
                return self.fail(e);
            }

            // 分片读完即关闭，末尾不足一批的记录已在本批中
            if reader.remaining() == 0 {
                self.current = None;
                self.shard_index += 1;
            }

            if labels.is_empty() {
                continue;
            }

            return match self.build_batch(pixels, labels) {
                Ok(batch) => Some(Ok(batch)),
                Err(e) => self.fail(e),
            };
        }
    }
}
