//! CIFAR-10 图像分类数据集
//!
//! 支持：
//! - 可选自动下载、解压（官方二进制版）
//! - 二进制分片解析，图像转为 [32, 32, 3] 通道在后布局
//! - 一次性加载全部数组，或按批惰性读取（多轮、可归一化）
//! - 读取类别名称
//!
//! 解压后的目录结构：
//! - `cifar-10-batches-bin/data_batch_{1..5}.bin`：训练分片，各 10,000 条
//! - `cifar-10-batches-bin/test_batch.bin`：测试分片，10,000 条
//! - `cifar-10-batches-bin/batches.meta.txt`：类别名称，每行一个

use std::path::{Path, PathBuf};

use ndarray::{Array1, Array4};

use crate::data::config::{CifarConfig, CifarVariant};
use crate::data::dataloader::{CifarBatches, Shard, check_label, images_from_hwc};
use crate::data::download::provision;
use crate::data::error::DataError;
use crate::data::record::PIXEL_BYTES;

/// 训练分片文件名（按读取顺序）
const TRAIN_FILES: [&str; 5] = [
    "data_batch_1.bin",
    "data_batch_2.bin",
    "data_batch_3.bin",
    "data_batch_4.bin",
    "data_batch_5.bin",
];

/// 测试分片文件名
const TEST_FILE: &str = "test_batch.bin";

/// 类别名称文件名
const LABEL_NAMES_FILE: &str = "batches.meta.txt";

/// CIFAR-10 类别数
pub const CIFAR10_NUM_CLASSES: usize = 10;

/// CIFAR-10 数据集
///
/// 包含 50,000 个训练样本（5 个分片）和 10,000 个测试样本。
/// 每个样本是 32x32 的 RGB 图像，标签为 0-9。
///
/// 本结构只持有配置与目录，不缓存任何数据；每次调用批次迭代器都会重新从文件开头读取。
#[derive(Debug, Clone)]
pub struct Cifar10Dataset {
    config: CifarConfig,
    dir: PathBuf,
}

impl Cifar10Dataset {
    /// 以给定配置创建（不检查文件，也不下载）
    pub fn new(config: CifarConfig) -> Self {
        let dir = config.dataset_dir(CifarVariant::Cifar10);
        Self { config, dir }
    }

    /// 完整加载 API
    ///
    /// # 参数
    /// - `config`: 读取配置（根目录、批大小等）
    /// - `download`: true=目录缺失时自动下载并解压
    pub fn load(config: CifarConfig, download: bool) -> Result<Self, DataError> {
        let dataset = Self::new(config);
        if download {
            dataset.prepare()?;
        } else if !dataset.dir.exists() {
            return Err(DataError::FileNotFound(dataset.dir.clone()));
        }
        Ok(dataset)
    }

    /// 便捷 API：默认配置（当前目录），自动下载
    pub fn load_default() -> Result<Self, DataError> {
        Self::load(CifarConfig::default(), true)
    }

    /// 下载并解压（已存在则跳过），返回是否实际执行了下载/解压
    pub fn prepare(&self) -> Result<bool, DataError> {
        provision(CifarVariant::Cifar10, &self.config)
    }

    pub fn config(&self) -> &CifarConfig {
        &self.config
    }

    /// 解压后的数据目录
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn num_classes(&self) -> usize {
        CIFAR10_NUM_CLASSES
    }

    /// 训练分片（按固定顺序）
    pub fn train_shards(&self) -> Vec<Shard> {
        TRAIN_FILES
            .iter()
            .map(|name| Shard::new(self.dir.join(name), self.config.records_per_shard))
            .collect()
    }

    /// 测试分片
    pub fn test_shards(&self) -> Vec<Shard> {
        vec![Shard::new(
            self.dir.join(TEST_FILE),
            self.config.records_per_shard,
        )]
    }

    /// 训练集批次迭代器：按分片顺序遍历 `epochs` 轮
    ///
    /// `epochs` 为 0 时迭代器为空。
    ///
    /// # Panics
    /// 如果 `batch_size` 为 0
    pub fn train_batches(&self, epochs: usize, batch_size: usize) -> CifarBatches {
        CifarBatches::new(
            self.train_shards(),
            epochs,
            batch_size,
            self.config.normalize,
            CIFAR10_NUM_CLASSES,
        )
    }

    /// 测试集批次迭代器：只遍历一轮
    ///
    /// # Panics
    /// 如果 `batch_size` 为 0
    pub fn test_batches(&self, batch_size: usize) -> CifarBatches {
        CifarBatches::new(
            self.test_shards(),
            1,
            batch_size,
            self.config.normalize,
            CIFAR10_NUM_CLASSES,
        )
    }

    /// 使用配置中的 `epochs` 和 `batch_size`
    pub fn train_batches_default(&self) -> CifarBatches {
        self.train_batches(self.config.epochs, self.config.batch_size)
    }

    /// 使用配置中的 `batch_size`
    pub fn test_batches_default(&self) -> CifarBatches {
        self.test_batches(self.config.batch_size)
    }

    /// 一次性加载全部训练集
    ///
    /// # 返回
    /// (images, labels)，形状 [N, 32, 32, 3] 和 [N]，像素为原始字节
    pub fn load_train(&self) -> Result<(Array4<u8>, Array1<u8>), DataError> {
        load_shards(&self.train_shards())
    }

    /// 一次性加载全部测试集
    pub fn load_test(&self) -> Result<(Array4<u8>, Array1<u8>), DataError> {
        load_shards(&self.test_shards())
    }

    /// 读取类别名称，下标 i 对应标签 i
    pub fn label_names(&self) -> Result<Vec<String>, DataError> {
        read_label_names(&self.dir.join(LABEL_NAMES_FILE))
    }
}

/// 依次读取分片中的全部记录
fn load_shards(shards: &[Shard]) -> Result<(Array4<u8>, Array1<u8>), DataError> {
    let total: usize = shards.iter().map(|shard| shard.records).sum();
    let mut labels = Vec::with_capacity(total);
    let mut pixels: Vec<u8> = Vec::with_capacity(total * PIXEL_BYTES);

    for shard in shards {
        for record in shard.reader()? {
            let record = record?;
            labels.push(check_label(record.label(), CIFAR10_NUM_CLASSES)?);
            pixels.extend(record.to_hwc().iter());
        }
    }

    Ok((images_from_hwc(pixels)?, Array1::from(labels)))
}

/// 读取类别名称文件：每行一个名称，去掉换行符与末尾空行
fn read_label_names(path: &Path) -> Result<Vec<String>, DataError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataError::MissingCatalog(path.to_path_buf()),
        _ => DataError::IoError(e),
    })?;

    let mut names: Vec<String> = content.lines().map(str::to_string).collect();
    while names.last().is_some_and(|name| name.is_empty()) {
        names.pop();
    }
    Ok(names)
}
