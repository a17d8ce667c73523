//! CIFAR 数据集配置
//!
//! 下载地址、目录名等按数据集变体固定；批大小、轮数、是否归一化、数据根目录
//! 等则由 [`CifarConfig`] 在构造时显式传入，默认值仅作兜底。

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::DataError;

/// 默认批大小（整除分片记录数，每个分片恰好两个批次）
pub const DEFAULT_BATCH_SIZE: usize = 5_000;

/// 默认训练轮数
pub const DEFAULT_EPOCHS: usize = 2;

/// 每个分片文件的记录数
pub const RECORDS_PER_SHARD: usize = 10_000;

/// CIFAR 数据集变体
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CifarVariant {
    /// 10 类，二进制分片可被本 crate 解码
    Cifar10,
    /// 100 类，仅支持下载与解压
    Cifar100,
}

impl CifarVariant {
    /// 官方二进制版压缩包地址
    pub fn url(&self) -> &'static str {
        match self {
            CifarVariant::Cifar10 => "http://www.cs.utoronto.ca/%7Ekriz/cifar-10-binary.tar.gz",
            CifarVariant::Cifar100 => "http://www.cs.utoronto.ca/%7Ekriz/cifar-100-binary.tar.gz",
        }
    }

    /// 解压后得到的目录名
    pub fn extracted_dir(&self) -> &'static str {
        match self {
            CifarVariant::Cifar10 => "cifar-10-batches-bin",
            CifarVariant::Cifar100 => "cifar-100-binary",
        }
    }
}

/// CIFAR 读取配置
///
/// # 示例
/// ```ignore
/// let config = CifarConfig::default()
///     .root("./datasets")
///     .batch_size(500)
///     .epochs(3)
///     .normalize(false);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CifarConfig {
    /// 压缩包与解压目录所在的根目录
    pub root: PathBuf,
    /// 批大小
    pub batch_size: usize,
    /// 训练集遍历轮数
    pub epochs: usize,
    /// 是否把像素归一化到 [0, 1]
    pub normalize: bool,
    /// 每个分片的记录数
    pub records_per_shard: usize,
}

impl Default for CifarConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            batch_size: DEFAULT_BATCH_SIZE,
            epochs: DEFAULT_EPOCHS,
            normalize: true,
            records_per_shard: RECORDS_PER_SHARD,
        }
    }
}

impl CifarConfig {
    /// 从 JSON 字符串解析配置，缺失字段取默认值
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        serde_json::from_str(json).map_err(|e| DataError::ConfigError(e.to_string()))
    }

    /// 从 JSON 文件读取配置
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DataError::FileNotFound(path.to_path_buf()),
            _ => DataError::IoError(e),
        })?;
        Self::from_json_str(&content)
    }

    /// 设置数据根目录
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// 设置批大小
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// 设置训练轮数
    pub fn epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// 设置是否归一化
    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// 设置每个分片的记录数（合成的小数据集用）
    pub fn records_per_shard(mut self, records_per_shard: usize) -> Self {
        self.records_per_shard = records_per_shard;
        self
    }

    /// 指定变体解压后的目录
    pub fn dataset_dir(&self, variant: CifarVariant) -> PathBuf {
        self.root.join(variant.extracted_dir())
    }
}
