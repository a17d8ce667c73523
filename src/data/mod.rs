//! 数据加载模块
//!
//! 提供 CIFAR 数据集的下载、解压、二进制记录解析和批处理功能。
//!
//! # 主要组件
//!
//! - [`Cifar10Dataset`]: CIFAR-10 数据集（准备、一次性加载、批次迭代、类别名称）
//! - [`CifarBatches`]: 惰性批次迭代器
//! - [`RecordReader`]: 二进制记录解析器
//! - [`CifarConfig`]: 读取配置
//! - [`download`]: 下载与解压（CIFAR-10 / CIFAR-100）
//! - [`transforms`]: 数据变换函数（归一化、通道布局转换）
//! - [`DataError`]: 数据加载错误类型
//!
//! # 使用示例
//!
//! ```ignore
//! use only_cifar::data::{Cifar10Dataset, CifarConfig, IMAGE_KEY};
//!
//! let dataset = Cifar10Dataset::load(CifarConfig::default().batch_size(500), true)?;
//! let names = dataset.label_names()?;
//!
//! for batch in dataset.train_batches_default() {
//!     let batch = batch?;
//!     model.forward(batch.features()[IMAGE_KEY])?;
//!     loss.backward()?;
//! }
//! ```

pub mod config;
mod dataloader;
pub mod datasets;
pub mod download;
pub mod error;
pub mod record;
pub mod transforms;

#[cfg(test)]
mod tests;

// Re-exports
pub use config::{CifarConfig, CifarVariant};
pub use dataloader::{BatchImages, CifarBatch, CifarBatches, IMAGE_KEY, Shard};
pub use datasets::{CIFAR10_NUM_CLASSES, Cifar10Dataset};
pub use error::DataError;
pub use record::{CifarRecord, RecordReader, write_records};
