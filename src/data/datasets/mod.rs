//! 内置数据集
//!
//! 提供常用的预定义数据集：
//! - CIFAR-10：32x32 彩色图像十分类（二进制版）

mod cifar;

pub use cifar::{CIFAR10_NUM_CLASSES, Cifar10Dataset};
