//! # Only Cifar
//!
//! `only_cifar`负责为训练循环准备[CIFAR](https://www.cs.toronto.edu/~kriz/cifar.html)数据：
//! 按需下载并解压官方二进制压缩包，把定长二进制记录解析成`(图像, 标签)`批次，
//! 图像布局为`[N, 32, 32, 3]`，可选归一化到`[0, 1]`。
//!

pub mod data;
