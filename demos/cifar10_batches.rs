//! # CIFAR-10 批次读取示例
//!
//! 展示完整的数据准备流程：
//! - 自动下载并解压 CIFAR-10 二进制版（已存在则跳过）
//! - 读取类别名称
//! - 按批遍历一轮训练集（归一化到 [0, 1]）
//! - 将第一张训练图像保存为 PNG
//!
//! ## 运行
//! ```bash
//! RUST_LOG=info cargo run --example cifar10_batches
//! ```
//!
//! ## 数据集
//! 下载到当前目录：`cifar-10-binary.tar.gz` 与 `cifar-10-batches-bin/`

use std::time::Instant;

use only_cifar::data::{Cifar10Dataset, CifarConfig, DataError};

fn main() -> Result<(), DataError> {
    env_logger::init();
    println!("=== CIFAR-10 批次读取示例 ===\n");

    // 1. 准备数据
    println!("[1/3] 准备 CIFAR-10 数据集...");
    let config = CifarConfig::default().batch_size(5000).epochs(1);
    let dataset = Cifar10Dataset::load(config, true)?;
    let names = dataset.label_names()?;
    println!("  ✓ 目录: {:?}", dataset.dir());
    println!("  ✓ 类别: {}", names.join(", "));

    // 2. 遍历一轮训练集
    println!("\n[2/3] 遍历训练集...");
    let start = Instant::now();
    let mut counts = vec![0usize; dataset.num_classes()];
    let mut total = 0;
    for batch in dataset.train_batches_default() {
        let batch = batch?;
        total += batch.len();
        for &label in batch.labels() {
            counts[usize::from(label)] += 1;
        }
    }
    println!(
        "  ✓ 共 {} 张图像 ({:.1}s)",
        total,
        start.elapsed().as_secs_f32()
    );
    for (name, count) in names.iter().zip(&counts) {
        println!("    - {name}: {count}");
    }

    // 3. 导出第一张图像
    println!("\n[3/3] 导出样例图像...");
    if let Some(record) = dataset.train_shards()[0].reader()?.next() {
        let record = record?;
        let name = names
            .get(usize::from(record.label()))
            .map_or("unknown", String::as_str);
        let path = format!("cifar10_sample_{name}.png");
        record.save_png(&path)?;
        println!("  ✓ 已保存 {path}");
    }

    Ok(())
}
