//! data 模块单元测试

mod label_names;
mod transforms;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::data::record::PIXEL_BYTES;
use crate::data::{Cifar10Dataset, CifarConfig, CifarRecord, write_records};

/// 构造一条像素可辨认的记录：第 i 个字节为 (i * 7 + seed) % 256
fn make_record(label: u8, seed: usize) -> CifarRecord {
    let pixels = (0..PIXEL_BYTES).map(|i| ((i * 7 + seed) % 256) as u8).collect();
    CifarRecord::new(label, pixels)
}

/// 将记录写成分片文件
fn write_shard(path: &Path, records: &[CifarRecord]) {
    let mut writer = BufWriter::new(File::create(path).expect("创建分片文件失败"));
    write_records(&mut writer, records).expect("写入分片失败");
}

/// 在 `root` 下构造一个合成的 CIFAR-10 目录：
/// 5 个训练分片 + 1 个测试分片，每个分片 `records_per_shard` 条记录，
/// 第 s 个分片第 i 条记录的标签为 (s + i) % 10
fn synthetic_dataset(root: &Path, records_per_shard: usize) -> Cifar10Dataset {
    let config = CifarConfig::default()
        .root(root)
        .records_per_shard(records_per_shard);
    let dataset = Cifar10Dataset::new(config);
    std::fs::create_dir_all(dataset.dir()).expect("创建数据目录失败");

    let names = [
        "data_batch_1.bin",
        "data_batch_2.bin",
        "data_batch_3.bin",
        "data_batch_4.bin",
        "data_batch_5.bin",
        "test_batch.bin",
    ];
    for (s, name) in names.iter().enumerate() {
        let records: Vec<_> = (0..records_per_shard)
            .map(|i| make_record(((s + i) % 10) as u8, s * 1000 + i))
            .collect();
        write_shard(&dataset.dir().join(name), &records);
    }
    dataset
}
