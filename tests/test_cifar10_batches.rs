/*
 * @Description  : CIFAR-10 端到端集成测试
 *                 验证：本地压缩包准备 + 类别名称 + 多轮批次迭代 + 一次性加载 的整体流程
 *                 数据为现场生成的小型合成数据集，不访问网络
 */

use std::fs::File;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use ndarray::s;
use only_cifar::data::{
    BatchImages, Cifar10Dataset, CifarConfig, CifarRecord, DataError, IMAGE_KEY, write_records,
};

const RECORDS_PER_SHARD: usize = 6;
const SHARD_NAMES: [&str; 6] = [
    "data_batch_1.bin",
    "data_batch_2.bin",
    "data_batch_3.bin",
    "data_batch_4.bin",
    "data_batch_5.bin",
    "test_batch.bin",
];
const LABEL_NAMES: &str =
    "airplane\nautomobile\nbird\ncat\ndeer\ndog\nfrog\nhorse\nship\ntruck\n\n";

/// 第 s 个分片第 i 条记录：标签 (s * 2 + i) % 10，像素全部为 s * 10 + i
fn shard_record(s: usize, i: usize) -> CifarRecord {
    CifarRecord::new(((s * 2 + i) % 10) as u8, vec![(s * 10 + i) as u8; 3072])
}

/// 生成与官方压缩包结构一致的 cifar-10-binary.tar.gz
fn build_archive(root: &Path) {
    let encoder = GzEncoder::new(
        File::create(root.join("cifar-10-binary.tar.gz")).unwrap(),
        Compression::fast(),
    );
    let mut builder = tar::Builder::new(encoder);

    for (s, name) in SHARD_NAMES.iter().enumerate() {
        let records: Vec<_> = (0..RECORDS_PER_SHARD).map(|i| shard_record(s, i)).collect();
        let mut bytes = Vec::new();
        write_records(&mut bytes, &records).unwrap();

        let mut header = tar::Header::new_gnu();
        header.set_size(bytes.len() as u64);
        header.set_mode(0o644);
        builder
            .append_data(
                &mut header,
                format!("cifar-10-batches-bin/{name}"),
                bytes.as_slice(),
            )
            .unwrap();
    }

    let mut header = tar::Header::new_gnu();
    header.set_size(LABEL_NAMES.len() as u64);
    header.set_mode(0o644);
    builder
        .append_data(
            &mut header,
            "cifar-10-batches-bin/batches.meta.txt",
            LABEL_NAMES.as_bytes(),
        )
        .unwrap();

    builder.into_inner().unwrap().finish().unwrap();
}

#[test]
fn test_cifar10_end_to_end() -> Result<(), DataError> {
    println!("=== CIFAR-10 端到端集成测试 ===\n");

    // 1. 准备数据（压缩包已在本地，只解压）
    let dir = tempfile::tempdir()?;
    build_archive(dir.path());
    let config = CifarConfig::default()
        .root(dir.path())
        .records_per_shard(RECORDS_PER_SHARD)
        .batch_size(4)
        .epochs(2);
    let dataset = Cifar10Dataset::load(config, true)?;
    assert!(dataset.dir().join("test_batch.bin").exists());

    // 2. 类别名称
    let names = dataset.label_names()?;
    assert_eq!(names.len(), dataset.num_classes());
    println!("类别: {names:?}");

    // 3. 两轮训练批次：每个分片 4 + 2
    let batches: Vec<_> = dataset
        .train_batches_default()
        .collect::<Result<_, _>>()?;
    assert_eq!(batches.len(), 2 * 5 * 2);
    let lengths: Vec<_> = batches.iter().map(|b| b.len()).collect();
    assert_eq!(lengths, [4, 2].repeat(10));
    assert_eq!(&batches[..10], &batches[10..]);

    for (k, batch) in batches.iter().enumerate() {
        let shard = (k % 10) / 2;
        let offset = if k % 2 == 0 { 0 } else { 4 };
        assert!(matches!(
            batch.features()[IMAGE_KEY],
            BatchImages::Normalized(_)
        ));
        let images = batch.images().as_normalized().expect("默认配置应归一化");
        assert_eq!(images.shape(), &[batch.len(), 32, 32, 3]);
        for j in 0..batch.len() {
            let expected = shard_record(shard, offset + j);
            assert_eq!(batch.labels()[j], expected.label());
            let value = (shard * 10 + offset + j) as f32 / 255.0;
            assert!(images.slice(s![j, .., .., ..]).iter().all(|&v| v == value));
        }
    }
    println!("训练批次数: {}", batches.len());

    // 4. 测试集：单轮
    let test_batches: Vec<_> = dataset.test_batches(5).collect::<Result<_, _>>()?;
    let test_labels: Vec<u8> = test_batches
        .iter()
        .flat_map(|b| b.labels().to_vec())
        .collect();
    assert_eq!(test_labels, vec![0, 1, 2, 3, 4, 5]);

    // 5. 一次性加载
    let (images, labels) = dataset.load_train()?;
    assert_eq!(images.shape(), &[30, 32, 32, 3]);
    assert_eq!(labels.len(), 30);
    assert!(labels.iter().all(|&l| usize::from(l) < dataset.num_classes()));

    // 6. 再次准备：不做任何事
    assert!(!dataset.prepare()?);

    Ok(())
}
