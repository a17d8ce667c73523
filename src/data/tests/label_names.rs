//! 类别名称读取单元测试

use super::synthetic_dataset;
use crate::data::DataError;

#[test]
fn test_label_names() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = synthetic_dataset(dir.path(), 1);
    std::fs::write(
        dataset.dir().join("batches.meta.txt"),
        "airplane\r\nautomobile\nbird\ncat\ndeer\ndog\nfrog\nhorse\nship\ntruck\n\n",
    )
    .unwrap();

    let names = dataset.label_names().expect("读取类别名称失败");
    assert_eq!(names.len(), 10);
    assert_eq!(names[0], "airplane");
    assert_eq!(names[1], "automobile");
    assert_eq!(names[9], "truck");
    assert!(names.iter().all(|name| !name.ends_with('\r')));
}

#[test]
fn test_label_names_missing() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = synthetic_dataset(dir.path(), 1);

    match dataset.label_names() {
        Err(DataError::MissingCatalog(path)) => {
            assert!(path.ends_with("batches.meta.txt"));
        }
        other => panic!("期望 MissingCatalog，得到 {other:?}"),
    }
}
