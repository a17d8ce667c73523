//! 数据加载错误类型定义

use std::path::PathBuf;
use thiserror::Error;

/// 数据加载相关错误
#[derive(Debug, Error)]
pub enum DataError {
    /// 文件未找到
    #[error("文件未找到: {0}")]
    FileNotFound(PathBuf),

    /// IO 错误
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    /// 下载错误（非 200 状态码、连接失败或读取响应失败）
    #[error("下载错误 {url}: {reason}")]
    DownloadError { url: String, reason: String },

    /// 解压错误（压缩包损坏或格式不受支持）
    #[error("解压错误 {path}: {reason}")]
    ExtractionError { path: PathBuf, reason: String },

    /// 记录被截断：数据流在一条完整记录读完前结束
    #[error("第 {record} 条记录被截断: 期望 {expected} 字节, 实际 {got} 字节")]
    TruncatedRecord {
        record: usize,
        expected: usize,
        got: usize,
    },

    /// 标签名文件缺失
    #[error("标签名文件缺失: {0}")]
    MissingCatalog(PathBuf),

    /// 标签越界
    #[error("标签越界: {label} >= {num_classes}")]
    InvalidLabel { label: u8, num_classes: usize },

    /// 形状不匹配
    #[error("形状不匹配: 期望 {expected:?}, 实际元素数 {got}")]
    ShapeMismatch { expected: Vec<usize>, got: usize },

    /// 配置解析错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 图像导出错误
    #[error("图像错误: {0}")]
    ImageError(String),
}
