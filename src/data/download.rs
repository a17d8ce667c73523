//! 通用下载与解压工具
//!
//! 提供 HTTP 分块下载、tar.gz 解压，以及二者组合成的幂等准备流程，供各数据集复用。

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use log::{debug, info, warn};
use tar::Archive;

use super::config::{CifarConfig, CifarVariant};
use super::error::DataError;

/// 下载时每次读写的字节数
const CHUNK_SIZE: usize = 1024;

/// 取 URL 的最后一段作为本地压缩包文件名
pub fn archive_file_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// 下载文件并保存到指定路径
///
/// 响应体按 [`CHUNK_SIZE`] 分块写入，不会整体读入内存。
/// 只有状态码 200 视为成功；失败时删除已写入的部分文件。
///
/// # 参数
/// - `url`: 下载地址
/// - `dest_path`: 保存路径
pub fn download_file(url: &str, dest_path: &Path) -> Result<(), DataError> {
    info!("正在下载 {url} ...");

    let download_error = |reason: String| DataError::DownloadError {
        url: url.to_string(),
        reason,
    };

    let response = match ureq::get(url).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(code, _)) => {
            return Err(download_error(format!("HTTP 状态码: {code}")));
        }
        Err(e) => return Err(download_error(format!("HTTP 请求失败: {e}"))),
    };

    if response.status() != 200 {
        return Err(download_error(format!(
            "HTTP 状态码: {}",
            response.status()
        )));
    }

    let mut reader = response.into_reader();
    let mut file = File::create(dest_path)?;
    let mut chunk = [0u8; CHUNK_SIZE];
    let copied = loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => break Err(download_error(format!("读取响应失败: {e}"))),
        };
        if let Err(e) = file.write_all(&chunk[..n]) {
            break Err(DataError::IoError(e));
        }
    };

    if let Err(e) = copied {
        drop(file);
        // 残缺的压缩包会让下次准备时直接走解压并失败
        if let Err(remove_error) = std::fs::remove_file(dest_path) {
            warn!("无法删除残缺的下载文件 {dest_path:?}: {remove_error}");
        }
        return Err(e);
    }
    file.flush()?;

    info!("下载完成: {dest_path:?}");
    Ok(())
}

/// 将 tar.gz 压缩包解压到 `dest_dir`
pub fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> Result<(), DataError> {
    info!("正在解压 {archive_path:?} ...");

    let extraction_error = |reason: String| DataError::ExtractionError {
        path: archive_path.to_path_buf(),
        reason,
    };

    let file = File::open(archive_path).map_err(|e| extraction_error(e.to_string()))?;
    let mut archive = Archive::new(GzDecoder::new(BufReader::new(file)));
    archive
        .unpack(dest_dir)
        .map_err(|e| extraction_error(e.to_string()))?;

    debug!("解压完成: {dest_dir:?}");
    Ok(())
}

/// 删除目录（不存在则忽略），失败只记录警告
fn remove_dir_logged(path: &Path) {
    if !path.exists() {
        return;
    }
    if let Err(e) = std::fs::remove_dir_all(path) {
        warn!("无法删除目录 {path:?}: {e}");
    }
}

/// 确保数据集已就位（幂等）
///
/// - `sentinel` 已存在：什么也不做，返回 `Ok(false)`
/// - 否则：压缩包缺失时先下载到 `archive_path`，再解压到其所在目录，返回 `Ok(true)`
///
/// 先解压到同目录下的临时目录，成功后才把其中的 `sentinel` 同名目录移到位，
/// 因此 `sentinel` 存在即代表解压完整。
/// 解压后找不到 `sentinel` 视为压缩包内容不符，返回解压错误。
pub fn ensure_present(url: &str, archive_path: &Path, sentinel: &Path) -> Result<bool, DataError> {
    if sentinel.exists() {
        debug!("{sentinel:?} 已存在，跳过下载与解压");
        return Ok(false);
    }

    let extraction_error = |reason: String| DataError::ExtractionError {
        path: archive_path.to_path_buf(),
        reason,
    };
    let Some(sentinel_name) = sentinel.file_name() else {
        return Err(extraction_error(format!("无效的目标目录 {sentinel:?}")));
    };

    let dest_dir = match archive_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dest_dir)?;

    if archive_path.exists() {
        debug!("{archive_path:?} 已存在，跳过下载");
    } else {
        download_file(url, archive_path)?;
    }

    let mut staging_name = std::ffi::OsString::from(".");
    staging_name.push(sentinel_name);
    staging_name.push(".partial");
    let staging = dest_dir.join(staging_name);
    // 上次中断留下的临时目录
    remove_dir_logged(&staging);

    if let Err(e) = extract_tar_gz(archive_path, &staging) {
        remove_dir_logged(&staging);
        return Err(e);
    }

    let extracted = staging.join(sentinel_name);
    if !extracted.exists() {
        remove_dir_logged(&staging);
        return Err(extraction_error(format!("解压后未找到 {sentinel:?}")));
    }
    if let Some(parent) = sentinel.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let moved = std::fs::rename(&extracted, sentinel);
    remove_dir_logged(&staging);
    moved?;
    Ok(true)
}

/// 按变体下载并解压，返回是否实际执行了下载/解压
pub fn provision(variant: CifarVariant, config: &CifarConfig) -> Result<bool, DataError> {
    let url = variant.url();
    let archive_path = config.root.join(archive_file_name(url));
    ensure_present(url, &archive_path, &config.dataset_dir(variant))
}

/// 按变体准备数据集，返回解压后的目录
pub fn prepare(variant: CifarVariant, config: &CifarConfig) -> Result<PathBuf, DataError> {
    provision(variant, config)?;
    Ok(config.dataset_dir(variant))
}

/// 准备 CIFAR-10（下载 + 解压，已存在则跳过）
pub fn prepare_cifar_10(config: &CifarConfig) -> Result<PathBuf, DataError> {
    prepare(CifarVariant::Cifar10, config)
}

/// 准备 CIFAR-100（下载 + 解压，已存在则跳过）
pub fn prepare_cifar_100(config: &CifarConfig) -> Result<PathBuf, DataError> {
    prepare(CifarVariant::Cifar100, config)
}
