use anyhow::{Context, Result};
use filetime::FileTime;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// 源文件存在时复制到目标位置（保留内容、权限、访问/修改时间），返回是否复制
///
/// 源文件不存在不算错误，直接返回 `Ok(false)`；权限不足等其余 I/O 失败都会向上传播。
pub fn scoped_copy(src: &Path, dst: &Path) -> Result<bool> {
    if !source_exists(src)? {
        debug!("⏭️  [复制] 源文件不存在，跳过: {}", src.display());
        return Ok(false);
    }

    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("创建目标目录失败: {}", parent.display()))?;
    }

    // fs::copy 会覆盖已有文件并复制权限位
    let bytes = fs::copy(src, dst)
        .with_context(|| format!("复制文件失败: {} -> {}", src.display(), dst.display()))?;

    let metadata = fs::metadata(src)
        .with_context(|| format!("读取源文件元数据失败: {}", src.display()))?;
    let atime = FileTime::from_last_access_time(&metadata);
    let mtime = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_times(dst, atime, mtime)
        .with_context(|| format!("设置文件时间失败: {}", dst.display()))?;

    debug!(
        "💾 [复制] {} -> {} ({} 字节)",
        src.display(),
        dst.display(),
        bytes
    );
    Ok(true)
}

/// 只有 NotFound / NotADirectory 视为不存在
fn source_exists(src: &Path) -> Result<bool> {
    match fs::metadata(src) {
        Ok(_) => Ok(true),
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => Ok(false),
        Err(e) => Err(e).with_context(|| format!("检查源文件失败: {}", src.display())),
    }
}
