use anyhow::{bail, Context, Result};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::copy::scoped_copy;
use crate::index::{write_index, IndexRecord};
use crate::layout::{ReportKey, ReportLayout};

/// 导出结果
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// 解析后的源目录（绝对路径）
    pub source_root: PathBuf,
    /// 解析后的目标目录（绝对路径）
    pub destination_root: PathBuf,
    /// 写入的 index.json 路径
    pub index_path: PathBuf,
    /// 写入 index 的记录
    pub records: Vec<IndexRecord>,
    /// 遍历到的报告目录数量
    pub reports_scanned: usize,
    /// 实际复制的文件数量
    pub files_copied: usize,
    /// 源文件缺失而跳过的数量
    pub files_skipped: usize,
    /// 导出总耗时
    pub elapsed: Duration,
}

impl ExportSummary {
    /// index 中的报告数量
    pub fn report_count(&self) -> usize {
        self.records.len()
    }
}

/// 将 `<source_root>/<player_id>/<report_id>` 结构导出到 `destination_root`，并生成 index.json
pub fn export(
    source_root: impl AsRef<Path>,
    destination_root: impl AsRef<Path>,
) -> Result<ExportSummary> {
    let total_start = Instant::now();
    let (source_root, destination_root) =
        resolve_roots(source_root.as_ref(), destination_root.as_ref())?;

    info!(
        "📦 [导出] 开始导出: {} -> {}",
        source_root.display(),
        destination_root.display()
    );

    std::fs::create_dir_all(&destination_root)
        .with_context(|| format!("创建目标目录失败: {}", destination_root.display()))?;

    let mut records = Vec::new();
    let mut reports_scanned = 0usize;
    let mut files_copied = 0usize;
    let mut files_skipped = 0usize;

    for (player_id, player_dir) in list_subdirs(&source_root)? {
        for (report_id, _report_dir) in list_subdirs(&player_dir)? {
            reports_scanned += 1;
            let layout = ReportLayout::new(
                &source_root,
                &destination_root,
                ReportKey::new(player_id.clone(), report_id),
            );

            let mut has_summary = false;
            for job in layout.jobs() {
                let copied = scoped_copy(&job.source, &job.destination)?;
                if copied {
                    files_copied += 1;
                } else {
                    files_skipped += 1;
                }
                if job.is_summary {
                    has_summary = copied;
                }
            }

            if has_summary {
                debug!(
                    "📝 [导出] 加入 index: {}/{}",
                    layout.key.player_id, layout.key.report_id
                );
                records.push(IndexRecord::new(&layout.key));
            } else {
                warn!(
                    "⚠️  [导出] 缺少 summary.json，不写入 index: {}",
                    layout.report_dir.display()
                );
            }
        }
    }

    let index_path = write_index(&destination_root, &records)?;
    let elapsed = total_start.elapsed();

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("✅ [导出] 导出完成，耗时: {:.2}秒", elapsed.as_secs_f64());
    info!("  • 报告目录: {} 个", reports_scanned);
    info!("  • 写入 index: {} 个", records.len());
    info!("  • 复制文件: {} 个，跳过: {} 个", files_copied, files_skipped);
    info!("  • index 文件: {}", index_path.display());

    Ok(ExportSummary {
        source_root,
        destination_root,
        index_path,
        records,
        reports_scanned,
        files_copied,
        files_skipped,
        elapsed,
    })
}

/// 解析源/目标为绝对路径，并拒绝目标等于或位于源目录内部的情况
fn resolve_roots(source_root: &Path, destination_root: &Path) -> Result<(PathBuf, PathBuf)> {
    let source_root = source_root
        .canonicalize()
        .with_context(|| format!("源目录不存在或无法访问: {}", source_root.display()))?;
    if !source_root.is_dir() {
        bail!("源路径不是目录: {}", source_root.display());
    }

    let destination_root = resolve_path(destination_root)?;
    if destination_root.starts_with(&source_root) {
        bail!(
            "目标目录不能位于源目录内部: {} (源目录: {})",
            destination_root.display(),
            source_root.display()
        );
    }

    Ok((source_root, destination_root))
}

/// 逐段解析路径：跳过 `.`，`..` 回退一级，已存在的符号链接展开为真实路径
///
/// 目标路径可以尚不存在，缺失的部分按字面保留。
fn resolve_path(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)
        .with_context(|| format!("无法解析路径: {}", path.display()))?;

    let mut resolved = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => {
                resolved.push(name);
                match std::fs::symlink_metadata(&resolved) {
                    Ok(meta) if meta.file_type().is_symlink() => {
                        resolved = resolved
                            .canonicalize()
                            .with_context(|| format!("无法解析符号链接: {}", resolved.display()))?;
                    }
                    Ok(_) => {}
                    Err(e) if is_missing(&e) => {}
                    Err(e) => {
                        return Err(e)
                            .with_context(|| format!("无法解析路径: {}", resolved.display()))
                    }
                }
            }
        }
    }
    Ok(resolved)
}

fn is_missing(err: &std::io::Error) -> bool {
    matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}

/// 列出直接子目录，按名称字典序排序；非目录条目忽略
pub fn list_subdirs(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut subdirs = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("读取目录失败: {}", dir.display()))?
    {
        let entry = entry.with_context(|| format!("读取目录条目失败: {}", dir.display()))?;
        let path = entry.path();
        // 跟随符号链接判断类型；悬空链接当作非目录
        let is_dir = match std::fs::metadata(&path) {
            Ok(meta) => meta.is_dir(),
            Err(e) if is_missing(&e) => false,
            Err(e) => {
                return Err(e).with_context(|| format!("读取目录条目失败: {}", path.display()))
            }
        };
        if !is_dir {
            continue;
        }
        let name = entry.file_name().into_string().map_err(|raw| {
            anyhow::anyhow!(
                "目录名不是有效的 UTF-8，无法写入 index: {}",
                Path::new(&raw).display()
            )
        })?;
        subdirs.push((name, path));
    }
    subdirs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(subdirs)
}
