use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::layout::ReportKey;

/// index.json 文件名
pub const INDEX_FILE_NAME: &str = "index.json";

/// index.json 中的单条报告记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// 选手编号（一级目录名）
    pub player_id: String,
    /// 报告编号（二级目录名）
    pub report_id: String,
    /// 展示标题，目前固定为 report_id
    pub title: String,
}

impl IndexRecord {
    pub fn new(key: &ReportKey) -> Self {
        Self {
            player_id: key.player_id.clone(),
            report_id: key.report_id.clone(),
            title: key.report_id.clone(),
        }
    }
}

/// 将记录写入 `<destination_root>/index.json`，覆盖旧文件，返回写入路径
///
/// 输出为两空格缩进的 UTF-8 JSON，非 ASCII 字符原样保留。
pub fn write_index(destination_root: &Path, records: &[IndexRecord]) -> Result<PathBuf> {
    let index_path = destination_root.join(INDEX_FILE_NAME);
    let json = serde_json::to_string_pretty(records).context("序列化 index 失败")?;
    std::fs::write(&index_path, json)
        .with_context(|| format!("写入 index 文件失败: {}", index_path.display()))?;
    Ok(index_path)
}

/// 读取已有的 index.json
pub fn read_index(index_path: &Path) -> Result<Vec<IndexRecord>> {
    let content = std::fs::read_to_string(index_path)
        .with_context(|| format!("读取 index 文件失败: {}", index_path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("解析 index 文件失败: {}", index_path.display()))
}
