use std::path::{Path, PathBuf};

/// 单条复制规则：报告目录下的源文件 -> 输出目录下的标准文件名
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetRule {
    /// 相对报告目录的源路径（按路径段拆分，避免手动拼接分隔符）
    pub source: &'static [&'static str],
    /// 相对输出报告目录的目标路径
    pub destination: &'static [&'static str],
    /// 是否为 summary 文件（决定报告是否进入 index）
    pub is_summary: bool,
}

const fn rule(
    source: &'static [&'static str],
    destination: &'static [&'static str],
    is_summary: bool,
) -> AssetRule {
    AssetRule {
        source,
        destination,
        is_summary,
    }
}

/// 固定的复制清单
///
/// 顺序：summary / series，然后是主视频（重命名为 report_video.mp4），最后是五个叠加视频。
pub const ASSET_TABLE: [AssetRule; 8] = [
    rule(&["result", "summary.json"], &["summary.json"], true),
    rule(&["result", "series.json"], &["series.json"], false),
    rule(
        &["preprocessed_video.mp4"],
        &["assets", "report_video.mp4"],
        false,
    ),
    rule(&["result", "skeleton.mp4"], &["assets", "skeleton.mp4"], false),
    rule(
        &["result", "hand_trace.mp4"],
        &["assets", "hand_trace.mp4"],
        false,
    ),
    rule(
        &["result", "head_stability.mp4"],
        &["assets", "head_stability.mp4"],
        false,
    ),
    rule(
        &["result", "center_shift.mp4"],
        &["assets", "center_shift.mp4"],
        false,
    ),
    rule(
        &["result", "shoulder_hip_rotation.mp4"],
        &["assets", "shoulder_hip_rotation.mp4"],
        false,
    ),
];

/// 报告标识：(player_id, report_id)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportKey {
    pub player_id: String,
    pub report_id: String,
}

impl ReportKey {
    pub fn new(player_id: impl Into<String>, report_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            report_id: report_id.into(),
        }
    }
}

/// 一次具体的复制：源文件、目标文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyJob {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub is_summary: bool,
}

/// 单个报告的源/目标路径布局
#[derive(Debug, Clone)]
pub struct ReportLayout {
    pub key: ReportKey,
    /// <source_root>/<player_id>/<report_id>
    pub report_dir: PathBuf,
    /// <destination_root>/<player_id>/<report_id>
    pub output_dir: PathBuf,
}

impl ReportLayout {
    pub fn new(source_root: &Path, destination_root: &Path, key: ReportKey) -> Self {
        let report_dir = source_root.join(&key.player_id).join(&key.report_id);
        let output_dir = destination_root.join(&key.player_id).join(&key.report_id);
        Self {
            key,
            report_dir,
            output_dir,
        }
    }

    /// 按 ASSET_TABLE 顺序生成全部复制任务
    pub fn jobs(&self) -> Vec<CopyJob> {
        ASSET_TABLE
            .iter()
            .map(|rule| CopyJob {
                source: join_segments(&self.report_dir, rule.source),
                destination: join_segments(&self.output_dir, rule.destination),
                is_summary: rule.is_summary,
            })
            .collect()
    }
}

fn join_segments(base: &Path, segments: &[&str]) -> PathBuf {
    segments
        .iter()
        .fold(base.to_path_buf(), |path, segment| path.join(segment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_summary_rule() {
        let summaries: Vec<_> = ASSET_TABLE.iter().filter(|r| r.is_summary).collect();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].source, &["result", "summary.json"]);
    }

    #[test]
    fn main_video_is_renamed_and_overlays_keep_names() {
        let layout = ReportLayout::new(
            Path::new("/src"),
            Path::new("/dst"),
            ReportKey::new("p1", "r1"),
        );
        let jobs = layout.jobs();
        assert_eq!(jobs.len(), 8);

        let main_video = jobs
            .iter()
            .find(|j| j.source.ends_with("preprocessed_video.mp4"))
            .expect("main video rule");
        assert_eq!(
            main_video.source,
            Path::new("/src").join("p1").join("r1").join("preprocessed_video.mp4")
        );
        assert_eq!(
            main_video.destination,
            Path::new("/dst")
                .join("p1")
                .join("r1")
                .join("assets")
                .join("report_video.mp4")
        );

        for name in [
            "skeleton.mp4",
            "hand_trace.mp4",
            "head_stability.mp4",
            "center_shift.mp4",
            "shoulder_hip_rotation.mp4",
        ] {
            let job = jobs
                .iter()
                .find(|j| j.source.ends_with(Path::new("result").join(name)))
                .unwrap_or_else(|| panic!("missing overlay rule for {name}"));
            assert_eq!(job.destination, layout.output_dir.join("assets").join(name));
        }
    }

    #[test]
    fn json_files_land_directly_in_report_dir() {
        let layout = ReportLayout::new(
            Path::new("/src"),
            Path::new("/dst"),
            ReportKey::new("p1", "r1"),
        );
        let jobs = layout.jobs();
        assert_eq!(jobs[0].destination, layout.output_dir.join("summary.json"));
        assert!(jobs[0].is_summary);
        assert_eq!(jobs[1].destination, layout.output_dir.join("series.json"));
        assert!(!jobs[1].is_summary);
    }
}
