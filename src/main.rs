use anyhow::{Context, Result};
use clap::Parser;
use report_export::{config::ConfigLoader, export};
use std::path::PathBuf;
use std::str::FromStr;

/// 动作分析报告导出工具 - 将 player/report 结果整理为网页可用的目录并生成 index.json
#[derive(Parser, Debug)]
#[command(name = "report-export", version)]
#[command(about = "导出动作分析报告：复制 summary/series 与视频文件，生成 index.json", long_about = None)]
struct Args {
    /// 源数据根目录（report_data）
    /// 可通过环境变量 REPORT_EXPORT_SOURCE 或配置文件设置
    source: Option<PathBuf>,

    /// 目标目录（网页仓库中的 reports），不存在时自动创建
    /// 可通过环境变量 REPORT_EXPORT_DESTINATION 或配置文件设置
    destination: Option<PathBuf>,

    /// 配置文件路径（可选，支持 .ini 格式）
    /// 优先级：命令行参数 > 环境变量 > 配置文件 > 默认值
    #[arg(long)]
    config: Option<PathBuf>,

    /// 日志级别（trace, debug, info, warn, error）
    #[arg(long)]
    log_level: Option<String>,

    /// 在指定路径生成默认配置文件后退出
    #[arg(long, value_name = "PATH")]
    init_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = args.init_config {
        ConfigLoader::create_default_config(&path).context("生成默认配置文件失败")?;
        println!("已生成默认配置文件: {}", path.display());
        return Ok(());
    }

    let config = ConfigLoader::load_config(
        args.config.as_deref(),
        args.source,
        args.destination,
        args.log_level,
    )
    .context("加载配置失败")?;

    // 初始化日志（输出到 stderr，stdout 只保留完成摘要）
    let level = tracing::Level::from_str(&config.log_level)
        .map_err(|_| anyhow::anyhow!("无效的日志级别: {}", config.log_level))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let (source, destination) = config.roots()?;
    let summary = export(&source, &destination).context("导出报告失败")?;

    println!(
        "[完成] {} -> {} 导出完成，已生成 index.json",
        summary.source_root.display(),
        summary.destination_root.display()
    );
    println!("共 {} 个报告写入 index。", summary.report_count());

    Ok(())
}
