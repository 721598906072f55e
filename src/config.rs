use anyhow::Result;
use std::env;
use std::path::{Path, PathBuf};

/// 导出配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// 源数据根目录（report_data）
    pub source: Option<PathBuf>,
    /// 目标目录（网页仓库中的 reports）
    pub destination: Option<PathBuf>,
    /// 日志级别（trace, debug, info, warn, error）
    pub log_level: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            source: None,
            destination: None,
            log_level: "info".to_string(),
        }
    }
}

impl ExportConfig {
    /// 取出源/目标目录，任一缺失时报错
    pub fn roots(&self) -> Result<(PathBuf, PathBuf)> {
        let source = self.source.clone().ok_or_else(|| {
            anyhow::anyhow!("未指定源目录（命令行参数、REPORT_EXPORT_SOURCE 或配置文件 [export] source）")
        })?;
        let destination = self.destination.clone().ok_or_else(|| {
            anyhow::anyhow!(
                "未指定目标目录（命令行参数、REPORT_EXPORT_DESTINATION 或配置文件 [export] destination）"
            )
        })?;
        Ok((source, destination))
    }
}

/// 配置文件中读到的原始值
#[derive(Debug, Clone, Default)]
struct FileConfig {
    source: Option<PathBuf>,
    destination: Option<PathBuf>,
    log_level: Option<String>,
}

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从多个源加载配置，优先级：命令行参数 > 环境变量 > 配置文件 > 默认值
    pub fn load_config(
        config_file: Option<&Path>,
        source: Option<PathBuf>,
        destination: Option<PathBuf>,
        log_level: Option<String>,
    ) -> Result<ExportConfig> {
        // 显式指定的配置文件必须可读；默认位置找不到则忽略
        let file_config = match config_file {
            Some(config_path) => Some(Self::load_from_file(config_path)?),
            None => Self::load_from_default_locations(),
        };

        let (env_source, env_destination, env_log_level) = Self::load_from_env();

        Ok(Self::merge(
            (source, destination, log_level),
            (env_source, env_destination, env_log_level),
            file_config.unwrap_or_default(),
        ))
    }

    fn merge(
        cli: (Option<PathBuf>, Option<PathBuf>, Option<String>),
        env: (Option<PathBuf>, Option<PathBuf>, Option<String>),
        file: FileConfig,
    ) -> ExportConfig {
        ExportConfig {
            source: cli.0.or(env.0).or(file.source),
            destination: cli.1.or(env.1).or(file.destination),
            log_level: cli
                .2
                .or(env.2)
                .or(file.log_level)
                .unwrap_or_else(|| ExportConfig::default().log_level),
        }
    }

    /// 从环境变量加载配置
    fn load_from_env() -> (Option<PathBuf>, Option<PathBuf>, Option<String>) {
        (
            env::var_os("REPORT_EXPORT_SOURCE")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            env::var_os("REPORT_EXPORT_DESTINATION")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            env::var("REPORT_EXPORT_LOG_LEVEL")
                .ok()
                .filter(|v| !v.is_empty()),
        )
    }

    /// 从INI配置文件加载配置
    fn load_from_file(config_path: &Path) -> Result<FileConfig> {
        if !config_path.exists() {
            return Err(anyhow::anyhow!("配置文件不存在: {}", config_path.display()));
        }

        let mut config_parser = configparser::ini::Ini::new();
        config_parser
            .load(config_path)
            .map_err(|e| anyhow::anyhow!("读取配置文件失败: {}: {}", config_path.display(), e))?;

        // 先读 [export] / [logging] 节，没有则回退到 [DEFAULT]
        let source = config_parser
            .get("export", "source")
            .or_else(|| config_parser.get("DEFAULT", "source"))
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let destination = config_parser
            .get("export", "destination")
            .or_else(|| config_parser.get("DEFAULT", "destination"))
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let log_level = config_parser
            .get("logging", "level")
            .or_else(|| config_parser.get("DEFAULT", "log_level"))
            .filter(|v| !v.is_empty());

        Ok(FileConfig {
            source,
            destination,
            log_level,
        })
    }

    /// 从默认位置加载配置文件
    fn load_from_default_locations() -> Option<FileConfig> {
        let mut candidates = vec![
            PathBuf::from("report-export.ini"),
            PathBuf::from(".report-export.ini"),
        ];
        if let Some(home) = env::var_os("HOME") {
            candidates.push(PathBuf::from(home).join(".report-export.ini"));
        }
        candidates.push(PathBuf::from("/etc/report-export.ini"));

        candidates
            .into_iter()
            .find(|path| path.exists())
            .and_then(|path| Self::load_from_file(&path).ok())
    }

    /// 创建默认配置文件
    pub fn create_default_config(config_path: &Path) -> Result<()> {
        let mut config_parser = configparser::ini::Ini::new();
        config_parser.set("export", "source", Some("".to_string()));
        config_parser.set("export", "destination", Some("./reports".to_string()));
        config_parser.set("logging", "level", Some("info".to_string()));

        config_parser
            .write(config_path)
            .map_err(|e| anyhow::anyhow!("写入配置文件失败: {}: {}", config_path.display(), e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn cli_beats_env_beats_file() {
        let file = FileConfig {
            source: Some(PathBuf::from("/file/src")),
            destination: Some(PathBuf::from("/file/dst")),
            log_level: Some("warn".to_string()),
        };
        let merged = ConfigLoader::merge(
            (Some(PathBuf::from("/cli/src")), None, None),
            (None, Some(PathBuf::from("/env/dst")), None),
            file,
        );
        assert_eq!(merged.source, Some(PathBuf::from("/cli/src")));
        assert_eq!(merged.destination, Some(PathBuf::from("/env/dst")));
        assert_eq!(merged.log_level, "warn");
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let merged = ConfigLoader::merge((None, None, None), (None, None, None), FileConfig::default());
        assert_eq!(merged, ExportConfig::default());
        assert!(merged.roots().is_err());
    }

    #[test]
    fn reads_sections_and_default_fallback() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("report-export.ini");
        std::fs::write(
            &path,
            "[DEFAULT]\nlog_level = debug\n\n[export]\nsource = /data/report_data\ndestination =\n",
        )
        .unwrap();

        let file = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(file.source, Some(PathBuf::from("/data/report_data")));
        assert_eq!(file.destination, None);
        assert_eq!(file.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn explicit_missing_config_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing.ini");
        let err = ConfigLoader::load_config(Some(&missing), None, None, None).unwrap_err();
        assert!(err.to_string().contains("配置文件不存在"), "{err:#}");
    }

    #[test]
    fn default_config_round_trips_through_loader() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("report-export.ini");
        ConfigLoader::create_default_config(&path).unwrap();

        let file = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(file.source, None);
        assert_eq!(file.destination, Some(PathBuf::from("./reports")));
        assert_eq!(file.log_level.as_deref(), Some("info"));
    }
}
