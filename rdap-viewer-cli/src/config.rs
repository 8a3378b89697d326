//! 配置服务
//!
//! JSON 配置文件，默认位于 `<config dir>/rdap-viewer/config.json`。
//! 文件不存在时使用默认值；命令行参数可覆盖文件中的值。

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use rdap_viewer_toolbox::{
    ClientOptions, DEFAULT_ENDPOINT, DEFAULT_PLACEHOLDER, DEFAULT_TIMEOUT, FormatOptions,
};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "rdap-viewer";
const CONFIG_FILE: &str = "config.json";

/// 应用配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// 查询服务地址（域名追加在末尾）
    pub endpoint: String,
    /// 请求超时（秒）
    pub timeout_secs: u64,
    /// 报告保存目录
    pub output_dir: PathBuf,
    /// 缺失字段的占位文本
    pub placeholder: String,
    /// HTTP User-Agent
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            output_dir: PathBuf::from("."),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            user_agent: ClientOptions::default().user_agent,
        }
    }
}

impl AppConfig {
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            endpoint: self.endpoint.clone(),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
            user_agent: self.user_agent.clone(),
        }
    }

    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            placeholder: self.placeholder.clone(),
        }
    }
}

/// 配置服务 trait
pub trait ConfigService: Send + Sync {
    /// 加载配置
    fn load(&self) -> Result<AppConfig>;

    /// 保存配置
    fn save(&self, config: &AppConfig, overwrite: bool) -> Result<()>;

    /// 配置文件位置
    fn path(&self) -> &Path;
}

/// 本地 JSON 文件配置服务
#[derive(Debug, Clone)]
pub struct LocalConfigService {
    path: PathBuf,
}

impl LocalConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 使用 `--config` 指定的路径，否则使用平台配置目录
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Ok(Self::new(path));
        }
        let dir = dirs::config_dir().context("Cannot determine the user config directory")?;
        Ok(Self::new(dir.join(APP_DIR).join(CONFIG_FILE)))
    }
}

impl ConfigService for LocalConfigService {
    fn load(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            tracing::debug!("No config file at {}, using defaults", self.path.display());
            return Ok(AppConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", self.path.display()))?;
        tracing::debug!("Loaded config from {}", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &AppConfig, overwrite: bool) -> Result<()> {
        if self.path.exists() && !overwrite {
            bail!(
                "{} already exists (use --force to replace it)",
                self.path.display()
            );
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let mut content = serde_json::to_string_pretty(config)?;
        content.push('\n');
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        tracing::info!("Wrote config to {}", self.path.display());
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let service = LocalConfigService::new(dir.path().join("config.json"));
        assert_eq!(service.load().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"timeoutSecs": 30, "placeholder": "-"}"#).unwrap();

        let config = LocalConfigService::new(&path).load().unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.placeholder, "-");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(LocalConfigService::new(&path).load().is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let service = LocalConfigService::new(dir.path().join("nested").join("config.json"));
        let config = AppConfig {
            endpoint: "https://rdap.example/domain/".into(),
            ..AppConfig::default()
        };
        service.save(&config, false).unwrap();
        assert_eq!(service.load().unwrap(), config);
    }

    #[test]
    fn test_save_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let service = LocalConfigService::new(dir.path().join("config.json"));
        service.save(&AppConfig::default(), false).unwrap();
        assert!(service.save(&AppConfig::default(), false).is_err());
        assert!(service.save(&AppConfig::default(), true).is_ok());
    }

    #[test]
    fn test_explicit_path_wins() {
        let service = LocalConfigService::resolve(Some(Path::new("/tmp/custom.json"))).unwrap();
        assert_eq!(service.path(), Path::new("/tmp/custom.json"));
    }

    #[test]
    fn test_client_options_timeout() {
        let config = AppConfig {
            timeout_secs: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.client_options().timeout, Duration::from_secs(1));
    }
}
