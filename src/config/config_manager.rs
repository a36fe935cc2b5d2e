// ==========================================
// 名册导入引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、环境变量覆写
// 存储: JSON 文件（显式路径 > 用户配置目录 > 默认值）
// ==========================================

use crate::config::ingest_config::{Environment, IngestConfig};
use crate::importer::ExportQuoting;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// ==========================================
// 环境变量键
// ==========================================
pub mod env_keys {
    pub const ENVIRONMENT: &str = "ROSTER_IMPORT_ENV";
    pub const ENDPOINT: &str = "ROSTER_IMPORT_ENDPOINT";
    pub const EXPORT_QUOTING: &str = "ROSTER_IMPORT_EXPORT_QUOTING";
    pub const LOCALE: &str = "ROSTER_IMPORT_LOCALE";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    config: IngestConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 加载配置
    ///
    /// # 参数
    /// - path: 显式配置文件路径；None 时尝试用户配置目录
    ///
    /// # 返回
    /// - Err: 显式路径不存在或 JSON 格式错误
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let (mut config, source) = match path {
            Some(p) => (Self::read_file(p)?, Some(p.to_path_buf())),
            None => match get_default_config_path().filter(|p| p.exists()) {
                Some(p) => (Self::read_file(&p)?, Some(p)),
                None => (IngestConfig::default(), None),
            },
        };

        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok());

        info!(
            source = ?source,
            environment = ?config.environment,
            endpoint = %config.graphql_endpoint(),
            "配置加载完成"
        );

        Ok(Self { config, source })
    }

    /// 从已有配置创建（测试/嵌入场景）
    pub fn from_config(config: IngestConfig) -> Self {
        Self {
            config,
            source: None,
        }
    }

    fn read_file(path: &Path) -> Result<IngestConfig, Box<dyn Error>> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("配置文件读取失败 ({}): {}", path.display(), e))?;
        let config: IngestConfig = serde_json::from_str(&raw)?;
        debug!(path = %path.display(), "读取配置文件");
        Ok(config)
    }

    /// 应用环境变量覆写
    ///
    /// 非法取值只记录告警，保留原值。
    pub fn apply_env_overrides<F>(config: &mut IngestConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(env_keys::ENVIRONMENT) {
            match value.trim().to_lowercase().as_str() {
                "production" | "prod" => config.environment = Environment::Production,
                "development" | "dev" => config.environment = Environment::Development,
                other => warn!(key = env_keys::ENVIRONMENT, value = other, "环境变量取值非法"),
            }
        }

        if let Some(value) = lookup(env_keys::ENDPOINT).filter(|v| !v.trim().is_empty()) {
            let value = value.trim().to_string();
            match config.environment {
                Environment::Development => config.endpoint_development = value,
                Environment::Production => config.endpoint_production = value,
            }
        }

        if let Some(value) = lookup(env_keys::EXPORT_QUOTING) {
            match value.trim().to_lowercase().as_str() {
                "rfc4180" => config.export_quoting = ExportQuoting::Rfc4180,
                "legacy" => config.export_quoting = ExportQuoting::Legacy,
                other => warn!(key = env_keys::EXPORT_QUOTING, value = other, "环境变量取值非法"),
            }
        }

        if let Some(value) = lookup(env_keys::LOCALE).filter(|v| !v.trim().is_empty()) {
            config.locale = value.trim().to_string();
        }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    pub fn into_config(self) -> IngestConfig {
        self.config
    }

    /// 实际读取的配置文件
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// 默认配置文件路径：{用户配置目录}/roster-import/config.json
pub fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("roster-import").join("config.json"))
}
