use crate::importer::ExportQuoting;
use serde::{Deserialize, Serialize};

/// 运行环境（决定远程提交地址）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// 导入引擎配置
///
/// 存储位置：JSON 文件（见 ConfigManager），所有字段均有默认值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// 运行环境
    pub environment: Environment,

    /// 开发环境后端地址
    pub endpoint_development: String,

    /// 生产环境后端地址
    pub endpoint_production: String,

    /// 导出引号策略
    pub export_quoting: ExportQuoting,

    /// 下载导出文件名
    pub export_file_name: String,

    /// 远程提交文件名
    pub submission_file_name: String,

    /// 界面语言（es / en / zh-CN）
    pub locale: String,

    /// 远程提交超时（秒）
    pub request_timeout_secs: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            endpoint_development: "http://localhost:4000".to_string(),
            endpoint_production: "https://unerg-api.unerg.tech".to_string(),
            export_quoting: ExportQuoting::Rfc4180,
            export_file_name: "datos_mapeados.csv".to_string(),
            submission_file_name: "datos_procesados.csv".to_string(),
            locale: "es".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl IngestConfig {
    /// 当前环境的后端地址
    pub fn backend_url(&self) -> &str {
        match self.environment {
            Environment::Development => &self.endpoint_development,
            Environment::Production => &self.endpoint_production,
        }
    }

    /// GraphQL 端点
    pub fn graphql_endpoint(&self) -> String {
        format!("{}/graphql", self.backend_url().trim_end_matches('/'))
    }
}
