// ==========================================
// 名册导入引擎 - 配置层
// ==========================================
// 职责: 引擎配置（后端地址、导出策略、语言），支持环境变量覆写
// 存储: JSON 文件
// ==========================================

pub mod config_manager;
pub mod ingest_config;

// 重导出核心配置管理器
pub use config_manager::{env_keys, get_default_config_path, ConfigManager};
pub use ingest_config::{Environment, IngestConfig};
