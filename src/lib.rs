// ==========================================
// 名册导入引擎 - 核心库
// ==========================================
// 职责: 表格文件 (.csv/.xlsx/.xls) → 规范字段映射 → 规范记录 → CSV 导出/远程提交
// 技术栈: calamine + csv + reqwest + tokio
// 定位: 人工确认映射，引擎只提议不擅自决定
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "es");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 规范字段/表格/映射/记录
pub mod domain;

// 导入层 - 解析、映射、投影、导出
pub mod importer;

// 配置层 - 引擎配置
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 会话编排与远程提交
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{CanonicalField, CanonicalRecord, FieldMapping, RawGrid, RawRow};

// 导入层
pub use importer::{
    AutoMapper, DelimitedTextSerializer, ExportQuoting, FormatRouter, ImportError, MappingEditor,
    MappingTarget, RecordProjector, SourceFormat,
};

// 配置
pub use config::{ConfigManager, IngestConfig};

// API
pub use api::{ApiError, AuthContext, GraphqlUploadSink, IngestSession, SessionStep};

// ==========================================
// 常量定义
// ==========================================

// 版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 名称
pub const APP_NAME: &str = "roster-import";
