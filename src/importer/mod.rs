// ==========================================
// 名册导入引擎 - 导入层
// ==========================================
// 职责: 原始字节 → RawGrid → 字段映射 → 规范记录 → 导出文本
// 支持: CSV (.csv), Excel (.xlsx/.xls)
// ==========================================
// 流程: 格式路由 → 分词/工作簿适配 → 复合表头展开
//       → 自动映射 → 映射编辑 → 记录投影 → 导出序列化
// ==========================================

// 模块声明
pub mod csv_serializer;
pub mod delimited_tokenizer;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod header_expander;
pub mod ingest_trait;
pub mod mapping_editor;
pub mod record_projector;
pub mod workbook_adapter;

// 重导出核心类型
pub use csv_serializer::{DelimitedTextSerializer, ExportQuoting};
pub use delimited_tokenizer::DelimitedTextTokenizer;
pub use error::{ImportError, ImportResult};
pub use field_mapper::AutoMapper;
pub use file_parser::{DelimitedTextParser, FormatRouter, SourceFormat, WorkbookParser};
pub use header_expander::HeaderExpander;
pub use mapping_editor::{MappingEditor, MappingTarget};
pub use record_projector::RecordProjector;
pub use workbook_adapter::CalamineWorkbookAdapter;

// 重导出 Trait 接口
pub use ingest_trait::{GridParser, WorkbookGridAdapter};
