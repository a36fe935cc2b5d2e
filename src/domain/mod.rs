// ==========================================
// 名册导入引擎 - 领域模型层
// ==========================================
// 职责: 定义规范字段、原始表格、字段映射、规范记录
// 红线: 不含解析逻辑，不含 I/O
// ==========================================

pub mod grid;
pub mod mapping;
pub mod record;
pub mod types;

// 重导出核心类型
pub use grid::{RawGrid, RawRow, RawTable};
pub use mapping::{FieldMapping, MappingEntry};
pub use record::CanonicalRecord;
pub use types::CanonicalField;
