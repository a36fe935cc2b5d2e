// ==========================================
// 名册导入引擎 - 记录投影
// ==========================================
// 职责: 按冻结的映射把原始行投影为规范记录
// 保证: 每条记录覆盖映射的全部键；不会失败
// ==========================================

use crate::domain::{CanonicalRecord, FieldMapping, RawRow};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct RecordProjector;

impl RecordProjector {
    /// 投影全部行（保持行顺序）
    pub fn project(&self, rows: &[RawRow], mapping: &FieldMapping) -> Vec<CanonicalRecord> {
        let records: Vec<CanonicalRecord> =
            rows.iter().map(|row| self.project_row(row, mapping)).collect();

        debug!(rows = rows.len(), fields = mapping.len(), "记录投影完成");
        records
    }

    /// 投影单行
    ///
    /// 1. 映射中的每个键初始化为空串
    /// 2. 源表头非空白且该行存在该键时覆盖
    pub fn project_row(&self, row: &RawRow, mapping: &FieldMapping) -> CanonicalRecord {
        let mut record = CanonicalRecord::with_fields(mapping.fields());

        for entry in mapping.entries() {
            let Some(source) = entry.source.as_deref() else {
                continue;
            };
            if source.trim().is_empty() {
                continue;
            }
            if let Some(value) = row.get(source) {
                record.insert(entry.field, value.clone());
            }
        }

        record
    }
}
