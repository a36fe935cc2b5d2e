// ==========================================
// 名册导入引擎 - 原始表格 (RawGrid)
// ==========================================
// 职责: 文件解析后的表头 + 行数据（未做语义解释）
// 约束: 行的键只来自表头；短行只填充已定义的前缀
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 原始行：表头 → 单元格文本（已去引号，未做类型转换）
pub type RawRow = HashMap<String, String>;

/// 位置对齐的原始单元格矩阵（表头展开之前）
///
/// 分词器与工作簿适配器的统一输出。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// 原始表格
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGrid {
    /// 展开后的表头（允许重复，位置即身份）
    pub headers: Vec<String>,

    /// 数据行（保持文件顺序）
    pub rows: Vec<RawRow>,
}

impl RawGrid {
    /// 由展开后的表头与按位置对齐的行值构建表格
    ///
    /// # 规则
    /// - 行值少于表头：仅填充已定义的前缀，其余表头键缺失（不补空串）
    /// - 行值多于表头：多余值丢弃
    /// - 重复表头：后出现的值覆盖先出现的值
    pub fn from_positional(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|values| {
                headers
                    .iter()
                    .zip(values)
                    .map(|(header, value)| (header.clone(), value))
                    .collect::<RawRow>()
            })
            .collect();

        Self { headers, rows }
    }

    /// 数据行数
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 表头是否存在
    pub fn has_header(&self, header: &str) -> bool {
        self.headers.iter().any(|h| h == header)
    }
}
