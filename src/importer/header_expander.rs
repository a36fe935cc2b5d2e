// ==========================================
// 名册导入引擎 - 复合表头展开
// ==========================================
// 复合表头: 单个表头内以 ';' 编码多个逻辑列（如 "cedula;nombre"）
// 展开按"原始表头位置"对齐，必须在构建键值行之前进行
// ==========================================
// 歧义: 外层分隔符同为 ';' 时，外层切分先行，
//       表头中不会残留 ';'，展开为空操作
// ==========================================

use crate::domain::RawTable;
use tracing::debug;

/// 复合表头内部分隔符
pub const COMPOSITE_SEPARATOR: char = ';';

/// 复合表头展开器
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderExpander;

impl HeaderExpander {
    /// 展开复合表头及其对应单元格
    ///
    /// # 规则
    /// - 表头含 ';' → 拆分为若干子表头（trim），按原顺序拼接
    /// - 行内第 i 个单元格: 若原始表头 i 为复合表头，按 ';' 拆分（trim）
    ///   并以子值替换该单元格；否则原样保留
    /// - 子值个数不足时不补齐，后续单元格随之前移
    pub fn expand(&self, table: RawTable) -> RawTable {
        let composite: Vec<bool> = table.headers.iter().map(|h| is_composite(h)).collect();

        if !composite.iter().any(|c| *c) {
            return table;
        }

        let headers: Vec<String> = table
            .headers
            .iter()
            .flat_map(|header| split_composite(header))
            .collect();

        let rows: Vec<Vec<String>> = table
            .rows
            .into_iter()
            .map(|row| expand_row(row, &composite))
            .collect();

        debug!(
            composite_headers = composite.iter().filter(|c| **c).count(),
            expanded_headers = headers.len(),
            "复合表头展开完成"
        );

        RawTable { headers, rows }
    }
}

/// 是否为复合表头
pub fn is_composite(header: &str) -> bool {
    header.contains(COMPOSITE_SEPARATOR)
}

fn split_composite(value: &str) -> Vec<String> {
    if is_composite(value) {
        value
            .split(COMPOSITE_SEPARATOR)
            .map(|part| part.trim().to_string())
            .collect()
    } else {
        vec![value.to_string()]
    }
}

fn expand_row(row: Vec<String>, composite: &[bool]) -> Vec<String> {
    let mut expanded = Vec::with_capacity(row.len());

    for (index, value) in row.into_iter().enumerate() {
        if composite.get(index).copied().unwrap_or(false) {
            expanded.extend(
                value
                    .split(COMPOSITE_SEPARATOR)
                    .map(|part| part.trim().to_string()),
            );
        } else {
            expanded.push(value);
        }
    }

    expanded
}
