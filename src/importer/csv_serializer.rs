// ==========================================
// 名册导入引擎 - 分隔文本导出
// ==========================================
// 列: 映射中源表头非空的字段（映射声明顺序）
// 表头: 规范字段名（不是源表头）
// 行分隔: '\n'，末尾不追加换行
// ==========================================

use crate::domain::{CanonicalField, CanonicalRecord, FieldMapping};
use crate::importer::error::{ImportError, ImportResult};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 导出引号策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportQuoting {
    /// RFC 4180：含 `,` `"` 换行的值加引号，内部引号加倍
    #[default]
    Rfc4180,

    /// 旧格式：直接以 ',' 拼接，不加引号（与历史导出逐字节兼容）
    Legacy,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedTextSerializer {
    quoting: ExportQuoting,
}

impl DelimitedTextSerializer {
    pub fn new(quoting: ExportQuoting) -> Self {
        Self { quoting }
    }

    /// 渲染记录为分隔文本
    ///
    /// 没有活动字段时返回空串。
    pub fn serialize(
        &self,
        records: &[CanonicalRecord],
        mapping: &FieldMapping,
    ) -> ImportResult<String> {
        let fields = mapping.active_fields();
        if fields.is_empty() {
            return Ok(String::new());
        }

        let header: Vec<&str> = fields.iter().map(|f| f.name()).collect();
        let rows: Vec<Vec<&str>> = records.iter().map(|r| row_values(r, &fields)).collect();

        let content = match self.quoting {
            ExportQuoting::Rfc4180 => write_rfc4180(&header, &rows)?,
            ExportQuoting::Legacy => write_legacy(&header, &rows),
        };

        debug!(
            quoting = ?self.quoting,
            columns = fields.len(),
            rows = records.len(),
            "导出序列化完成"
        );

        Ok(content)
    }
}

/// 按字段顺序取值，缺失值为空串
fn row_values<'a>(record: &'a CanonicalRecord, fields: &[CanonicalField]) -> Vec<&'a str> {
    fields
        .iter()
        .map(|field| record.get(*field).unwrap_or(""))
        .collect()
}

fn write_legacy(header: &[&str], rows: &[Vec<&str>]) -> String {
    std::iter::once(header.join(","))
        .chain(rows.iter().map(|row| row.join(",")))
        .collect::<Vec<_>>()
        .join("\n")
}

fn write_rfc4180(header: &[&str], rows: &[Vec<&str>]) -> ImportResult<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ImportError::SerializeError(e.to_string()))?;
    let mut content =
        String::from_utf8(bytes).map_err(|e| ImportError::SerializeError(e.to_string()))?;

    // 行之间以 '\n' 连接，去掉末尾换行
    if content.ends_with('\n') {
        content.pop();
    }

    Ok(content)
}
