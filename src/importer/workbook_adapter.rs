// ==========================================
// 名册导入引擎 - 工作簿适配器
// ==========================================
// 支持: Excel (.xlsx/.xls)，格式由内容自动识别
// 边界: 单元格在此处立即字符串化，下游只处理 String
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::ingest_trait::WorkbookGridAdapter;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use tracing::debug;

// ==========================================
// calamine 实现
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct CalamineWorkbookAdapter;

impl WorkbookGridAdapter for CalamineWorkbookAdapter {
    fn read_workbook_grid(&self, bytes: &[u8]) -> ImportResult<Vec<Vec<String>>> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("工作簿无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        let grid: Vec<Vec<String>> = range.rows().map(stringify_row).collect();

        debug!(sheet = %sheet_name, rows = grid.len(), "工作簿读取完成");

        Ok(grid)
    }
}

/// 单元格字符串化，并去掉行尾的空单元格
fn stringify_row(cells: &[Data]) -> Vec<String> {
    let used = cells
        .iter()
        .rposition(|cell| !matches!(cell, Data::Empty))
        .map_or(0, |last| last + 1);

    cells[..used].iter().map(stringify_cell).collect()
}

/// 单元格 → 自然标量文本
///
/// 整数值的浮点数不带小数部分（10.0 → "10"）。
pub fn stringify_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}
