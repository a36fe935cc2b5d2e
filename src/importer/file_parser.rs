// ==========================================
// 名册导入引擎 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: CSV (.csv) / Excel (.xlsx/.xls)
// 输出: 统一的 RawGrid（表头已展开）
// ==========================================

use crate::domain::{RawGrid, RawTable};
use crate::importer::delimited_tokenizer::DelimitedTextTokenizer;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::header_expander::HeaderExpander;
use crate::importer::ingest_trait::{GridParser, WorkbookGridAdapter};
use crate::importer::workbook_adapter::CalamineWorkbookAdapter;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, instrument};

// ==========================================
// 源文件格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    Workbook,
}

impl SourceFormat {
    /// 接受的扩展名（小写）
    pub const ACCEPTED_EXTENSIONS: [&'static str; 3] = [".csv", ".xlsx", ".xls"];

    /// 根据文件名判定格式（扩展名大小写不敏感）
    ///
    /// # 返回
    /// - Err(UnsupportedFormat): 扩展名不在 .csv/.xlsx/.xls 之内，解析前即拒绝
    pub fn from_file_name(file_name: &str) -> ImportResult<Self> {
        let lower = file_name.to_lowercase();

        if lower.ends_with(".csv") {
            Ok(SourceFormat::Csv)
        } else if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
            Ok(SourceFormat::Workbook)
        } else {
            Err(ImportError::UnsupportedFormat(file_name.to_string()))
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Csv => write!(f, "csv"),
            SourceFormat::Workbook => write!(f, "workbook"),
        }
    }
}

// ==========================================
// 分隔文本解析器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedTextParser {
    tokenizer: DelimitedTextTokenizer,
}

impl GridParser for DelimitedTextParser {
    fn parse_table(&self, content: &[u8]) -> ImportResult<RawTable> {
        // 非法 UTF-8 字节按替换字符处理
        let text = String::from_utf8_lossy(content);
        self.tokenizer.tokenize(&text)
    }
}

// ==========================================
// 工作簿解析器
// ==========================================
pub struct WorkbookParser {
    adapter: Box<dyn WorkbookGridAdapter>,
}

impl WorkbookParser {
    pub fn new(adapter: Box<dyn WorkbookGridAdapter>) -> Self {
        Self { adapter }
    }
}

impl Default for WorkbookParser {
    fn default() -> Self {
        Self::new(Box::new(CalamineWorkbookAdapter))
    }
}

impl GridParser for WorkbookParser {
    fn parse_table(&self, content: &[u8]) -> ImportResult<RawTable> {
        let mut grid = self.adapter.read_workbook_grid(content)?.into_iter();

        // 第 0 行为表头
        let headers = grid
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("工作表为空".to_string()))?;

        // 跳过没有单元格的行
        let rows: Vec<Vec<String>> = grid.filter(|row| !row.is_empty()).collect();

        Ok(RawTable { headers, rows })
    }
}

// ==========================================
// 格式路由（根据扩展名自动选择解析器）
// ==========================================
pub struct FormatRouter {
    csv: DelimitedTextParser,
    workbook: WorkbookParser,
    expander: HeaderExpander,
}

impl FormatRouter {
    pub fn new(workbook_adapter: Box<dyn WorkbookGridAdapter>) -> Self {
        Self {
            csv: DelimitedTextParser::default(),
            workbook: WorkbookParser::new(workbook_adapter),
            expander: HeaderExpander,
        }
    }

    /// 解析文件为 RawGrid
    ///
    /// # 流程
    /// 1. 扩展名检查（不支持则直接拒绝，不尝试解析）
    /// 2. 分词器 / 工作簿适配器
    /// 3. 复合表头展开
    /// 4. 按表头构建键值行
    #[instrument(skip(self, content), fields(bytes = content.len()))]
    pub fn parse(&self, file_name: &str, content: &[u8]) -> ImportResult<RawGrid> {
        let format = SourceFormat::from_file_name(file_name)?;
        debug!(format = %format, "选择解析器");

        let parser: &dyn GridParser = match format {
            SourceFormat::Csv => &self.csv,
            SourceFormat::Workbook => &self.workbook,
        };

        let table = parser.parse_table(content)?;
        let table = self.expander.expand(table);
        let grid = RawGrid::from_positional(table.headers, table.rows);

        info!(
            format = %format,
            headers = grid.headers.len(),
            rows = grid.row_count(),
            "文件解析完成"
        );

        Ok(grid)
    }
}

impl Default for FormatRouter {
    fn default() -> Self {
        Self::new(Box::new(CalamineWorkbookAdapter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 固定返回给定二维数组的工作簿适配器
    struct FixedWorkbook(Vec<Vec<String>>);

    impl WorkbookGridAdapter for FixedWorkbook {
        fn read_workbook_grid(&self, _bytes: &[u8]) -> ImportResult<Vec<Vec<String>>> {
            Ok(self.0.clone())
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_format_from_file_name() {
        assert_eq!(SourceFormat::from_file_name("a.CSV").unwrap(), SourceFormat::Csv);
        assert_eq!(
            SourceFormat::from_file_name("Egresados.Xlsx").unwrap(),
            SourceFormat::Workbook
        );
        assert_eq!(SourceFormat::from_file_name("old.xls").unwrap(), SourceFormat::Workbook);
        assert!(matches!(
            SourceFormat::from_file_name("notas.pdf"),
            Err(ImportError::UnsupportedFormat(_))
        ));
        assert!(SourceFormat::from_file_name("csv").is_err());
    }

    #[test]
    fn test_router_rejects_before_parsing() {
        let router = FormatRouter::new(Box::new(FixedWorkbook(vec![])));
        let result = router.parse("datos.txt", b"cedula\n1");
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_router_csv() {
        let router = FormatRouter::default();
        let grid = router
            .parse("datos.csv", b"cedula,primerNombre\n123,Ana\n456,Luis")
            .unwrap();

        assert_eq!(grid.headers, vec!["cedula", "primerNombre"]);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.rows[1].get("primerNombre"), Some(&"Luis".to_string()));
    }

    #[test]
    fn test_router_workbook_expands_composite_header() {
        let adapter = FixedWorkbook(vec![
            strings(&["cedula;nombre", "sede"]),
            strings(&["10;Ana", "Norte"]),
            vec![],
            strings(&["20;Luis"]),
        ]);
        let router = FormatRouter::new(Box::new(adapter));

        let grid = router.parse("egresados.xlsx", b"").unwrap();

        assert_eq!(grid.headers, vec!["cedula", "nombre", "sede"]);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.rows[0].get("nombre"), Some(&"Ana".to_string()));
        assert_eq!(grid.rows[0].get("sede"), Some(&"Norte".to_string()));
        assert!(grid.rows[1].get("sede").is_none());
    }

    #[test]
    fn test_empty_workbook_is_parse_failure() {
        let router = FormatRouter::new(Box::new(FixedWorkbook(vec![])));
        let err = router.parse("vacio.xlsx", b"").unwrap_err();
        assert!(err.is_parse_failure());
    }
}
