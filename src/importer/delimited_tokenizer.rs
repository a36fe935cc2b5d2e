// ==========================================
// 名册导入引擎 - 分隔文本分词器
// ==========================================
// 阶段 0: 文本 → 表头行 + 数据行（位置对齐）
// 分隔符: 仅由首行判定（含 ';' 则为 ';'，否则 ','）
// 引号: 数据行中 '"' 只切换引号状态，不进入字段值；不处理 "" 转义
// ==========================================

use crate::domain::RawTable;
use crate::importer::error::{ImportError, ImportResult};
use tracing::debug;

/// 分号分隔符
pub const SEMICOLON: char = ';';

/// 逗号分隔符
pub const COMMA: char = ',';

const QUOTE: char = '"';

/// 分隔文本分词器（无状态）
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedTextTokenizer;

impl DelimitedTextTokenizer {
    /// 分词整个文本
    ///
    /// # 规则
    /// - 换行: 按 `\r\n` 或 `\n` 切分
    /// - 表头: 首行按分隔符直接切分（不识别引号），每项 trim + 去外层引号
    /// - 数据行: 引号感知的单遍扫描；空白行跳过
    ///
    /// # 返回
    /// - Err(MissingHeaderRow): 文本为空或首行为空白
    pub fn tokenize(&self, text: &str) -> ImportResult<RawTable> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = split_lines(text);

        let header_line = lines.next().unwrap_or("");
        if header_line.trim().is_empty() {
            return Err(ImportError::MissingHeaderRow);
        }

        let separator = detect_separator(header_line);
        let headers = split_header(header_line, separator);

        let rows: Vec<Vec<String>> = lines
            .filter(|line| !line.trim().is_empty())
            .map(|line| tokenize_line(line, separator))
            .collect();

        debug!(
            separator = %separator,
            headers = headers.len(),
            rows = rows.len(),
            "分隔文本分词完成"
        );

        Ok(RawTable { headers, rows })
    }
}

/// 按 `\r\n` 或 `\n` 切分行
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// 根据首行判定分隔符
///
/// 整个文件只判定一次，不逐行重判，也不回退。
pub fn detect_separator(first_line: &str) -> char {
    if first_line.contains(SEMICOLON) {
        SEMICOLON
    } else {
        COMMA
    }
}

/// 切分表头行（不识别引号）
pub fn split_header(line: &str, separator: char) -> Vec<String> {
    line.split(separator).map(clean_field).collect()
}

/// 引号感知的单行分词
///
/// 引号内的分隔符视为普通字符；引号字符只切换状态，不写入缓冲区，
/// 因此 `"Doe" Jr`、`""` 与未闭合的引号都不会在字段值中留下 '"'。
pub fn tokenize_line(line: &str, separator: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut buffer = String::new();
    let mut inside_quotes = false;

    for ch in line.chars() {
        if ch == QUOTE {
            inside_quotes = !inside_quotes;
        } else if ch == separator && !inside_quotes {
            fields.push(buffer.trim().to_string());
            buffer.clear();
        } else {
            buffer.push(ch);
        }
    }
    fields.push(buffer.trim().to_string());

    fields
}

/// 表头字段: trim 后去掉外层的一对引号（首尾都存在时）
pub fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix(QUOTE)
        .and_then(|rest| rest.strip_suffix(QUOTE))
        .unwrap_or(trimmed)
        .to_string()
}
