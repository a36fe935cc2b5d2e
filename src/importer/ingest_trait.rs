// ==========================================
// 名册导入引擎 - 导入 Trait
// ==========================================
// 职责: 定义解析阶段接口（不包含实现）
// ==========================================

use crate::domain::RawTable;
use crate::importer::error::ImportResult;

// ==========================================
// WorkbookGridAdapter Trait
// ==========================================
// 用途: 二进制工作簿解码能力（外部能力边界）
// 实现者: CalamineWorkbookAdapter
pub trait WorkbookGridAdapter: Send + Sync {
    /// 读取第一个工作表为二维数组
    ///
    /// # 参数
    /// - bytes: 工作簿文件内容
    ///
    /// # 返回
    /// - Ok(Vec<Vec<String>>): 第 0 行为表头；每个单元格已字符串化
    /// - Err: 工作簿损坏、无工作表
    fn read_workbook_grid(&self, bytes: &[u8]) -> ImportResult<Vec<Vec<String>>>;
}

// ==========================================
// GridParser Trait
// ==========================================
// 用途: 文件内容 → 位置对齐的原始表格（表头展开之前）
// 实现者: DelimitedTextParser, WorkbookParser
pub trait GridParser: Send + Sync {
    /// 解析文件内容
    ///
    /// # 返回
    /// - Ok(RawTable): 原始表头 + 原始行
    /// - Err: 解析失败（不携带行列诊断给调用方）
    fn parse_table(&self, content: &[u8]) -> ImportResult<RawTable>;
}
