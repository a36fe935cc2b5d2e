// ==========================================
// 名册导入引擎 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 内部错误带完整诊断，仅用于日志；
//       对外展示由 api::ApiError 统一收敛
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("文件缺少表头行")]
    MissingHeaderRow,

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    // ===== 字段映射错误 =====
    #[error("未知表头: {0}")]
    UnknownHeader(String),

    #[error("字段映射无效: 至少需要映射一个字段")]
    InvalidMapping,

    // ===== 导出错误 =====
    #[error("导出序列化失败: {0}")]
    SerializeError(String),
}

impl ImportError {
    /// 是否为解析阶段错误（分词器/工作簿适配器抛出）
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            ImportError::MissingHeaderRow | ImportError::ExcelParseError(_)
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::SerializeError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_failure_classification() {
        assert!(ImportError::MissingHeaderRow.is_parse_failure());
        assert!(ImportError::ExcelParseError("x".into()).is_parse_failure());
        assert!(!ImportError::UnsupportedFormat("pdf".into()).is_parse_failure());
        assert!(!ImportError::FileReadError("x".into()).is_parse_failure());
    }

    #[test]
    fn test_io_error_maps_to_read_error() {
        let err: ImportError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, ImportError::FileReadError(_)));
    }

    #[test]
    fn test_csv_error_maps_to_serialize_error() {
        let err: ImportError = csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::WriteZero,
            "disk full",
        ))
        .into();
        assert!(matches!(err, ImportError::SerializeError(ref m) if m.contains("disk full")));
        assert!(!err.is_parse_failure());
    }
}
