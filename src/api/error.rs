// ==========================================
// 名册导入引擎 - API层错误类型
// ==========================================
// 职责: 把导入层的技术错误收敛为固定的用户提示
// 约束: 解析失败不携带行号/列号/原始片段，诊断只进日志
// ==========================================

use crate::i18n::{t, t_with_args};
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 文件导入错误
    // ==========================================
    /// 扩展名不在 .csv/.xlsx/.xls 之内（解析前拒绝）
    #[error("{}", t("import.unsupported_extension"))]
    UnsupportedExtension,

    /// 宿主文件读取失败
    #[error("{}", t("import.read_failed"))]
    FileReadFailure,

    /// 分词器/工作簿适配器失败
    #[error("{}", t("import.parse_failed"))]
    ParseFailure,

    // ==========================================
    // 字段映射错误
    // ==========================================
    #[error("{}", t("mapping.invalid"))]
    InvalidMapping,

    #[error("{}", unknown_header_message(.0))]
    UnknownHeader(String),

    // ==========================================
    // 远程提交错误
    // ==========================================
    #[error("{}", t("submission.missing_token"))]
    MissingCredential,

    #[error("{}", submission_failed_message(.0))]
    SubmissionFailure(String),

    // ==========================================
    // 会话错误
    // ==========================================
    /// 当前步骤不允许该操作
    #[error("{}", invalid_state_message(.0))]
    InvalidState(String),

    /// 会话在操作完成前被重置，结果已丢弃
    #[error("{}", t("import.stale_result"))]
    StaleResult,

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

fn unknown_header_message(header: &str) -> String {
    t_with_args("mapping.unknown_header", &[("header", header)])
}

fn submission_failed_message(detail: &str) -> String {
    if detail.trim().is_empty() {
        t("submission.failed")
    } else {
        format!("{}: {}", t("submission.failed"), detail)
    }
}

fn invalid_state_message(step: &str) -> String {
    t_with_args("session.invalid_state", &[("step", step)])
}

// ==========================================
// 从 ImportError 转换
// 目的: 对外只暴露错误类别，不暴露解析诊断
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::UnsupportedFormat(_) => ApiError::UnsupportedExtension,
            ImportError::FileReadError(_) => ApiError::FileReadFailure,
            ImportError::MissingHeaderRow | ImportError::ExcelParseError(_) => {
                ApiError::ParseFailure
            }
            ImportError::UnknownHeader(header) => ApiError::UnknownHeader(header),
            ImportError::InvalidMapping => ApiError::InvalidMapping,
            ImportError::SerializeError(msg) => ApiError::InternalError(msg),
        }
    }
}

/// API Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_errors_collapse_to_parse_failure() {
        let err: ApiError = ImportError::ExcelParseError("zip: bad header at 0x12".into()).into();
        assert!(matches!(err, ApiError::ParseFailure));
        assert!(!err.to_string().contains("0x12"));

        let err: ApiError = ImportError::MissingHeaderRow.into();
        assert!(matches!(err, ApiError::ParseFailure));
    }

    #[test]
    fn test_import_error_mapping() {
        assert!(matches!(
            ApiError::from(ImportError::UnsupportedFormat("a.pdf".into())),
            ApiError::UnsupportedExtension
        ));
        assert!(matches!(
            ApiError::from(ImportError::FileReadError("denied".into())),
            ApiError::FileReadFailure
        ));
        assert!(matches!(
            ApiError::from(ImportError::UnknownHeader("dni".into())),
            ApiError::UnknownHeader(h) if h == "dni"
        ));
        assert!(matches!(
            ApiError::from(ImportError::SerializeError("io".into())),
            ApiError::InternalError(m) if m == "io"
        ));
    }

    #[test]
    fn test_messages_are_not_empty() {
        assert!(!ApiError::UnsupportedExtension.to_string().is_empty());
        assert!(ApiError::UnknownHeader("DNI".into()).to_string().contains("DNI"));
        assert!(ApiError::SubmissionFailure("timeout".into())
            .to_string()
            .contains("timeout"));
    }
}
