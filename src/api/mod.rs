// ==========================================
// 名册导入引擎 - API 层
// ==========================================
// 职责: 导入会话编排、远程提交、面向用户的错误
// ==========================================

pub mod error;
pub mod ingest_session;
pub mod submission;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use ingest_session::{
    ExportDocument, IngestSession, OperationTicket, SessionStep, UploadSummary,
    CSV_CONTENT_TYPE, SUBMISSION_CONTENT_TYPE,
};
pub use submission::{
    AuthContext, DocumentPayload, DocumentSink, GraphqlUploadSink, SubmissionError,
    SubmissionResult,
};
