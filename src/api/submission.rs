// ==========================================
// 名册导入引擎 - 远程提交
// ==========================================
// 职责: 把导出文本作为文件上传到文档接收端
// 协议: GraphQL multipart 请求（operations / map / 文件部件）
// 凭证: 显式传入 AuthContext，不读取任何进程级存储
// ==========================================

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// 上传文档的 GraphQL 变更
const UPLOAD_MUTATION: &str = r#"
mutation($token: String!, $file: Upload!) {
  cargarArchivo(token: $token, file: $file) {
    type
    message
  }
}
"#;

// ==========================================
// 凭证
// ==========================================
#[derive(Clone)]
pub struct AuthContext {
    token: String,
}

impl AuthContext {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// 令牌是否为空白
    pub fn is_blank(&self) -> bool {
        self.token.trim().is_empty()
    }
}

// 不在日志中输出令牌
impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext").field("token", &"***").finish()
    }
}

// ==========================================
// 载荷与结果
// ==========================================

/// 待上传的文件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentPayload {
    pub file_name: String,
    pub content_type: String,
    pub content: String,
}

/// 远程返回的结构化结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

impl SubmissionResult {
    /// 远程端以 type = "error" 表示业务失败
    pub fn is_error(&self) -> bool {
        self.kind.eq_ignore_ascii_case("error")
    }
}

/// 提交错误
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("传输失败: {0}")]
    Transport(String),

    #[error("{0}")]
    Remote(String),

    #[error("响应格式错误: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for SubmissionError {
    fn from(err: reqwest::Error) -> Self {
        SubmissionError::Transport(err.to_string())
    }
}

// ==========================================
// DocumentSink Trait
// ==========================================
// 用途: 文档上传接口（外部协作方边界）
// 实现者: GraphqlUploadSink
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// 上传文档
    ///
    /// # 返回
    /// - Ok(SubmissionResult): 远程返回的 type/message
    /// - Err: 传输失败或远程返回 errors
    async fn upload_document(
        &self,
        auth: &AuthContext,
        document: DocumentPayload,
    ) -> Result<SubmissionResult, SubmissionError>;
}

// ==========================================
// GraphQL multipart 实现
// ==========================================
pub struct GraphqlUploadSink {
    client: reqwest::Client,
    endpoint: String,
}

impl GraphqlUploadSink {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SubmissionError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// operations 部件：文件变量置空，由 map 指向文件部件
pub fn build_operations(token: &str) -> Value {
    json!({
        "query": UPLOAD_MUTATION,
        "variables": {
            "token": token,
            "file": null,
        },
    })
}

/// map 部件：部件 "0" → variables.file
pub fn build_file_map() -> Value {
    json!({ "0": ["variables.file"] })
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<GraphqlData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlData {
    #[serde(rename = "cargarArchivo")]
    cargar_archivo: Option<SubmissionResult>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

/// 解析 GraphQL 响应体
///
/// 存在 errors 时以第一条错误信息作为失败原因。
pub fn parse_response(body: &str) -> Result<SubmissionResult, SubmissionError> {
    let response: GraphqlResponse = serde_json::from_str(body)
        .map_err(|e| SubmissionError::InvalidResponse(e.to_string()))?;

    if let Some(first) = response.errors.into_iter().next() {
        return Err(SubmissionError::Remote(first.message));
    }

    response
        .data
        .and_then(|data| data.cargar_archivo)
        .ok_or_else(|| SubmissionError::InvalidResponse("缺少 cargarArchivo 结果".to_string()))
}

#[async_trait]
impl DocumentSink for GraphqlUploadSink {
    #[instrument(skip(self, auth, document), fields(file_name = %document.file_name, bytes = document.content.len()))]
    async fn upload_document(
        &self,
        auth: &AuthContext,
        document: DocumentPayload,
    ) -> Result<SubmissionResult, SubmissionError> {
        let operations = build_operations(auth.token()).to_string();
        let file_map = build_file_map().to_string();

        let part = Part::text(document.content)
            .file_name(document.file_name)
            .mime_str(&document.content_type)?;

        let form = Form::new()
            .text("operations", operations)
            .text("map", file_map)
            .part("0", part);

        debug!(endpoint = %self.endpoint, "发送 GraphQL 上传请求");
        let response = self.client.post(&self.endpoint).multipart(form).send().await?;

        let status = response.status();
        let body = response.text().await?;

        match parse_response(&body) {
            Ok(result) => {
                info!(status = status.as_u16(), kind = %result.kind, "远程提交完成");
                Ok(result)
            }
            Err(e) => {
                warn!(status = status.as_u16(), error = %e, "远程提交失败");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operations_shape() {
        let ops = build_operations("tok-1");

        assert_eq!(ops["variables"]["token"], "tok-1");
        assert!(ops["variables"]["file"].is_null());
        assert!(ops["query"].as_str().unwrap().contains("cargarArchivo"));
        assert_eq!(build_file_map()["0"][0], "variables.file");
    }

    #[test]
    fn test_parse_success_response() {
        let body = r#"{"data":{"cargarArchivo":{"type":"success","message":"ok"}}}"#;
        let result = parse_response(body).unwrap();

        assert_eq!(result.kind, "success");
        assert_eq!(result.message, "ok");
        assert!(!result.is_error());
    }

    #[test]
    fn test_parse_errors_response() {
        let body = r#"{"errors":[{"message":"token inválido"},{"message":"otro"}],"data":null}"#;
        let err = parse_response(body).unwrap_err();

        assert!(matches!(err, SubmissionError::Remote(ref m) if m == "token inválido"));
    }

    #[test]
    fn test_parse_garbage_response() {
        assert!(matches!(
            parse_response("<html>502</html>"),
            Err(SubmissionError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_response(r#"{"data":{}}"#),
            Err(SubmissionError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_auth_debug_hides_token() {
        let auth = AuthContext::new("secret-token");
        assert!(!format!("{:?}", auth).contains("secret"));
        assert!(AuthContext::new("  ").is_blank());
    }
}
