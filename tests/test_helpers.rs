// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时文件、测试工作簿、可控的文档接收端
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use roster_import::api::{
    AuthContext, DocumentPayload, DocumentSink, IngestSession, SubmissionError, SubmissionResult,
};
use roster_import::config::IngestConfig;
use roster_import::importer::FormatRouter;
use std::error::Error;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::sync::oneshot;

/// 在临时目录中写入文件
///
/// # 返回
/// - TempDir: 临时目录（需要保持存活）
/// - PathBuf: 文件路径
pub fn write_temp_file(name: &str, content: &[u8]) -> Result<(TempDir, PathBuf), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(name);
    std::fs::write(&path, content)?;
    Ok((dir, path))
}

/// 生成 xlsx 工作簿（第一行为表头）
///
/// 可解析为数字的单元格以数字写入。
pub fn build_workbook(rows: &[&[&str]]) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();

    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            let (r, c) = (r as u32, c as u16);
            match value.parse::<f64>() {
                Ok(number) => {
                    sheet.write_number(r, c, number)?;
                }
                Err(_) => {
                    sheet.write_string(r, c, *value)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// 记录所有上传并返回固定结果的接收端
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub uploads: Arc<Mutex<Vec<(String, DocumentPayload)>>>,
}

#[async_trait]
impl DocumentSink for RecordingSink {
    async fn upload_document(
        &self,
        auth: &AuthContext,
        document: DocumentPayload,
    ) -> Result<SubmissionResult, SubmissionError> {
        self.uploads
            .lock()
            .unwrap()
            .push((auth.token().to_string(), document));
        Ok(SubmissionResult {
            kind: "success".to_string(),
            message: "Archivo cargado".to_string(),
        })
    }
}

/// 总是返回远程错误的接收端
pub struct FailingSink;

#[async_trait]
impl DocumentSink for FailingSink {
    async fn upload_document(
        &self,
        _auth: &AuthContext,
        _document: DocumentPayload,
    ) -> Result<SubmissionResult, SubmissionError> {
        Err(SubmissionError::Remote("token expirado".to_string()))
    }
}

/// 等待放行信号后才返回的接收端
pub struct GatedSink {
    gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl GatedSink {
    pub fn new() -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                gate: Mutex::new(Some(rx)),
            },
            tx,
        )
    }
}

#[async_trait]
impl DocumentSink for GatedSink {
    async fn upload_document(
        &self,
        _auth: &AuthContext,
        _document: DocumentPayload,
    ) -> Result<SubmissionResult, SubmissionError> {
        let gate = self.gate.lock().unwrap().take();
        if let Some(rx) = gate {
            let _ = rx.await;
        }
        Ok(SubmissionResult {
            kind: "success".to_string(),
            message: "tarde".to_string(),
        })
    }
}

/// 使用默认配置创建会话
pub fn create_session(sink: Box<dyn DocumentSink>) -> IngestSession {
    IngestSession::new(IngestConfig::default(), FormatRouter::default(), sink)
}
