// ==========================================
// 名册导入引擎 - 导入会话
// ==========================================
// 职责: 上传 → 映射 → 预览 的生命周期编排
// 并发: 解析/映射/投影/导出均为同步；仅文件读取与远程提交为异步
// 过期结果: 每个异步操作持有代次票据，reset() 递增代次
//   - 过期的加载结果丢弃（StaleResult），不修改会话状态
//   - 过期的提交结果照常返回（远程已接收），但不修改会话状态
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::submission::{AuthContext, DocumentPayload, DocumentSink, SubmissionResult};
use crate::config::IngestConfig;
use crate::domain::{CanonicalField, CanonicalRecord, FieldMapping, RawGrid};
use crate::importer::{
    AutoMapper, DelimitedTextSerializer, FormatRouter, MappingEditor, MappingTarget,
    RecordProjector, SourceFormat,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// 导出文件内容类型
pub const CSV_CONTENT_TYPE: &str = "text/csv;charset=utf-8";

/// 提交文件内容类型
pub const SUBMISSION_CONTENT_TYPE: &str = "text/csv";

// ==========================================
// 会话步骤
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStep {
    Upload,
    Map,
    Preview,
}

impl fmt::Display for SessionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStep::Upload => write!(f, "upload"),
            SessionStep::Map => write!(f, "map"),
            SessionStep::Preview => write!(f, "preview"),
        }
    }
}

/// 异步操作的代次票据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationTicket {
    generation: u64,
}

/// 上传摘要
#[derive(Debug, Clone, Serialize)]
pub struct UploadSummary {
    pub upload_id: Uuid,
    pub file_name: String,
    pub format: SourceFormat,
    pub headers: Vec<String>,
    pub row_count: usize,
    pub mapping: FieldMapping,
    pub loaded_at: DateTime<Utc>,
}

/// 下载导出文件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportDocument {
    pub file_name: String,
    pub content_type: String,
    pub content: String,
}

// ==========================================
// 会话内部状态
// ==========================================
enum Phase {
    Mapping(MappingEditor),
    Preview {
        mapping: FieldMapping,
        records: Vec<CanonicalRecord>,
    },
}

struct LoadedUpload {
    upload_id: Uuid,
    file_name: String,
    grid: RawGrid,
    phase: Phase,
}

#[derive(Default)]
struct SessionState {
    upload: Option<LoadedUpload>,
}

impl SessionState {
    fn step(&self) -> SessionStep {
        match &self.upload {
            None => SessionStep::Upload,
            Some(LoadedUpload {
                phase: Phase::Mapping(_),
                ..
            }) => SessionStep::Map,
            Some(LoadedUpload {
                phase: Phase::Preview { .. },
                ..
            }) => SessionStep::Preview,
        }
    }
}

/// 忙碌标记守卫：构造时计数 +1，析构时 -1（成功/失败路径均释放）
struct BusyGuard<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> BusyGuard<'a> {
    fn acquire(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

// ==========================================
// IngestSession - 导入会话
// ==========================================
pub struct IngestSession {
    config: IngestConfig,
    router: FormatRouter,
    sink: Box<dyn DocumentSink>,
    generation: AtomicU64,
    busy: AtomicUsize,
    state: Mutex<SessionState>,
}

impl IngestSession {
    /// 创建会话
    ///
    /// # 参数
    /// - config: 引擎配置
    /// - router: 格式路由（含工作簿适配器）
    /// - sink: 远程文档接收端
    pub fn new(config: IngestConfig, router: FormatRouter, sink: Box<dyn DocumentSink>) -> Self {
        Self {
            config,
            router,
            sink,
            generation: AtomicU64::new(0),
            busy: AtomicUsize::new(0),
            state: Mutex::new(SessionState::default()),
        }
    }

    fn lock_state(&self) -> ApiResult<MutexGuard<'_, SessionState>> {
        self.state
            .lock()
            .map_err(|e| ApiError::InternalError(format!("锁获取失败: {}", e)))
    }

    // ==========================================
    // 代次与忙碌标记
    // ==========================================

    /// 领取当前代次票据
    pub fn begin_operation(&self) -> OperationTicket {
        OperationTicket {
            generation: self.generation.load(Ordering::SeqCst),
        }
    }

    /// 票据是否仍属于当前代次
    pub fn is_current(&self, ticket: OperationTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// 是否有异步操作进行中
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst) > 0
    }

    pub fn step(&self) -> ApiResult<SessionStep> {
        Ok(self.lock_state()?.step())
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    // ==========================================
    // 上传
    // ==========================================

    /// 从磁盘读取并加载文件
    ///
    /// 扩展名在读取之前检查。
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn load_file<P: AsRef<Path>>(&self, path: P) -> ApiResult<UploadSummary> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        if let Err(e) = SourceFormat::from_file_name(&file_name) {
            warn!(error = %e, "扩展名不受支持，拒绝读取");
            return Err(ApiError::UnsupportedExtension);
        }
        self.ensure_step(SessionStep::Upload)?;

        let ticket = self.begin_operation();
        let _busy = BusyGuard::acquire(&self.busy);

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            error!(error = %e, "文件读取失败");
            ApiError::FileReadFailure
        })?;

        self.complete_load(ticket, &file_name, &bytes)
    }

    /// 加载已在内存中的文件内容
    pub fn load_bytes(&self, file_name: &str, content: &[u8]) -> ApiResult<UploadSummary> {
        self.ensure_step(SessionStep::Upload)?;
        let ticket = self.begin_operation();
        self.complete_load(ticket, file_name, content)
    }

    /// 完成加载：解析 → 自动映射 → 安装到会话
    ///
    /// # 返回
    /// - Err(StaleResult): 票据已过期（期间发生过 reset），结果丢弃
    pub fn complete_load(
        &self,
        ticket: OperationTicket,
        file_name: &str,
        content: &[u8],
    ) -> ApiResult<UploadSummary> {
        let upload_id = Uuid::new_v4();
        let format = SourceFormat::from_file_name(file_name).map_err(|e| {
            warn!(upload_id = %upload_id, error = %e, "扩展名不受支持");
            ApiError::UnsupportedExtension
        })?;

        let grid = self.router.parse(file_name, content).map_err(|e| {
            // 诊断只进日志
            error!(upload_id = %upload_id, file_name = %file_name, error = %e, "文件解析失败");
            ApiError::from(e)
        })?;

        let mapping = AutoMapper.propose(&grid.headers);
        info!(
            upload_id = %upload_id,
            mapped = mapping.active_fields().len(),
            "自动映射完成"
        );

        let summary = UploadSummary {
            upload_id,
            file_name: file_name.to_string(),
            format,
            headers: grid.headers.clone(),
            row_count: grid.row_count(),
            mapping: mapping.clone(),
            loaded_at: Utc::now(),
        };

        let mut state = self.lock_state()?;
        if !self.is_current(ticket) {
            warn!(upload_id = %upload_id, "会话已重置，丢弃过期的加载结果");
            return Err(ApiError::StaleResult);
        }
        if state.step() != SessionStep::Upload {
            return Err(ApiError::InvalidState(state.step().to_string()));
        }

        let editor = MappingEditor::new(grid.headers.clone(), mapping);
        state.upload = Some(LoadedUpload {
            upload_id,
            file_name: file_name.to_string(),
            grid,
            phase: Phase::Mapping(editor),
        });

        Ok(summary)
    }

    // ==========================================
    // 映射
    // ==========================================

    /// 当前表格的表头
    pub fn headers(&self) -> ApiResult<Vec<String>> {
        let state = self.lock_state()?;
        let upload = Self::loaded(&state)?;
        Ok(upload.grid.headers.clone())
    }

    /// 当前映射（映射阶段为可编辑映射，预览阶段为冻结映射）
    pub fn mapping(&self) -> ApiResult<FieldMapping> {
        let state = self.lock_state()?;
        let upload = Self::loaded(&state)?;
        Ok(match &upload.phase {
            Phase::Mapping(editor) => editor.mapping().clone(),
            Phase::Preview { mapping, .. } => mapping.clone(),
        })
    }

    /// 覆写单个字段的映射
    pub fn set_field(&self, field: CanonicalField, target: MappingTarget) -> ApiResult<()> {
        let mut state = self.lock_state()?;
        let step = state.step();
        match state.upload.as_mut().map(|u| &mut u.phase) {
            Some(Phase::Mapping(editor)) => Ok(editor.set_field(field, target)?),
            _ => Err(ApiError::InvalidState(step.to_string())),
        }
    }

    /// 映射是否有效（至少一个字段已映射）
    pub fn is_valid(&self) -> ApiResult<bool> {
        let state = self.lock_state()?;
        Ok(match state.upload.as_ref().map(|u| &u.phase) {
            Some(Phase::Mapping(editor)) => editor.is_valid(),
            Some(Phase::Preview { .. }) => true,
            None => false,
        })
    }

    /// 冻结映射并投影记录，进入预览
    ///
    /// # 返回
    /// - Ok(usize): 投影的记录数
    /// - Err(InvalidMapping): 没有任何字段被映射
    pub fn proceed(&self) -> ApiResult<usize> {
        let mut state = self.lock_state()?;
        let step = state.step();
        let upload = state
            .upload
            .as_mut()
            .ok_or_else(|| ApiError::InvalidState(step.to_string()))?;

        let editor = match &upload.phase {
            Phase::Mapping(editor) => editor.clone(),
            Phase::Preview { .. } => return Err(ApiError::InvalidState(step.to_string())),
        };

        let mapping = editor.freeze()?;
        let records = RecordProjector.project(&upload.grid.rows, &mapping);
        let count = records.len();

        info!(upload_id = %upload.upload_id, records = count, "映射已冻结，进入预览");
        upload.phase = Phase::Preview { mapping, records };

        Ok(count)
    }

    // ==========================================
    // 预览与导出
    // ==========================================

    /// 规范记录（预览阶段）
    pub fn records(&self) -> ApiResult<Vec<CanonicalRecord>> {
        let state = self.lock_state()?;
        let (_, records) = Self::preview(&state)?;
        Ok(records.to_vec())
    }

    /// 生成下载导出文件
    pub fn export_csv(&self) -> ApiResult<ExportDocument> {
        let content = self.render_records()?;
        Ok(ExportDocument {
            file_name: self.config.export_file_name.clone(),
            content_type: CSV_CONTENT_TYPE.to_string(),
            content,
        })
    }

    fn render_records(&self) -> ApiResult<String> {
        let state = self.lock_state()?;
        let (mapping, records) = Self::preview(&state)?;
        let serializer = DelimitedTextSerializer::new(self.config.export_quoting);
        Ok(serializer.serialize(records, mapping)?)
    }

    // ==========================================
    // 远程提交
    // ==========================================

    /// 把导出文本提交到远程接收端
    #[instrument(skip(self, auth))]
    pub async fn submit(&self, auth: &AuthContext) -> ApiResult<SubmissionResult> {
        if auth.is_blank() {
            return Err(ApiError::MissingCredential);
        }

        let document = DocumentPayload {
            file_name: self.config.submission_file_name.clone(),
            content_type: SUBMISSION_CONTENT_TYPE.to_string(),
            content: self.render_records()?,
        };

        let ticket = self.begin_operation();
        let _busy = BusyGuard::acquire(&self.busy);

        let result = self
            .sink
            .upload_document(auth, document)
            .await
            .map_err(|e| {
                error!(error = %e, "远程提交失败");
                ApiError::SubmissionFailure(e.to_string())
            })?;

        if !self.is_current(ticket) {
            warn!("提交完成时会话已重置，结果不影响当前会话");
        }

        Ok(result)
    }

    // ==========================================
    // 重置
    // ==========================================

    /// 丢弃当前表格、映射与记录；进行中的异步结果随之过期
    pub fn reset(&self) -> ApiResult<()> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock_state()?;
        if let Some(upload) = state.upload.take() {
            info!(upload_id = %upload.upload_id, file_name = %upload.file_name, "会话已重置");
        }
        Ok(())
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    fn ensure_step(&self, expected: SessionStep) -> ApiResult<()> {
        let step = self.lock_state()?.step();
        if step != expected {
            return Err(ApiError::InvalidState(step.to_string()));
        }
        Ok(())
    }

    fn loaded<'a>(state: &'a SessionState) -> ApiResult<&'a LoadedUpload> {
        state
            .upload
            .as_ref()
            .ok_or_else(|| ApiError::InvalidState(SessionStep::Upload.to_string()))
    }

    fn preview<'a>(
        state: &'a SessionState,
    ) -> ApiResult<(&'a FieldMapping, &'a [CanonicalRecord])> {
        match state.upload.as_ref().map(|u| &u.phase) {
            Some(Phase::Preview { mapping, records }) => Ok((mapping, records.as_slice())),
            _ => Err(ApiError::InvalidState(state.step().to_string())),
        }
    }
}
