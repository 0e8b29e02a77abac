//! 摘要流水线 - 编排层
//!
//! ## 职责
//!
//! 驱动一次完整的运行：提取 → 分块 → 构建提示词 → 流式摘要 → 分页渲染。
//!
//! ## 流程
//!
//! ```text
//! Idle ─(校验预设)→ Extracting ─┬─ 元数据提取（spawn_blocking）──────────┐
//!                               └─ 文本提取（spawn_blocking）→ Chunking ─┴→ Prompting
//!      → Streaming → Rendering → Done
//! ```
//!
//! - 任意错误都会进入 `Failed(kind)`，不重试、不回退
//! - 阶段之间以及流式接收期间响应取消信号
//! - 提示词中只包含文档文本，元数据只用于页眉

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::infrastructure::{pdf_writer, DocumentExtractor, SummaryService};
use crate::models::{
    DocumentMetadata, PipelineOutput, SourceDocument, SummaryLengthPreset, TextChunk,
};
use crate::services::{
    DocumentMetadataExtractor, PageLayoutEngine, StreamAccumulator, SummaryRequestBuilder,
    TextChunker,
};
use crate::utils::logging::truncate_text;
use crate::workflow::{CancelToken, PipelineState, RunCtx, RunStateMachine};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

/// 一次运行的输入
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub ctx: RunCtx,
    pub document: SourceDocument,
    /// 摘要长度预设的键（flash / detailed / extra）
    pub preset: String,
}

impl SummaryRequest {
    pub fn new(document: SourceDocument, preset: impl Into<String>) -> Self {
        Self {
            ctx: RunCtx::new(1, document.name()),
            document,
            preset: preset.into(),
        }
    }

    pub fn with_ctx(mut self, ctx: RunCtx) -> Self {
        self.ctx = ctx;
        self
    }
}

/// 摘要流水线
///
/// 职责：
/// - 持有只读配置和两个上游协作者（文档提取器、摘要服务）
/// - 组合业务能力层的各个组件
/// - 维护单次运行的状态机
///
/// 流水线本身不保存运行数据，同一个实例可以被多个运行并发使用。
pub struct SummaryPipeline<E, S> {
    config: Arc<Config>,
    extractor: Arc<E>,
    service: S,
    chunker: TextChunker,
    request_builder: SummaryRequestBuilder,
    accumulator: StreamAccumulator,
    metadata_extractor: DocumentMetadataExtractor,
    layout_engine: PageLayoutEngine,
}

impl<E, S> SummaryPipeline<E, S>
where
    E: DocumentExtractor,
    S: SummaryService,
{
    /// 创建新的流水线
    ///
    /// # 参数
    /// - `config`: 只读配置
    /// - `extractor`: 文档提取器（在阻塞线程池中调用）
    /// - `service`: 流式摘要服务
    pub fn new(config: Arc<Config>, extractor: Arc<E>, service: S) -> Self {
        Self {
            config,
            extractor,
            service,
            chunker: TextChunker::default(),
            request_builder: SummaryRequestBuilder::new(),
            accumulator: StreamAccumulator::new(),
            metadata_extractor: DocumentMetadataExtractor::new(),
            layout_engine: PageLayoutEngine::default(),
        }
    }

    /// 执行一次运行
    pub async fn run(&self, request: SummaryRequest, cancel: &CancelToken) -> Result<PipelineOutput> {
        let (progress, _rx) = watch::channel(PipelineState::Idle);
        self.run_observed(request, cancel, progress).await
    }

    /// 执行一次运行，并把每次状态转移发布到 `progress`
    ///
    /// # 返回
    /// 成功时返回摘要文本和渲染后的 PDF；失败时状态机停在 `Failed(kind)`
    pub async fn run_observed(
        &self,
        request: SummaryRequest,
        cancel: &CancelToken,
        progress: watch::Sender<PipelineState>,
    ) -> Result<PipelineOutput> {
        let mut machine = RunStateMachine::new(progress);
        let ctx = request.ctx.clone();

        match self.execute(request, cancel, &mut machine).await {
            Ok(output) => {
                machine.advance(PipelineState::Done);
                info!(
                    "{} ✅ 摘要完成: {} 个文本块, {} 页",
                    ctx, output.chunk_count, output.page_count
                );
                Ok(output)
            }
            Err(e) => {
                let stage = machine.current();
                machine.fail(e.kind());
                warn!("{} ❌ 在 {} 阶段失败: {}", ctx, stage, e);
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        request: SummaryRequest,
        cancel: &CancelToken,
        machine: &mut RunStateMachine,
    ) -> Result<PipelineOutput> {
        let SummaryRequest {
            ctx,
            document,
            preset,
        } = request;

        // 预设在任何提取或网络调用之前校验
        let preset = SummaryLengthPreset::parse(&preset)?;
        ensure_not_cancelled(cancel)?;

        // ========== 提取 ==========
        machine.advance(PipelineState::Extracting);
        info!(
            "{} 📄 开始提取文档 '{}' ({} 字节)",
            ctx,
            document.name(),
            document.size_in_bytes()
        );
        let (metadata_task, text_task) = self.spawn_extraction(&document);

        let text = await_blocking(text_task, cancel).await?;

        // ========== 分块（元数据可能仍在提取中） ==========
        machine.advance(PipelineState::Chunking);
        let chunks = self.chunker.chunk(&text);
        drop(text);
        if chunks.is_empty() {
            return Err(PipelineError::EmptyDocument);
        }
        debug!("{} 文本分为 {} 块", ctx, chunks.len());

        let metadata = await_blocking(metadata_task, cancel).await?;
        ensure_not_cancelled(cancel)?;

        // ========== 构建提示词 ==========
        machine.advance(PipelineState::Prompting);
        let prompt = self.request_builder.build_for(&chunks, preset)?;
        ensure_not_cancelled(cancel)?;

        // ========== 流式摘要 ==========
        machine.advance(PipelineState::Streaming);
        info!("{} 🤖 请求摘要 (预设: {})", ctx, preset);
        let stream = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PipelineError::Cancelled),
            submitted = self.service.submit(prompt) => submitted?,
        };
        let summary = self.accumulator.accumulate(stream, cancel).await?;

        if self.config.verbose_logging {
            debug!("{} 摘要预览: {}", ctx, truncate_text(&summary, 120));
        }
        ensure_not_cancelled(cancel)?;

        // ========== 渲染 ==========
        machine.advance(PipelineState::Rendering);
        let output = self.render(summary, metadata, &chunks)?;

        Ok(output)
    }

    /// 在阻塞线程池中并发启动元数据提取和文本提取，两者共享同一份字节缓冲区
    fn spawn_extraction(
        &self,
        document: &SourceDocument,
    ) -> (JoinHandle<Result<DocumentMetadata>>, JoinHandle<Result<String>>) {
        let metadata_task = {
            let extractor = Arc::clone(&self.extractor);
            let metadata_extractor = self.metadata_extractor.clone();
            let bytes = document.shared_bytes();
            tokio::task::spawn_blocking(move || {
                metadata_extractor.extract(extractor.as_ref(), &bytes)
            })
        };

        let text_task = {
            let extractor = Arc::clone(&self.extractor);
            let bytes = document.shared_bytes();
            tokio::task::spawn_blocking(move || extractor.plain_text(&bytes))
        };

        (metadata_task, text_task)
    }

    fn render(
        &self,
        summary: String,
        metadata: DocumentMetadata,
        chunks: &[TextChunk],
    ) -> Result<PipelineOutput> {
        let document = self.layout_engine.render(&summary, &metadata);
        let pdf = pdf_writer::encode(&document, &metadata)?;

        Ok(PipelineOutput {
            summary,
            pdf,
            page_count: document.page_count(),
            chunk_count: chunks.len(),
            metadata,
        })
    }
}

fn ensure_not_cancelled(cancel: &CancelToken) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(PipelineError::Cancelled);
    }
    Ok(())
}

/// 等待阻塞任务完成；取消信号优先
///
/// 被放弃的阻塞任务会在后台自行结束，其结果直接丢弃
async fn await_blocking<T>(task: JoinHandle<Result<T>>, cancel: &CancelToken) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(PipelineError::Cancelled),
        joined = task => joined.unwrap_or_else(|e| Err(join_failed(e))),
    }
}

fn join_failed(e: JoinError) -> PipelineError {
    PipelineError::unreadable(format!("提取任务异常终止: {}", e))
}
