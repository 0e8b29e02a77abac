//! 批量文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量文档的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：校验预设、创建 PDF 读取器和摘要服务
//! 2. **批量加载**：输入路径是单个文件时只处理该文件，是目录时处理其中所有 `.pdf`
//! 3. **并发控制**：使用 Semaphore 限制同时运行的流水线数量
//! 4. **取消**：Ctrl-C 取消所有进行中的运行
//! 5. **全局统计**：汇总所有文档的处理结果
//!
//! 每个运行拥有自己的缓冲区，运行之间只共享只读配置。

use crate::config::Config;
use crate::error::PipelineError;
use crate::infrastructure::{
    DocumentExtractor, OpenAiSummaryService, PdfDocumentReader, SummaryService,
};
use crate::models::SummaryLengthPreset;
use crate::orchestrator::document_processor::DocumentProcessor;
use crate::orchestrator::summary_pipeline::SummaryPipeline;
use crate::utils::logging;
use crate::workflow::{CancelToken, RunCtx};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App<E = PdfDocumentReader, S = OpenAiSummaryService> {
    config: Arc<Config>,
    processor: Arc<DocumentProcessor<E, S>>,
    cancel: CancelToken,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        // 预设错误在启动时就暴露，而不是每个文档各失败一次
        SummaryLengthPreset::parse(&config.summary_preset)?;

        logging::log_startup(
            config.max_concurrent_documents,
            &config.summary_preset,
            &config.llm_model_name,
        );

        let config = Arc::new(config);
        let service = OpenAiSummaryService::new(&config);
        let pipeline = SummaryPipeline::new(
            Arc::clone(&config),
            Arc::new(PdfDocumentReader::new()),
            service,
        );
        let processor = DocumentProcessor::new(Arc::clone(&config), pipeline);

        Ok(Self::with_processor(config, processor))
    }
}

impl<E, S> App<E, S>
where
    E: DocumentExtractor,
    S: SummaryService + 'static,
{
    /// 使用自定义的处理器创建应用
    pub fn with_processor(config: Arc<Config>, processor: DocumentProcessor<E, S>) -> Self {
        Self {
            config,
            processor: Arc::new(processor),
            cancel: CancelToken::new(),
        }
    }

    /// 应用级取消令牌，取消后所有进行中的运行以 `Cancelled` 结束
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        let inputs = collect_inputs(Path::new(&self.config.input_path)).await?;

        if inputs.is_empty() {
            warn!("⚠️ 没有找到待处理的 PDF 文件，程序结束");
            return Ok(ProcessingStats::default());
        }

        logging::log_documents_loaded(inputs.len(), self.config.max_concurrent_documents);

        let ctrl_c = self.spawn_ctrl_c_listener();
        let stats = self.process_all(inputs).await;
        ctrl_c.abort();
        let stats = stats?;

        logging::print_final_stats(
            stats.success,
            stats.failed,
            stats.cancelled,
            stats.total,
            &self.config.output_log_file,
        );

        Ok(stats)
    }

    fn spawn_ctrl_c_listener(&self) -> tokio::task::JoinHandle<()> {
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("⛔ 收到 Ctrl-C，正在取消所有运行...");
                cancel.cancel();
            }
        })
    }

    /// 处理所有文档
    async fn process_all(&self, inputs: Vec<PathBuf>) -> Result<ProcessingStats> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_documents.max(1)));
        let total = inputs.len();
        let mut handles = Vec::with_capacity(total);

        for (idx, path) in inputs.into_iter().enumerate() {
            let permit = semaphore.clone().acquire_owned().await?;

            let document_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let ctx = RunCtx::new(idx + 1, document_name);
            let processor = Arc::clone(&self.processor);
            let preset = self.config.summary_preset.clone();
            let cancel = self.cancel.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                match processor.process(&path, &ctx, &preset, &cancel).await {
                    Ok(_) => RunOutcome::Success,
                    Err(e) if is_cancelled(&e) => {
                        warn!("{} ⛔ 已取消", ctx);
                        RunOutcome::Cancelled
                    }
                    Err(e) => {
                        error!("{} ❌ 处理过程中发生错误: {:#}", ctx, e);
                        RunOutcome::Failed
                    }
                }
            });
            handles.push((idx + 1, handle));
        }

        let mut stats = ProcessingStats {
            total,
            ..Default::default()
        };

        for (finished, (document_index, handle)) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(RunOutcome::Success) => stats.success += 1,
                Ok(RunOutcome::Failed) => stats.failed += 1,
                Ok(RunOutcome::Cancelled) => stats.cancelled += 1,
                Err(e) => {
                    error!("[文档 {}] 任务执行失败: {}", document_index, e);
                    stats.failed += 1;
                }
            }
            logging::log_progress(finished + 1, total);
        }

        Ok(stats)
    }
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub total: usize,
}

/// 单个运行的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunOutcome {
    Success,
    Failed,
    Cancelled,
}

fn is_cancelled(e: &anyhow::Error) -> bool {
    matches!(
        e.downcast_ref::<PipelineError>(),
        Some(PipelineError::Cancelled)
    )
}

/// 收集输入文件：单个文件直接返回；目录返回其中所有 `.pdf` 文件（按文件名排序，不递归）
pub async fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    let metadata = tokio::fs::metadata(input)
        .await
        .with_context(|| format!("输入路径不存在: {}", input.display()))?;

    if metadata.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    info!("\n📁 正在扫描待处理的文档: {}", input.display());

    let mut entries = tokio::fs::read_dir(input)
        .await
        .with_context(|| format!("读取目录失败: {}", input.display()))?;
    let mut inputs = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && has_pdf_extension(&path) {
            inputs.push(path);
        }
    }

    inputs.sort();
    Ok(inputs)
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_pdf_extension() {
        assert!(has_pdf_extension(Path::new("book.pdf")));
        assert!(has_pdf_extension(Path::new("BOOK.PDF")));
        assert!(!has_pdf_extension(Path::new("book.epub")));
        assert!(!has_pdf_extension(Path::new("pdf")));
    }

    #[tokio::test]
    async fn test_collect_inputs_missing_path() {
        assert!(collect_inputs(Path::new("does/not/exist")).await.is_err());
    }
}
