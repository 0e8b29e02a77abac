//! 单个文档处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **读取文件**：`tokio::fs` 读取 PDF，做上传校验
//! 2. **运行流水线**：委托 `SummaryPipeline`
//! 3. **写出结果**：`<stem>.summary.pdf` 和 `<stem>.summary.json`

use crate::config::Config;
use crate::infrastructure::{DocumentExtractor, SummaryService};
use crate::models::SourceDocument;
use crate::orchestrator::summary_pipeline::{SummaryPipeline, SummaryRequest};
use crate::workflow::{CancelToken, RunCtx};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// 单个文档的处理结果
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub pdf_path: PathBuf,
    pub json_path: PathBuf,
    pub page_count: usize,
}

/// 单个文档处理器
pub struct DocumentProcessor<E, S> {
    config: Arc<Config>,
    pipeline: SummaryPipeline<E, S>,
}

impl<E, S> DocumentProcessor<E, S>
where
    E: DocumentExtractor,
    S: SummaryService,
{
    pub fn new(config: Arc<Config>, pipeline: SummaryPipeline<E, S>) -> Self {
        Self { config, pipeline }
    }

    /// 处理单个文档
    ///
    /// # 参数
    /// - `path`: 输入 PDF 路径
    /// - `ctx`: 运行上下文（用于日志）
    /// - `preset`: 摘要长度预设
    /// - `cancel`: 取消令牌
    ///
    /// # 返回
    /// 返回写出的文件路径
    pub async fn process(
        &self,
        path: &Path,
        ctx: &RunCtx,
        preset: &str,
        cancel: &CancelToken,
    ) -> Result<ProcessedDocument> {
        info!("{} 开始处理: {}", ctx, path.display());

        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("读取文件失败: {}", path.display()))?;

        let document = SourceDocument::new(
            ctx.document_name.clone(),
            bytes,
            self.config.max_document_bytes,
        )
        .with_context(|| format!("文件校验失败: {}", path.display()))?;

        let request = SummaryRequest::new(document, preset).with_ctx(ctx.clone());
        let output = self
            .pipeline
            .run(request, cancel)
            .await
            .with_context(|| format!("生成摘要失败: {}", path.display()))?;

        let output_dir = Path::new(&self.config.output_dir);
        tokio::fs::create_dir_all(output_dir)
            .await
            .with_context(|| format!("创建输出目录失败: {}", output_dir.display()))?;

        let (pdf_path, json_path) = output_paths(output_dir, path);

        tokio::fs::write(&pdf_path, &output.pdf)
            .await
            .with_context(|| format!("写入 PDF 失败: {}", pdf_path.display()))?;

        let json =
            serde_json::to_vec_pretty(&output.to_response()).context("序列化摘要结果失败")?;
        tokio::fs::write(&json_path, json)
            .await
            .with_context(|| format!("写入 JSON 失败: {}", json_path.display()))?;

        info!(
            "{} 💾 已保存: {} ({} 页)",
            ctx,
            pdf_path.display(),
            output.page_count
        );

        Ok(ProcessedDocument {
            pdf_path,
            json_path,
            page_count: output.page_count,
        })
    }
}

/// 计算输出文件路径：`<output_dir>/<stem>.summary.pdf` 和 `<output_dir>/<stem>.summary.json`
pub fn output_paths(output_dir: &Path, input: &Path) -> (PathBuf, PathBuf) {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    (
        output_dir.join(format!("{}.summary.pdf", stem)),
        output_dir.join(format!("{}.summary.json", stem)),
    )
}
