//! # Book Summarizer
//!
//! 把 PDF 文档交给大语言模型生成结构化摘要，并重新排版为分页的 PDF
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部资源（PDF 库、HTTP 客户端），只暴露能力
//! - `PdfDocumentReader` - 页数、标题、作者与纯文本提取
//! - `OpenAiSummaryService` - 流式摘要
//! - `pdf_writer` - 分页文档编码为 PDF
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 流水线的纯组件，不做 I/O
//! - `TextChunker` - 按空白切分，每块最多 1000 个词
//! - `SummaryRequestBuilder` - 按长度预设构建提示词
//! - `StreamAccumulator` - 把片段流拼成摘要
//! - `PageLayoutEngine` - 分页排版
//! - `DocumentMetadataExtractor` - 元数据与缺省值
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 运行状态机、取消令牌、运行上下文
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/summary_pipeline` - 单次运行
//! - `orchestrator/document_processor` - 单个文件的读取与写出
//! - `orchestrator/batch_processor` - 批量处理，管理并发
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{ConfigError, FailureKind, PipelineError, Result};
pub use infrastructure::{
    DocumentExtractor, OpenAiSummaryService, PdfDocumentReader, SummaryService,
};
pub use models::{PipelineOutput, SourceDocument, SummaryLengthPreset, SummaryResponse};
pub use orchestrator::{
    App, DocumentProcessor, ProcessingStats, SummaryPipeline, SummaryRequest,
};
pub use workflow::{CancelToken, PipelineState};
