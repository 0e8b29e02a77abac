//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责单次运行的流程调度、文件读写以及批量处理，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `summary_pipeline` - 摘要流水线
//! - 驱动 提取 → 分块 → 提示词 → 流式摘要 → 渲染
//! - 维护运行状态机，响应取消信号
//!
//! ### `document_processor` - 单个文档处理器
//! - 读取文件、做上传校验
//! - 写出 `<stem>.summary.pdf` 和 `<stem>.summary.json`
//!
//! ### `batch_processor` - 批量文档处理器
//! - 管理应用生命周期（初始化、运行）
//! - 控制并发数量（Semaphore）
//! - 输出全局统计信息
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<PathBuf>)
//!     ↓
//! document_processor (处理单个文件)
//!     ↓
//! summary_pipeline (处理单个 SourceDocument)
//!     ↓
//! services (能力层：chunker / request builder / accumulator / layout / metadata)
//!     ↓
//! infrastructure (基础设施：PDF 读写、流式 LLM 客户端)
//! ```

pub mod batch_processor;
pub mod document_processor;
pub mod summary_pipeline;

// 重新导出主要类型
pub use batch_processor::{collect_inputs, App, ProcessingStats};
pub use document_processor::{output_paths, DocumentProcessor, ProcessedDocument};
pub use summary_pipeline::{SummaryPipeline, SummaryRequest};
