//! 基础设施层
//!
//! 持有外部资源（PDF 库、LLM 客户端），只暴露能力，不处理业务流程

pub mod llm_stream;
pub mod pdf_reader;
pub mod pdf_writer;

pub use llm_stream::{OpenAiSummaryService, SummaryService};
pub use pdf_reader::{DocumentExtractor, PdfDocumentReader};
