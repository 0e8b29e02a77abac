//! 流水线输出

use super::document::DocumentMetadata;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

/// 一次运行的结果：纯文本摘要 + 渲染后的 PDF
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub summary: String,
    pub pdf: Vec<u8>,
    pub metadata: DocumentMetadata,
    /// 渲染结果的页数
    pub page_count: usize,
    /// 发送给摘要服务的文本块数量
    pub chunk_count: usize,
}

impl PipelineOutput {
    /// 转换为传输格式（PDF 以 base64 编码）
    pub fn to_response(&self) -> SummaryResponse {
        SummaryResponse {
            summary: self.summary.clone(),
            pdf: STANDARD.encode(&self.pdf),
            metadata: self.metadata.clone(),
            page_count: self.page_count,
        }
    }
}

/// 传输格式
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
    /// base64 编码的 PDF
    pub pdf: String,
    pub metadata: DocumentMetadata,
    pub page_count: usize,
}
