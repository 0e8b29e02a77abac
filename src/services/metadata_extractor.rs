//! 文档元数据提取服务 - 业务能力层
//!
//! 只负责"从源文档得到可用于页眉的元数据"，缺失字段填充缺省值

use crate::error::Result;
use crate::infrastructure::DocumentExtractor;
use crate::models::DocumentMetadata;
use tracing::debug;

/// 文档元数据提取器
///
/// 职责：
/// - 通过 `DocumentExtractor` 读取页数、标题、作者
/// - 标题/作者缺失或为空白时使用缺省值（这不是错误）
/// - 字节流完全无法解析时返回 `UnreadableDocument`
#[derive(Debug, Clone, Default)]
pub struct DocumentMetadataExtractor;

impl DocumentMetadataExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract<E>(&self, extractor: &E, bytes: &[u8]) -> Result<DocumentMetadata>
    where
        E: DocumentExtractor + ?Sized,
    {
        let raw = extractor.raw_metadata(bytes)?;
        let metadata = DocumentMetadata::from_raw(raw);

        debug!(
            "元数据: {} 页, 标题 '{}', 作者 '{}'",
            metadata.page_count, metadata.title, metadata.author
        );

        Ok(metadata)
    }
}
