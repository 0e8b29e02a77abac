//! 源文档与文档元数据

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 缺省标题
pub const DEFAULT_TITLE: &str = "Untitled document";
/// 缺省作者
pub const DEFAULT_AUTHOR: &str = "Unknown author";

const PDF_MAGIC: &[u8] = b"%PDF-";

/// 源文档
///
/// 不可变的字节缓冲区，只在一次流水线运行期间存在。
/// 内部使用 `Arc<[u8]>`，元数据提取与文本提取可以并发读取同一份数据。
#[derive(Debug, Clone)]
pub struct SourceDocument {
    name: String,
    bytes: Arc<[u8]>,
}

impl SourceDocument {
    /// 创建源文档并做上传校验：非空、大小不超过上限、以 `%PDF-` 开头
    pub fn new(name: impl Into<String>, bytes: Vec<u8>, max_bytes: usize) -> Result<Self> {
        if bytes.is_empty() {
            return Err(PipelineError::unreadable("文件为空"));
        }
        if bytes.len() > max_bytes {
            return Err(PipelineError::DocumentTooLarge {
                size: bytes.len(),
                limit: max_bytes,
            });
        }
        if !bytes.starts_with(PDF_MAGIC) {
            return Err(PipelineError::unreadable("不是 PDF 文件（缺少 %PDF- 文件头）"));
        }

        Ok(Self {
            name: name.into(),
            bytes: Arc::from(bytes),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 共享的字节缓冲区（用于 spawn_blocking 任务）
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn size_in_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// 提取器返回的原始元数据（字段可能缺失）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMetadata {
    pub page_count: usize,
    pub title: Option<String>,
    pub author: Option<String>,
}

/// 文档元数据，标题和作者保证非空
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub page_count: usize,
    pub title: String,
    pub author: String,
}

impl DocumentMetadata {
    /// 由原始元数据生成，空白或缺失的字段替换为缺省值
    pub fn from_raw(raw: RawMetadata) -> Self {
        Self {
            page_count: raw.page_count,
            title: non_blank_or(raw.title, DEFAULT_TITLE),
            author: non_blank_or(raw.author, DEFAULT_AUTHOR),
        }
    }
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self::from_raw(RawMetadata::default())
    }
}

fn non_blank_or(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
