//! PDF 读取 - 基础设施层
//!
//! 持有具体的 PDF 库（lopdf 负责结构与元数据，pdf-extract 负责文本），
//! 只向上层暴露 `DocumentExtractor` 能力，不泄露库自身的类型。

use crate::error::{PipelineError, Result};
use crate::models::RawMetadata;
use lopdf::{Dictionary, Document as LopdfDocument, Object};
use tracing::debug;

/// 文档提取能力
///
/// 两个方法都只读取同一份不可变字节，可以在不同线程上并发调用。
pub trait DocumentExtractor: Send + Sync + 'static {
    /// 读取页数和 Info 字典中的标题/作者
    fn raw_metadata(&self, bytes: &[u8]) -> Result<RawMetadata>;

    /// 提取全文纯文本
    fn plain_text(&self, bytes: &[u8]) -> Result<String>;
}

/// 基于 lopdf + pdf-extract 的 PDF 读取器
#[derive(Debug, Clone, Default)]
pub struct PdfDocumentReader;

impl PdfDocumentReader {
    pub fn new() -> Self {
        Self
    }

    fn load(bytes: &[u8]) -> Result<LopdfDocument> {
        LopdfDocument::load_mem(bytes).map_err(|e| match e {
            lopdf::Error::Decryption(_) => PipelineError::unreadable("文档已加密"),
            other => PipelineError::unreadable(other),
        })
    }
}

impl DocumentExtractor for PdfDocumentReader {
    fn raw_metadata(&self, bytes: &[u8]) -> Result<RawMetadata> {
        let doc = Self::load(bytes)?;
        let page_count = doc.get_pages().len();

        let info = info_dictionary(&doc);
        let title = info.and_then(|dict| text_field(&doc, dict, b"Title"));
        let author = info.and_then(|dict| text_field(&doc, dict, b"Author"));

        debug!(
            "PDF 元数据: {} 页, Title={:?}, Author={:?}",
            page_count, title, author
        );

        Ok(RawMetadata {
            page_count,
            title,
            author,
        })
    }

    fn plain_text(&self, bytes: &[u8]) -> Result<String> {
        let text = pdf_extract::extract_text_from_mem(bytes).map_err(PipelineError::unreadable)?;
        debug!("PDF 文本提取完成: {} 字符", text.len());
        Ok(text)
    }
}

/// trailer 中的 Info 字典（可能是直接对象，也可能是间接引用）
fn info_dictionary(doc: &LopdfDocument) -> Option<&Dictionary> {
    match doc.trailer.get(b"Info").ok()? {
        Object::Dictionary(dict) => Some(dict),
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        _ => None,
    }
}

fn text_field(doc: &LopdfDocument, dict: &Dictionary, key: &[u8]) -> Option<String> {
    let object = match dict.get(key).ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        direct => direct,
    };
    match object {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}

/// 解码 PDF 文本字符串：UTF-16BE（BOM）、UTF-8，最后按 Latin-1 处理
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(b"\xFE\xFF") {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
