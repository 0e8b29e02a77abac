//! 摘要请求构建服务 - 业务能力层
//!
//! 只负责"把分块和长度预设组装成提示词"，不关心由哪个服务商执行

use crate::error::{PipelineError, Result};
use crate::models::{SummaryLengthPreset, SummaryPrompt, TextChunk};
use tracing::debug;

/// 系统消息
pub const SYSTEM_MESSAGE: &str = "You are an expert in analyzing and synthesizing books.";

/// 分块之间的分隔符（空行）
pub const SECTION_SEPARATOR: &str = "\n\n";

/// 摘要请求构建器
///
/// 文档标题、作者等元数据不会进入提示词，它们只出现在渲染结果的页眉中。
#[derive(Debug, Clone, Default)]
pub struct SummaryRequestBuilder;

impl SummaryRequestBuilder {
    pub fn new() -> Self {
        Self
    }

    /// 构建提示词
    ///
    /// # 参数
    /// - `chunks`: 按原文顺序排列的分块，不能为空
    /// - `preset_key`: 长度预设键（flash / detailed / extra）
    ///
    /// # 错误
    /// - 预设键无法识别时返回 `InvalidPreset`（先于其它任何检查）
    /// - 分块为空时返回 `EmptyDocument`
    pub fn build(&self, chunks: &[TextChunk], preset_key: &str) -> Result<SummaryPrompt> {
        let preset = SummaryLengthPreset::parse(preset_key)?;
        self.build_for(chunks, preset)
    }

    /// 使用已校验的预设构建提示词
    pub fn build_for(
        &self,
        chunks: &[TextChunk],
        preset: SummaryLengthPreset,
    ) -> Result<SummaryPrompt> {
        if chunks.is_empty() {
            return Err(PipelineError::EmptyDocument);
        }

        let payload = chunks
            .iter()
            .map(|chunk| chunk.text.as_str())
            .collect::<Vec<_>>()
            .join(SECTION_SEPARATOR);

        let user = format!(
            "Analyze this text and create a structured summary of {}.\n\
             The summary must include:\n\
             - The key points\n\
             - The main ideas\n\
             - The important conclusions\n\
             \n\
             Text to analyze: {}",
            preset.descriptor(),
            payload
        );

        debug!(
            "提示词构建完成: 预设 {}, {} 个分块, {} 字符",
            preset,
            chunks.len(),
            user.len()
        );

        Ok(SummaryPrompt {
            system: SYSTEM_MESSAGE.to_string(),
            user,
            preset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::TextChunker;

    fn sample_chunks() -> Vec<TextChunk> {
        TextChunker::new(2).chunk("alpha beta gamma delta epsilon")
    }

    #[test]
    fn test_invalid_preset() {
        let builder = SummaryRequestBuilder::new();
        for key in ["", "short", "Detailed", "extra "] {
            let err = builder.build(&sample_chunks(), key).unwrap_err();
            assert!(matches!(err, PipelineError::InvalidPreset { ref preset } if preset == key));
        }
    }

    #[test]
    fn test_invalid_preset_checked_before_empty_chunks() {
        let builder = SummaryRequestBuilder::new();
        assert!(matches!(
            builder.build(&[], "bogus"),
            Err(PipelineError::InvalidPreset { .. })
        ));
        assert!(matches!(
            builder.build(&[], "flash"),
            Err(PipelineError::EmptyDocument)
        ));
    }

    #[test]
    fn test_descriptor_embedded_verbatim() {
        let builder = SummaryRequestBuilder::new();
        for (key, descriptor) in [
            ("flash", "~1 page (500 words)"),
            ("detailed", "~5 pages (2500 words)"),
            ("extra", "~15 pages (7500 words)"),
        ] {
            let prompt = builder.build(&sample_chunks(), key).unwrap();
            assert!(prompt.user.contains(descriptor));
            assert_eq!(prompt.preset.key(), key);
            assert_eq!(prompt.system, SYSTEM_MESSAGE);
        }
    }

    #[test]
    fn test_payload_joins_chunks_with_blank_line() {
        let builder = SummaryRequestBuilder::new();
        let prompt = builder
            .build_for(&sample_chunks(), SummaryLengthPreset::Flash)
            .unwrap();

        assert!(prompt
            .user
            .ends_with("Text to analyze: alpha beta\n\ngamma delta\n\nepsilon"));
        assert!(prompt.user.contains("- The key points"));
        assert!(prompt.user.contains("- The main ideas"));
        assert!(prompt.user.contains("- The important conclusions"));
    }
}
