//! 文本分块服务 - 业务能力层
//!
//! 只负责"把提取出的文本切成有界大小的分块"，不关心文本来源和后续用途

use crate::models::TextChunk;
use tracing::debug;

/// 每个分块的最大词数
pub const DEFAULT_MAX_TOKENS: usize = 1000;

/// 文本分块器
///
/// 职责：
/// - 按空白切词（连续空白视为一个分隔符，丢弃空词）
/// - 贪心地填满分块，达到上限即封存
/// - 保持词序，不拆分、不重复、不丢弃任何词
#[derive(Debug, Clone)]
pub struct TextChunker {
    max_tokens: usize,
}

impl TextChunker {
    /// 创建分块器，`max_tokens` 为 0 时按 1 处理
    pub fn new(max_tokens: usize) -> Self {
        Self {
            max_tokens: max_tokens.max(1),
        }
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// 将文本切分为分块
    ///
    /// 空文本或全空白文本返回空列表；
    /// 分块数量为 `ceil(词数 / max_tokens)`，只有最后一个分块可能不满。
    pub fn chunk(&self, text: &str) -> Vec<TextChunk> {
        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::with_capacity(self.max_tokens);

        for token in text.split_whitespace() {
            current.push(token);
            if current.len() == self.max_tokens {
                chunks.push(TextChunk::new(chunks.len(), &current));
                current.clear();
            }
        }

        if !current.is_empty() {
            chunks.push(TextChunk::new(chunks.len(), &current));
        }

        debug!(
            "文本分块完成: {} 个分块 (每块上限 {} 词)",
            chunks.len(),
            self.max_tokens
        );

        chunks
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TOKENS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_empty_input() {
        let chunker = TextChunker::default();
        assert!(chunker.chunk("").is_empty());
        assert!(chunker.chunk("   ").is_empty());
        assert!(chunker.chunk("\n\t \r\n").is_empty());
    }

    #[test]
    fn test_chunk_counts() {
        let chunker = TextChunker::default();
        assert_eq!(chunker.chunk(&words(1)).len(), 1);
        assert_eq!(chunker.chunk(&words(999)).len(), 1);
        assert_eq!(chunker.chunk(&words(1000)).len(), 1);
        assert_eq!(chunker.chunk(&words(1001)).len(), 2);

        let sizes: Vec<usize> = chunker
            .chunk(&words(2500))
            .iter()
            .map(|c| c.token_count)
            .collect();
        assert_eq!(sizes, vec![1000, 1000, 500]);
    }

    #[test]
    fn test_tokens_round_trip() {
        let text = "  The quick\tbrown \n\n fox   jumps over\r\nthe lazy dog.  ";
        let chunker = TextChunker::new(3);
        let chunks = chunker.chunk(text);

        let original: Vec<&str> = text.split_whitespace().collect();
        let rebuilt: Vec<&str> = chunks.iter().flat_map(|c| c.tokens()).collect();
        assert_eq!(original, rebuilt);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].text, "The quick brown");
        assert_eq!(chunks[2].text, "lazy dog.");
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            assert!(chunk.token_count <= 3);
        }
    }

    #[test]
    fn test_only_last_chunk_is_short() {
        let chunker = TextChunker::default();
        for n in [1, 999, 1000, 1001, 2999, 3000, 4321] {
            let chunks = chunker.chunk(&words(n));
            assert_eq!(chunks.len(), n.div_ceil(1000));
            let (last, full) = chunks.split_last().unwrap();
            assert!(full.iter().all(|c| c.token_count == 1000));
            assert!(last.token_count >= 1 && last.token_count <= 1000);
            assert_eq!(chunks.iter().map(|c| c.token_count).sum::<usize>(), n);
        }
    }

    #[test]
    fn test_zero_limit_is_clamped() {
        let chunker = TextChunker::new(0);
        assert_eq!(chunker.max_tokens(), 1);
        assert_eq!(chunker.chunk("a b c").len(), 3);
    }
}
