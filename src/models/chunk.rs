use serde::{Deserialize, Serialize};

/// 文本分块
///
/// 由若干个以空白分隔的词组成，词之间用单个空格连接。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    /// 分块在原文中的顺序（从 0 开始）
    pub index: usize,
    /// 分块内容
    pub text: String,
    /// 分块包含的词数
    pub token_count: usize,
}

impl TextChunk {
    pub fn new(index: usize, tokens: &[&str]) -> Self {
        Self {
            index,
            text: tokens.join(" "),
            token_count: tokens.len(),
        }
    }

    /// 按空白重新切分出分块中的词
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }
}
