use super::preset::SummaryLengthPreset;

/// 与具体服务商无关的摘要请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPrompt {
    /// 系统消息
    pub system: String,
    /// 用户消息（指令 + 待分析文本）
    pub user: String,
    pub preset: SummaryLengthPreset,
}
