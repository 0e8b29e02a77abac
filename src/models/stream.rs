use futures::stream::BoxStream;

/// 摘要服务流式推送的事件
///
/// 一个流由若干 `Fragment` 组成，并以恰好一个终止事件（`Done` 或 `Failed`）结束。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// 增量文本片段
    Fragment(String),
    /// 正常结束
    Done,
    /// 异常结束（传输错误或服务端错误）
    Failed(String),
}

impl StreamEvent {
    pub fn fragment(text: impl Into<String>) -> Self {
        StreamEvent::Fragment(text.into())
    }
}

/// 片段流
pub type FragmentStream = BoxStream<'static, StreamEvent>;
