//! 流式响应累积服务 - 业务能力层
//!
//! 只负责"把片段流拼成最终摘要"，不关心片段来自哪个服务商

use crate::error::{PipelineError, Result};
use crate::models::StreamEvent;
use crate::workflow::CancelToken;
use futures::{Stream, StreamExt};
use tracing::{debug, warn};

/// 流式响应累积器
///
/// - 按到达顺序追加片段，不重排、不设缓冲上限
/// - 收到 `Done` 后冻结缓冲区并返回
/// - 收到 `Failed`、或流在没有 `Done` 的情况下结束，返回 `SummarizationFailed`，
///   已累积的部分内容直接丢弃
/// - 取消信号优先于下一个片段；返回时流被 drop，订阅随之中止
#[derive(Debug, Clone, Default)]
pub struct StreamAccumulator;

impl StreamAccumulator {
    pub fn new() -> Self {
        Self
    }

    pub async fn accumulate<S>(&self, mut stream: S, cancel: &CancelToken) -> Result<String>
    where
        S: Stream<Item = StreamEvent> + Unpin,
    {
        let mut buffer = String::new();
        let mut fragments = 0usize;

        loop {
            let event = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!("流式接收被取消，已丢弃 {} 个片段", fragments);
                    return Err(PipelineError::Cancelled);
                }
                event = stream.next() => event,
            };

            match event {
                Some(StreamEvent::Fragment(text)) => {
                    fragments += 1;
                    buffer.push_str(&text);
                }
                Some(StreamEvent::Done) => {
                    debug!("流式接收完成: {} 个片段, {} 字符", fragments, buffer.len());
                    return Ok(buffer);
                }
                Some(StreamEvent::Failed(reason)) => {
                    return Err(PipelineError::summarization_failed(reason));
                }
                None => {
                    return Err(PipelineError::summarization_failed(
                        "流在没有完成信号的情况下结束",
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    fn events(fragments: &[&str], terminal: Option<StreamEvent>) -> Vec<StreamEvent> {
        let mut events: Vec<StreamEvent> =
            fragments.iter().map(|f| StreamEvent::fragment(*f)).collect();
        events.extend(terminal);
        events
    }

    #[tokio::test]
    async fn test_fragments_then_done() {
        let accumulator = StreamAccumulator::new();
        let input = stream::iter(events(&["Hel", "lo, ", "world"], Some(StreamEvent::Done)));

        let summary = assert_ok!(accumulator.accumulate(input, &CancelToken::new()).await);
        assert_eq!(summary, "Hello, world");
    }

    #[tokio::test]
    async fn test_fragments_then_error() {
        let accumulator = StreamAccumulator::new();
        let input = stream::iter(events(
            &["Hel", "lo, ", "world"],
            Some(StreamEvent::Failed("provider overloaded".to_string())),
        ));

        let err = assert_err!(accumulator.accumulate(input, &CancelToken::new()).await);
        match err {
            PipelineError::SummarizationFailed { reason } => {
                assert_eq!(reason, "provider overloaded");
                assert!(!reason.contains("Hello"));
            }
            other => panic!("意外的错误类型: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stream_ending_without_terminal_fails() {
        let accumulator = StreamAccumulator::new();
        let input = stream::iter(events(&["partial"], None));

        let err = assert_err!(accumulator.accumulate(input, &CancelToken::new()).await);
        assert!(matches!(err, PipelineError::SummarizationFailed { .. }));
    }

    #[tokio::test]
    async fn test_events_after_done_are_ignored() {
        let accumulator = StreamAccumulator::new();
        let mut input = events(&["a", "b"], Some(StreamEvent::Done));
        input.push(StreamEvent::fragment("late"));
        input.push(StreamEvent::Failed("late error".to_string()));

        let summary = accumulator
            .accumulate(stream::iter(input), &CancelToken::new())
            .await
            .unwrap();
        assert_eq!(summary, "ab");
    }

    #[tokio::test]
    async fn test_empty_summary_is_valid() {
        let accumulator = StreamAccumulator::new();
        let summary = accumulator
            .accumulate(stream::iter(vec![StreamEvent::Done]), &CancelToken::new())
            .await
            .unwrap();
        assert!(summary.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_before_start() {
        let accumulator = StreamAccumulator::new();
        let cancel = CancelToken::new();
        cancel.cancel();

        let input = stream::iter(events(&["never"], Some(StreamEvent::Done)));
        let err = accumulator.accumulate(input, &cancel).await.unwrap_err();
        assert!(matches!(err, PipelineError::Cancelled));
    }

    #[tokio::test]
    async fn test_cancel_while_waiting_for_fragment() {
        let accumulator = StreamAccumulator::new();
        let cancel = CancelToken::new();

        // 先推送一个片段，然后永远挂起
        let input = stream::iter(vec![StreamEvent::fragment("Hel")]).chain(stream::pending());

        let trigger = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                cancel.cancel();
            })
        };

        let result = tokio::time::timeout(
            Duration::from_secs(1),
            accumulator.accumulate(input, &cancel),
        )
        .await
        .expect("取消后应立即返回");
        trigger.await.unwrap();

        assert!(matches!(result, Err(PipelineError::Cancelled)));
    }
}
