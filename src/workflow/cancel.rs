//! 运行取消信号
//!
//! 调用方（例如客户端断开、Ctrl-C）通过 `cancel()` 发出信号，
//! 流水线在阶段之间以及流式接收期间响应该信号。

use std::sync::Arc;
use tokio::sync::watch;

/// 取消令牌，clone 后共享同一个信号
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// 发出取消信号（可重复调用）
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// 等待取消信号；已取消时立即返回
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // 发送端由 self 持有，wait_for 不会因通道关闭而返回错误
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
