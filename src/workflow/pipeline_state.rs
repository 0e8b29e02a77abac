//! 流水线状态机
//!
//! `Idle → Extracting → Chunking → Prompting → Streaming → Rendering → Done`，
//! 任意非终止状态都可以进入 `Failed(kind)`。状态只前进，不回退，也不重复进入。

use crate::error::FailureKind;
use std::fmt;
use tokio::sync::watch;
use tracing::{debug, warn};

/// 流水线状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Extracting,
    Chunking,
    Prompting,
    Streaming,
    Rendering,
    Done,
    Failed(FailureKind),
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed(_))
    }

    /// 在正常路径上的序号，`Failed` 没有序号
    fn ordinal(&self) -> Option<u8> {
        match self {
            PipelineState::Idle => Some(0),
            PipelineState::Extracting => Some(1),
            PipelineState::Chunking => Some(2),
            PipelineState::Prompting => Some(3),
            PipelineState::Streaming => Some(4),
            PipelineState::Rendering => Some(5),
            PipelineState::Done => Some(6),
            PipelineState::Failed(_) => None,
        }
    }

    /// 是否允许从 `self` 转移到 `next`
    pub fn can_advance_to(&self, next: PipelineState) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self.ordinal(), next.ordinal()) {
            (Some(current), Some(next)) => next == current + 1,
            (Some(_), None) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Idle => write!(f, "Idle"),
            PipelineState::Extracting => write!(f, "Extracting"),
            PipelineState::Chunking => write!(f, "Chunking"),
            PipelineState::Prompting => write!(f, "Prompting"),
            PipelineState::Streaming => write!(f, "Streaming"),
            PipelineState::Rendering => write!(f, "Rendering"),
            PipelineState::Done => write!(f, "Done"),
            PipelineState::Failed(kind) => write!(f, "Failed({})", kind),
        }
    }
}

/// 单次运行的状态机
///
/// 每次转移都会发布到 `watch` 通道（调用方可以用来显示进度），并记录到历史中。
#[derive(Debug)]
pub struct RunStateMachine {
    current: PipelineState,
    history: Vec<PipelineState>,
    progress: watch::Sender<PipelineState>,
}

impl RunStateMachine {
    pub fn new(progress: watch::Sender<PipelineState>) -> Self {
        progress.send_replace(PipelineState::Idle);
        Self {
            current: PipelineState::Idle,
            history: vec![PipelineState::Idle],
            progress,
        }
    }

    /// 不需要观察进度时使用
    pub fn detached() -> Self {
        let (tx, _rx) = watch::channel(PipelineState::Idle);
        Self::new(tx)
    }

    pub fn current(&self) -> PipelineState {
        self.current
    }

    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// 前进到下一个状态；非法转移被忽略并记录警告
    pub fn advance(&mut self, next: PipelineState) {
        if !self.current.can_advance_to(next) {
            warn!("忽略非法状态转移: {} → {}", self.current, next);
            return;
        }
        debug!("状态转移: {} → {}", self.current, next);
        self.current = next;
        self.history.push(next);
        self.progress.send_replace(next);
    }

    /// 进入失败状态（已处于终止状态时不做任何事）
    pub fn fail(&mut self, kind: FailureKind) {
        if self.current.is_terminal() {
            return;
        }
        self.advance(PipelineState::Failed(kind));
    }
}
