//! 运行上下文
//!
//! 封装"我正在处理哪一个文档"这一信息，只用于日志

use std::fmt::Display;

/// 单次运行的上下文
#[derive(Debug, Clone)]
pub struct RunCtx {
    /// 文档索引（仅用于日志显示，从 1 开始）
    pub document_index: usize,

    /// 文档名称
    pub document_name: String,
}

impl RunCtx {
    pub fn new(document_index: usize, document_name: impl Into<String>) -> Self {
        Self {
            document_index,
            document_name: document_name.into(),
        }
    }
}

impl Display for RunCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[文档 {}]", self.document_index)
    }
}
