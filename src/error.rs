//! 错误类型
//!
//! - `PipelineError`：单次摘要流水线的错误分类，所有错误都是致命的，不做内部重试
//! - `ConfigError`：配置加载与校验错误
//!
//! 应用层（main / orchestrator 的文件处理部分）统一使用 `anyhow::Result`，
//! 这里的类型都实现了 `std::error::Error`，可以直接用 `?` 转换。

use std::fmt;
use thiserror::Error;

/// 流水线错误
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 字节流完全无法按 PDF 解析（与"解析成功但缺少元数据"不同）
    #[error("无法读取文档: {reason}")]
    UnreadableDocument { reason: String },

    /// 未识别的摘要长度预设
    #[error("无效的摘要长度预设: '{preset}' (可选值: flash, detailed, extra)")]
    InvalidPreset { preset: String },

    /// 流式响应异常终止（传输错误或服务端错误），不会返回部分摘要
    #[error("摘要生成失败: {reason}")]
    SummarizationFailed { reason: String },

    /// 调用方在运行中取消
    #[error("运行已取消")]
    Cancelled,

    /// 文档中没有可提取的文本
    #[error("文档中没有可提取的文本")]
    EmptyDocument,

    /// 文档超过大小限制
    #[error("文档过大: {size} 字节 (上限 {limit} 字节)")]
    DocumentTooLarge { size: usize, limit: usize },

    /// PDF 编码失败
    #[error("渲染失败: {reason}")]
    Render { reason: String },
}

/// 失败类型，供状态机记录 `Failed(kind)` 使用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    UnreadableDocument,
    InvalidPreset,
    SummarizationFailed,
    Cancelled,
    EmptyDocument,
    DocumentTooLarge,
    Render,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::UnreadableDocument => "UnreadableDocument",
            FailureKind::InvalidPreset => "InvalidPreset",
            FailureKind::SummarizationFailed => "SummarizationFailed",
            FailureKind::Cancelled => "Cancelled",
            FailureKind::EmptyDocument => "EmptyDocument",
            FailureKind::DocumentTooLarge => "DocumentTooLarge",
            FailureKind::Render => "Render",
        };
        f.write_str(name)
    }
}

impl PipelineError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PipelineError::UnreadableDocument { .. } => FailureKind::UnreadableDocument,
            PipelineError::InvalidPreset { .. } => FailureKind::InvalidPreset,
            PipelineError::SummarizationFailed { .. } => FailureKind::SummarizationFailed,
            PipelineError::Cancelled => FailureKind::Cancelled,
            PipelineError::EmptyDocument => FailureKind::EmptyDocument,
            PipelineError::DocumentTooLarge { .. } => FailureKind::DocumentTooLarge,
            PipelineError::Render { .. } => FailureKind::Render,
        }
    }

    // ========== 便捷构造函数 ==========

    /// 创建文档不可读错误
    pub fn unreadable(reason: impl fmt::Display) -> Self {
        PipelineError::UnreadableDocument {
            reason: reason.to_string(),
        }
    }

    /// 创建摘要失败错误
    pub fn summarization_failed(reason: impl fmt::Display) -> Self {
        PipelineError::SummarizationFailed {
            reason: reason.to_string(),
        }
    }

    /// 创建渲染错误
    pub fn render(reason: impl fmt::Display) -> Self {
        PipelineError::Render {
            reason: reason.to_string(),
        }
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 必需的配置项为空
    #[error("缺少必需的配置项 {var_name}")]
    Missing { var_name: String },

    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },

    /// 配置值不合法（可以解析，但不在允许范围内）
    #[error("配置项 {field} 无效: {reason}")]
    Invalid { field: String, reason: String },

    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 流水线结果类型
pub type Result<T> = std::result::Result<T, PipelineError>;
