//! 流式摘要服务 - 基础设施层
//!
//! 持有 LLM 客户端，只暴露"提交提示词、返回片段流"的能力
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行流式调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::models::{FragmentStream, StreamEvent, SummaryPrompt};
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use futures::stream::{self, StreamExt};
use std::future::Future;
use tracing::{debug, warn};

/// 流式摘要服务
///
/// 返回的片段流以恰好一个终止事件结束；drop 流即取消订阅。
pub trait SummaryService: Send + Sync {
    fn submit(&self, prompt: SummaryPrompt) -> impl Future<Output = Result<FragmentStream>> + Send;
}

/// 基于 OpenAI 兼容接口的摘要服务
pub struct OpenAiSummaryService {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiSummaryService {
    /// 创建新的摘要服务
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 构建流式请求
    fn build_request(&self, prompt: &SummaryPrompt) -> Result<CreateChatCompletionRequest> {
        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(prompt.system.as_str())
            .build()
            .map_err(PipelineError::summarization_failed)?;
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt.user.as_str())
            .build()
            .map_err(PipelineError::summarization_failed)?;

        CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![
                ChatCompletionRequestMessage::System(system),
                ChatCompletionRequestMessage::User(user),
            ])
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .stream(true)
            .build()
            .map_err(PipelineError::summarization_failed)
    }
}

impl SummaryService for OpenAiSummaryService {
    async fn submit(&self, prompt: SummaryPrompt) -> Result<FragmentStream> {
        let request = self.build_request(&prompt)?;

        debug!(
            "调用 LLM 流式接口，模型: {}, 提示词长度: {} 字符",
            self.model_name,
            prompt.user.len()
        );

        let upstream = self.client.chat().create_stream(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            PipelineError::summarization_failed(e)
        })?;

        // 上游正常结束 → Done；上游出错 → Failed；终止事件之后不再产生任何事件
        let events = stream::unfold(Some(upstream), |state| async move {
            let mut upstream = state?;
            match upstream.next().await {
                Some(Ok(response)) => {
                    let text: String = response
                        .choices
                        .into_iter()
                        .filter_map(|choice| choice.delta.content)
                        .collect();
                    Some((StreamEvent::Fragment(text), Some(upstream)))
                }
                Some(Err(e)) => {
                    warn!("LLM 流式响应出错: {}", e);
                    Some((StreamEvent::Failed(e.to_string()), None))
                }
                None => Some((StreamEvent::Done, None)),
            }
        });

        Ok(events.boxed())
    }
}
