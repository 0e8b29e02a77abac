//! 程序配置
//!
//! 加载顺序：默认值 → TOML 配置文件（可选） → 环境变量。
//! 配置在启动后只读，以 `Arc<Config>` 的形式注入流水线。

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "book_summarizer.toml";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 同时处理的文档数量
    pub max_concurrent_documents: usize,
    /// 输入路径（单个 PDF 或包含 PDF 的目录）
    pub input_path: String,
    /// 输出目录
    pub output_dir: String,
    /// 摘要长度预设（flash / detailed / extra）
    pub summary_preset: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 单个文档的大小上限（字节）
    pub max_document_bytes: usize,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_documents: 4,
            input_path: "input".to_string(),
            output_dir: "output".to_string(),
            summary_preset: "flash".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            max_document_bytes: 10_000_000,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_temperature: 0.7,
            llm_max_tokens: 4096,
        }
    }
}

impl Config {
    /// 从环境变量读取配置（以默认值为基础）
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件读取配置，文件中未出现的字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 完整加载：配置文件（`BOOK_SUMMARIZER_CONFIG` 指定，或当前目录下的默认文件）+ 环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var("BOOK_SUMMARIZER_CONFIG") {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_toml_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            Err(_) => Self::default(),
        };
        base.with_env_overrides()
    }

    /// 用环境变量覆盖已有配置
    ///
    /// 数值或布尔类型的变量无法解析时返回 `EnvVarParseFailed`，不会静默回退。
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        let base = self;
        Ok(Self {
            max_concurrent_documents: env_parse("MAX_CONCURRENT_DOCUMENTS")?
                .unwrap_or(base.max_concurrent_documents),
            input_path: std::env::var("INPUT_PATH").unwrap_or(base.input_path),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(base.output_dir),
            summary_preset: std::env::var("SUMMARY_PRESET").unwrap_or(base.summary_preset),
            verbose_logging: env_parse("VERBOSE_LOGGING")?.unwrap_or(base.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(base.output_log_file),
            max_document_bytes: env_parse("MAX_DOCUMENT_BYTES")?
                .unwrap_or(base.max_document_bytes),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(base.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(base.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(base.llm_model_name),
            llm_temperature: env_parse("LLM_TEMPERATURE")?.unwrap_or(base.llm_temperature),
            llm_max_tokens: env_parse("LLM_MAX_TOKENS")?.unwrap_or(base.llm_max_tokens),
        })
    }

    /// 校验必需的配置项
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::Missing {
                var_name: "LLM_API_KEY".to_string(),
            });
        }
        if self.max_concurrent_documents == 0 {
            return Err(ConfigError::Invalid {
                field: "max_concurrent_documents".to_string(),
                reason: "至少为 1".to_string(),
            });
        }
        Ok(())
    }
}

fn env_parse<T: FromStr>(var_name: &str) -> Result<Option<T>, ConfigError> {
    parse_env_value(var_name, std::env::var(var_name).ok())
}

/// 未设置返回 `None`，设置了但无法解析返回错误
fn parse_env_value<T: FromStr>(
    var_name: &str,
    value: Option<String>,
) -> Result<Option<T>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.trim().parse() {
        Ok(parsed) => Ok(Some(parsed)),
        Err(_) => Err(ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value,
            expected_type: std::any::type_name::<T>().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_partial_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            summary_preset = "detailed"
            llm_model_name = "claude-3-haiku-20240307"
            max_concurrent_documents = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.summary_preset, "detailed");
        assert_eq!(config.llm_model_name, "claude-3-haiku-20240307");
        assert_eq!(config.max_concurrent_documents, 2);
        assert_eq!(config.max_document_bytes, 10_000_000);
        assert_eq!(config.llm_max_tokens, 4096);
    }

    #[test]
    fn test_toml_type_error() {
        assert!(Config::from_toml_str("max_concurrent_documents = \"many\"").is_err());
    }

    #[test]
    fn test_validate_requires_api_key() {
        let config = Config::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing { .. })
        ));

        let config = Config {
            llm_api_key: "sk-test".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_is_invalid() {
        let config = Config::from_toml_str(
            r#"
            llm_api_key = "sk-test"
            max_concurrent_documents = 0
            "#,
        )
        .unwrap();

        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => {
                assert_eq!(field, "max_concurrent_documents");
            }
            other => panic!("期望 Invalid，实际 {:?}", other),
        }
    }

    #[test]
    fn test_parse_env_value() {
        assert_eq!(
            parse_env_value::<usize>("MAX_CONCURRENT_DOCUMENTS", None).unwrap(),
            None
        );
        assert_eq!(
            parse_env_value::<usize>("MAX_CONCURRENT_DOCUMENTS", Some(" 8 ".to_string())).unwrap(),
            Some(8)
        );

        match parse_env_value::<usize>("MAX_CONCURRENT_DOCUMENTS", Some("many".to_string())) {
            Err(ConfigError::EnvVarParseFailed {
                var_name,
                value,
                expected_type,
            }) => {
                assert_eq!(var_name, "MAX_CONCURRENT_DOCUMENTS");
                assert_eq!(value, "many");
                assert_eq!(expected_type, "usize");
            }
            other => panic!("期望 EnvVarParseFailed，实际 {:?}", other),
        }

        assert!(parse_env_value::<bool>("VERBOSE_LOGGING", Some("yes".to_string())).is_err());
        assert!(parse_env_value::<f32>("LLM_TEMPERATURE", Some("0.2".to_string())).is_ok());
    }

    #[test]
    fn test_missing_config_file() {
        let err = Config::from_toml_file(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFailed { .. }));
    }
}
