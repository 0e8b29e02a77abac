use anyhow::{Context, Result};
use book_summarizer::utils::logging;
use book_summarizer::{App, Config, SummaryLengthPreset};
use clap::Parser;
use std::path::PathBuf;

/// 把 PDF 交给大语言模型生成结构化摘要，并重新排版为 PDF
#[derive(Parser, Debug)]
#[command(name = "book_summarizer")]
#[command(version)]
#[command(about = "Summarize PDF documents into paginated summary PDFs", long_about = None)]
struct Cli {
    /// PDF 文件或包含 PDF 的目录（默认读取配置 input_path）
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// 摘要长度：flash | detailed | extra（默认读取配置 summary_preset）
    #[arg(value_name = "PRESET")]
    preset: Option<SummaryLengthPreset>,

    /// TOML 配置文件
    #[arg(short, long, value_name = "FILE", env = "BOOK_SUMMARIZER_CONFIG")]
    config: Option<PathBuf>,

    /// 输出目录（覆盖配置 output_dir）
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// 显示详细日志
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// 配置文件 + 环境变量，再由命令行参数覆盖
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_toml_file(path)
                .and_then(Config::with_env_overrides)
                .context("加载配置失败")?,
            None => Config::load().context("加载配置失败")?,
        };

        if let Some(input) = self.input {
            config.input_path = input.to_string_lossy().into_owned();
        }
        if let Some(preset) = self.preset {
            config.summary_preset = preset.key().to_string();
        }
        if let Some(output) = self.output {
            config.output_dir = output.to_string_lossy().into_owned();
        }
        config.verbose_logging |= self.verbose;

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Cli::parse().into_config()?;

    // 初始化日志
    logging::init(config.verbose_logging, Some(&config.output_log_file))?;

    config.validate().context("配置校验失败")?;

    // 初始化并运行应用
    let stats = App::initialize(config)?.run().await?;

    if stats.failed > 0 {
        anyhow::bail!("{} 个文档处理失败", stats.failed);
    }

    Ok(())
}
