//! rsegment 命令行：分段规则的管理与请求试算

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use http::header::{HeaderName, HeaderValue};
use tracing_subscriber::prelude::*;
use url::Url;

use rsegment::{
    ConfigManager, RequestSegmenter, RuleSegmentProvider, SegmentConfig, SegmentRule, ValueSource,
};

#[derive(Parser)]
#[command(name = "rsegment")]
#[command(about = "分段规则管理工具", long_about = None, version)]
struct Cli {
    /// 应用数据根目录
    #[arg(short, long, default_value = "App_Data")]
    data_root: PathBuf,

    /// 输出详细日志
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 列出提供器的全部规则
    List {
        #[arg(short, long)]
        provider: String,
    },
    /// 追加一条规则
    Add {
        #[arg(short, long)]
        provider: String,
        #[arg(short, long)]
        key: String,
        #[arg(long, default_value = "")]
        value: String,
        #[arg(long)]
        pattern: String,
        #[arg(long)]
        persist: bool,
        /// 允许作为内容变体
        #[arg(long)]
        variant: bool,
    },
    /// 删除指定 Key 的全部规则
    Remove {
        #[arg(short, long)]
        provider: String,
        #[arg(short, long)]
        key: String,
    },
    /// 列出可分配的内容变体
    Variants {
        #[arg(short, long)]
        provider: String,
    },
    /// 用模拟请求试算命中的分段
    Eval {
        #[arg(short, long)]
        provider: String,
        /// 取值来源：referrer|url|path|header:NAME|cookie:NAME|query:NAME
        #[arg(short, long, default_value = "url")]
        source: String,
        #[arg(short, long)]
        url: String,
        /// 请求头，格式 'Name: value'，可重复
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "rsegment=debug" } else { "rsegment=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ConfigManager::custom().data_root(&cli.data_root).build();

    match cli.command {
        Commands::List { provider } => {
            let rules = open(&config, &provider, ValueSource::Url)?.read_segment_configuration()?;
            println!("{}", serde_json::to_string_pretty(&rules)?);
        }
        Commands::Add { provider, key, value, pattern, persist, variant } => {
            if key.trim().is_empty() {
                bail!("规则Key不能为空");
            }
            let segmenter = open(&config, &provider, ValueSource::Url)?;
            let mut rules = segmenter.read_segment_configuration()?;
            rules.push(
                SegmentRule::new(key, value, pattern)
                    .persist(persist)
                    .allowed_as_variant(variant),
            );
            segmenter.write_segment_configuration(&rules)?;
            println!("已写入 {} 条规则", rules.len());
        }
        Commands::Remove { provider, key } => {
            let segmenter = open(&config, &provider, ValueSource::Url)?;
            let mut rules = segmenter.read_segment_configuration()?;
            let before = rules.len();
            rules.retain(|rule| rule.key != key);
            segmenter.write_segment_configuration(&rules)?;
            println!("已删除 {} 条规则", before - rules.len());
        }
        Commands::Variants { provider } => {
            for variant in open(&config, &provider, ValueSource::Url)?.assignable_content_variants()? {
                println!("{}", variant);
            }
        }
        Commands::Eval { provider, source, url, headers } => {
            let source: ValueSource = source.parse()?;
            let url = Url::parse(&url).with_context(|| format!("无效URL：{}", url))?;
            let request = build_request(&url, &headers)?;

            let segments = open(&config, &provider, source)?.get_segments_for_request(&url, &url, &request)?;
            if segments.is_empty() {
                println!("未命中任何规则");
            }
            for segment in &segments {
                println!("{}", segment);
            }
        }
    }

    Ok(())
}

fn open(config: &SegmentConfig, provider: &str, source: ValueSource) -> Result<RuleSegmentProvider<ValueSource>> {
    RuleSegmentProvider::new(config, provider, source)
        .with_context(|| format!("无法打开提供器：{}", provider))
}

/// 由 URL 与 'Name: value' 形式的请求头构建模拟请求
fn build_request(url: &Url, headers: &[String]) -> Result<http::request::Parts> {
    let mut builder = http::Request::builder().uri(url.as_str());
    for raw in headers {
        let Some((name, value)) = raw.split_once(':') else {
            bail!("无效Header：{}，格式应为 'Name: value'", raw);
        };
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .with_context(|| format!("无效Header名称：{}", name))?;
        let value = HeaderValue::from_str(value.trim())
            .with_context(|| format!("无效Header值：{}", value))?;
        builder = builder.header(name, value);
    }
    Ok(builder.body(())?.into_parts().0)
}
