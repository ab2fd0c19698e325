// src/lib.rs

pub mod cli;
pub mod client;
pub mod completion;
pub mod config;
pub mod constants;
pub mod downloader;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod logger;
pub mod models;
pub mod symbols;
pub mod ui;
pub mod utils;
pub mod workflows;

use crate::{
    cli::Cli,
    client::{RobustClient, Session},
    config::{AppConfig, DownloadOptions, credentials::Credentials},
    downloader::Downloader,
    error::AppResult,
};
use log::{debug, info};
use std::sync::Arc;

/// 核心的执行上下文，包含所有课程共享的状态和工具
#[derive(Clone)]
pub struct DownloadJobContext {
    pub config: Arc<AppConfig>,
    pub options: Arc<DownloadOptions>,
    pub session: Arc<dyn Session>,
    pub downloader: Arc<dyn Downloader>,
    pub credentials: Credentials,
}

/// 库的公共入口点，由 `main.rs` 调用
pub async fn run_from_cli(args: Arc<Cli>) -> AppResult<()> {
    debug!("CLI 参数: {:?}", args);

    // 先校验过滤器等选项，避免在登录之后才发现参数错误
    let options = Arc::new(DownloadOptions::from_cli(&args)?);

    let external = config::load_or_create_external_config()?;
    let config = Arc::new(AppConfig::from_external(&external));
    debug!("加载的应用配置: {:?}", config);

    let credentials = config::credentials::resolve_credentials(&args, &external)?;
    info!("使用凭据: {:?}", credentials);

    std::fs::create_dir_all(&options.output)?;
    let output_dir = dunce::canonicalize(&options.output)?;
    info!("文件将保存到目录: \"{}\"", output_dir.display());
    ui::info(&format!("文件将保存到目录: \"{}\"", output_dir.display()));

    let client = Arc::new(RobustClient::new(config.clone())?);
    let downloader = downloader::build_downloader(
        options.downloader,
        options.downloader_path.clone(),
        client.clone(),
    )?;

    let context = DownloadJobContext {
        config,
        options,
        session: client,
        downloader,
        credentials,
    };

    let results = workflows::run_classes(&context, &args.class_names).await;
    workflows::summarize(&results)
}
