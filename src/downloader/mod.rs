// src/downloader/mod.rs

pub mod external;
pub mod naming;
pub mod native;
pub mod orchestrator;
pub mod post_process;
pub mod selector;

pub use orchestrator::CourseDownloader;

use crate::{client::RobustClient, cli::DownloaderKind, error::*};
use async_trait::async_trait;
use log::info;
use std::{path::Path, sync::Arc};

/// 把一个地址的内容写入本地路径。`resume` 为真时尽量在已有文件上续传。
#[async_trait]
pub trait Downloader: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch(&self, url: &str, path: &Path, resume: bool) -> AppResult<()>;
}

/// 根据用户选择创建下载后端，外部工具共享会话中的 cookie
pub fn build_downloader(
    kind: DownloaderKind,
    program: Option<String>,
    client: Arc<RobustClient>,
) -> AppResult<Arc<dyn Downloader>> {
    let downloader: Arc<dyn Downloader> = match kind {
        DownloaderKind::Native => Arc::new(native::NativeDownloader::new(client)),
        _ => Arc::new(external::ExternalDownloader::new(kind, program, client)?),
    };
    info!("使用下载后端: {}", downloader.name());
    Ok(downloader)
}
