// src/downloader/native.rs

use super::Downloader;
use crate::{client::RobustClient, error::*, ui, utils};
use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, info, warn};
use reqwest::{StatusCode, header};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::Path,
    sync::Arc,
};

const PROGRESS_PREFIX_WIDTH: usize = 32;

/// 内置下载器：流式写入，支持 Range 断点续传
pub struct NativeDownloader {
    client: Arc<RobustClient>,
    show_progress: bool,
}

impl NativeDownloader {
    pub fn new(client: Arc<RobustClient>) -> Self {
        Self {
            client,
            show_progress: true,
        }
    }

    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    fn progress_prefix(path: &Path) -> String {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        utils::truncate_text(&name, PROGRESS_PREFIX_WIDTH)
    }

    /// 服务器拒绝续传点 (416) 时返回 `false`
    async fn transfer(&self, url: &str, path: &Path, offset: u64) -> AppResult<bool> {
        let mut request = self.client.client.get(url);
        if offset > 0 {
            request = request.header(header::RANGE, format!("bytes={}-", offset));
        }
        let res = request.send().await?;
        if offset > 0 && res.status() == StatusCode::RANGE_NOT_SATISFIABLE {
            return Ok(false);
        }
        let res = res.error_for_status()?;
        let partial = offset > 0 && res.status() == StatusCode::PARTIAL_CONTENT;

        let pbar = if self.show_progress {
            ui::new_bytes_progress_bar(res.content_length(), &Self::progress_prefix(path))
        } else {
            indicatif::ProgressBar::hidden()
        };
        let mut stream = res.bytes_stream();

        if partial {
            let mut file = OpenOptions::new().append(true).open(path)?;
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                file.write_all(&chunk)?;
                pbar.inc(chunk.len() as u64);
            }
        } else {
            // 先写入同目录下的临时文件，完成后再改名，避免留下半截文件
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let mut temp = tempfile::Builder::new()
                .prefix(".coursera-dl-")
                .suffix(".part")
                .tempfile_in(dir)?;
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                temp.write_all(&chunk)?;
                pbar.inc(chunk.len() as u64);
            }
            temp.as_file().sync_all()?;
            temp.persist(path)?;
        }
        pbar.finish_and_clear();
        Ok(true)
    }
}

#[async_trait]
impl Downloader for NativeDownloader {
    fn name(&self) -> &'static str {
        "native"
    }

    async fn fetch(&self, url: &str, path: &Path, resume: bool) -> AppResult<()> {
        let existing = if resume {
            fs::metadata(path).map(|m| m.len()).unwrap_or(0)
        } else {
            0
        };
        if existing > 0 {
            debug!("从第 {} 字节续传 {:?}", existing, path);
        }

        let result = match self.transfer(url, path, existing).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                warn!("续传点 {} 无效，将从头开始下载: {:?}", existing, path);
                self.transfer(url, path, 0).await.map(|_| ())
            }
            Err(e) => Err(e),
        };
        result.map_err(|e| match e {
            AppError::Io(_) | AppError::TempFilePersist(_) => e,
            other => AppError::Download {
                url: url.to_string(),
                reason: other.to_string(),
            },
        })?;
        info!("已保存 {:?}", path);
        Ok(())
    }
}
