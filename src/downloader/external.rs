// src/downloader/external.rs

use super::Downloader;
use crate::{client::RobustClient, cli::DownloaderKind, error::*};
use async_trait::async_trait;
use log::{debug, info};
use std::{path::Path, sync::Arc};
use tokio::process::Command;

/// 调用系统中的下载工具 (wget / curl / aria2c / axel)
pub struct ExternalDownloader {
    kind: DownloaderKind,
    program: String,
    client: Arc<RobustClient>,
}

impl ExternalDownloader {
    /// `kind` 为 `Native` 时没有对应的外部程序
    pub fn new(
        kind: DownloaderKind,
        program: Option<String>,
        client: Arc<RobustClient>,
    ) -> AppResult<Self> {
        let default_program = default_program(kind).ok_or_else(|| {
            AppError::UserInputError("内置下载器不是外部下载工具".to_string())
        })?;
        Ok(Self {
            kind,
            program: program.unwrap_or_else(|| default_program.to_string()),
            client,
        })
    }
}

fn default_program(kind: DownloaderKind) -> Option<&'static str> {
    match kind {
        DownloaderKind::Native => None,
        DownloaderKind::Wget => Some("wget"),
        DownloaderKind::Curl => Some("curl"),
        DownloaderKind::Aria2 => Some("aria2c"),
        DownloaderKind::Axel => Some("axel"),
    }
}

/// 生成外部工具的命令行参数 (不含程序名)
pub fn build_args(
    kind: DownloaderKind,
    url: &str,
    path: &Path,
    resume: bool,
    cookies: Option<&str>,
) -> Vec<String> {
    let target = path.to_string_lossy().into_owned();
    let mut args: Vec<String> = Vec::new();
    match kind {
        DownloaderKind::Native => {}
        DownloaderKind::Wget => {
            args.extend(["-O".into(), target]);
            if resume {
                args.push("-c".into());
            }
            if let Some(cookies) = cookies {
                args.extend(["--header".into(), format!("Cookie: {}", cookies)]);
            }
        }
        DownloaderKind::Curl => {
            args.extend(["-L".into(), "-f".into(), "-o".into(), target]);
            if resume {
                args.extend(["-C".into(), "-".into()]);
            }
            if let Some(cookies) = cookies {
                args.extend(["--cookie".into(), cookies.to_string()]);
            }
        }
        DownloaderKind::Aria2 => {
            let dir = path
                .parent()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|| ".".into());
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            args.extend(["-d".into(), dir, "-o".into(), name]);
            if resume {
                args.push("-c".into());
            } else {
                args.push("--allow-overwrite=true".into());
            }
            if let Some(cookies) = cookies {
                args.push(format!("--header=Cookie: {}", cookies));
            }
        }
        DownloaderKind::Axel => {
            args.extend(["-o".into(), target]);
            if let Some(cookies) = cookies {
                args.extend(["-H".into(), format!("Cookie: {}", cookies)]);
            }
        }
    }
    args.push(url.to_string());
    args
}

#[async_trait]
impl Downloader for ExternalDownloader {
    fn name(&self) -> &'static str {
        default_program(self.kind).unwrap_or("external")
    }

    async fn fetch(&self, url: &str, path: &Path, resume: bool) -> AppResult<()> {
        let cookies = self.client.cookie_header(url);
        let args = build_args(self.kind, url, path, resume, cookies.as_deref());
        debug!("执行 {} (共 {} 个参数)", self.program, args.len());
        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .await
            .map_err(|e| AppError::Download {
                url: url.to_string(),
                reason: format!("无法启动 '{}': {}", self.program, e),
            })?;
        if !status.success() {
            return Err(AppError::Download {
                url: url.to_string(),
                reason: format!("'{}' 退出状态 {}", self.program, status),
            });
        }
        info!("{} 已保存 {:?}", self.program, path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_wget_args_with_resume_and_cookies() {
        let path = PathBuf::from("out/01_intro.mp4");
        let args = build_args(
            DownloaderKind::Wget,
            "http://x/a.mp4",
            &path,
            true,
            Some("CAUTH=abc"),
        );
        assert_eq!(
            args,
            vec![
                "-O",
                "out/01_intro.mp4",
                "-c",
                "--header",
                "Cookie: CAUTH=abc",
                "http://x/a.mp4"
            ]
        );
    }

    #[test]
    fn test_aria2_splits_directory_and_name() {
        let path = PathBuf::from("out/sec/01_intro.mp4");
        let args = build_args(DownloaderKind::Aria2, "http://x/a.mp4", &path, false, None);
        assert_eq!(
            args,
            vec![
                "-d",
                "out/sec",
                "-o",
                "01_intro.mp4",
                "--allow-overwrite=true",
                "http://x/a.mp4"
            ]
        );
    }

    #[test]
    fn test_curl_resume_flag() {
        let path = PathBuf::from("a.srt");
        let args = build_args(DownloaderKind::Curl, "http://x/a.srt", &path, true, None);
        assert_eq!(args, vec!["-L", "-f", "-o", "a.srt", "-C", "-", "http://x/a.srt"]);
    }
}
