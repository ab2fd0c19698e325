// src/downloader/post_process.rs

use crate::{
    constants,
    error::*,
    models::{EventLog, RunEvent},
};
use log::{debug, info};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tokio::process::Command;

/// 为 `dir` 及其子目录生成 M3U 播放列表，返回写入的 (路径, 条目数)。
/// 没有视频的目录不生成播放列表；已有的同名播放列表会被覆盖。
pub fn write_playlists(dir: &Path) -> AppResult<Vec<(PathBuf, usize)>> {
    let mut written = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        let mut videos = Vec::new();
        for entry in fs::read_dir(&current)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "mp4") {
                videos.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        if videos.is_empty() {
            debug!("目录 {:?} 中没有视频，不生成播放列表", current);
            continue;
        }
        videos.sort();

        let dir_name = current
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "playlist".to_string());
        let playlist = current.join(format!("{}.{}", dir_name, constants::PLAYLIST_EXTENSION));
        let mut content = videos.join("\n");
        content.push('\n');
        fs::write(&playlist, content)?;
        written.push((playlist, videos.len()));
    }
    Ok(written)
}

/// 依次在 `dir` 中运行每个钩子命令。钩子失败只记录警告，不中断下载。
pub async fn run_hooks(hooks: &[String], dir: &Path, events: &mut EventLog) {
    for hook in hooks {
        info!("在 {:?} 中运行钩子 '{}'", dir, hook);
        let event = match run_hook(hook, dir).await {
            Ok(()) => RunEvent::HookFinished {
                hook: hook.clone(),
                dir: dir.to_path_buf(),
            },
            Err(reason) => RunEvent::HookFailed {
                hook: hook.clone(),
                dir: dir.to_path_buf(),
                reason,
            },
        };
        events.record(event);
    }
}

async fn run_hook(hook: &str, dir: &Path) -> Result<(), String> {
    let mut parts = hook.split_whitespace();
    let program = parts.next().ok_or_else(|| "钩子命令为空".to_string())?;
    let status = Command::new(program)
        .args(parts)
        .current_dir(dir)
        .status()
        .await
        .map_err(|e| format!("无法启动: {}", e))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("退出状态 {}", status))
    }
}
