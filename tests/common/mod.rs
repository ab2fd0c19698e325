// tests/common/mod.rs
#![allow(dead_code)]

use anyhow::anyhow;
use async_trait::async_trait;
use coursera_dl::{
    client::Session,
    config::{AppConfig, credentials::Credentials},
    constants::api::templates,
    downloader::Downloader,
    error::{AppError, AppResult},
    utils,
};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

/// 从内存中返回页面的会话
#[derive(Default)]
pub struct FakeSession {
    pages: HashMap<String, String>,
    pub logins: AtomicUsize,
    pub requests: Mutex<Vec<String>>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    pub fn with_fixture(self, url: impl Into<String>, fixture: &str) -> Self {
        let body = fs::read_to_string(format!("tests/fixtures/{}", fixture))
            .unwrap_or_else(|e| panic!("无法读取测试数据 {}: {}", fixture, e));
        self.with_page(url, body)
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Session for FakeSession {
    async fn login(&self, _credentials: &Credentials) -> AppResult<()> {
        self.logins.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get_text(&self, url: &str) -> AppResult<String> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::Other(anyhow!("没有为 {} 准备页面", url)))
    }
}

/// 把地址写进目标文件的下载器；地址中含有 "fail" 时返回错误
#[derive(Default)]
pub struct FakeDownloader {
    pub calls: Mutex<Vec<(String, PathBuf, bool)>>,
}

impl FakeDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Downloader for FakeDownloader {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn fetch(&self, url: &str, path: &Path, resume: bool) -> AppResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), path.to_path_buf(), resume));
        if url.contains("fail") {
            return Err(AppError::Download {
                url: url.to_string(),
                reason: "模拟的下载失败".to_string(),
            });
        }
        fs::write(path, url)?;
        Ok(())
    }
}

pub fn video_url(config: &AppConfig, video_id: &str) -> String {
    utils::fill_template(
        config.template(templates::VIDEO_METADATA).unwrap(),
        &[("video_id", video_id)],
    )
}

pub fn syllabus_url(config: &AppConfig, class_name: &str) -> String {
    utils::fill_template(
        config.template(templates::COURSE_MATERIALS).unwrap(),
        &[("class_name", class_name)],
    )
}

/// 一个完整的课程：大纲加三个视频的元数据
pub fn course_session(config: &AppConfig, class_name: &str) -> FakeSession {
    FakeSession::new()
        .with_fixture(syllabus_url(config, class_name), "syllabus_response.json")
        .with_fixture(video_url(config, "v1"), "video_v1.json")
        .with_fixture(video_url(config, "v2"), "video_v2.json")
        .with_fixture(video_url(config, "v3"), "video_v3.json")
}

pub fn password_credentials() -> Credentials {
    Credentials::Password {
        username: "student@example.com".to_string(),
        password: "secret".to_string(),
    }
}
