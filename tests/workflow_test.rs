// tests/workflow_test.rs

mod common;

use common::{
    FakeDownloader, FakeSession, course_session, password_credentials, syllabus_url, video_url,
};
use coursera_dl::{
    DownloadJobContext,
    config::{AppConfig, DownloadOptions},
    models::RunEvent,
    workflows,
};
use std::{
    fs,
    sync::{Arc, atomic::Ordering},
};
use tempfile::tempdir;

#[tokio::test]
async fn test_download_class_end_to_end() {
    let config = Arc::new(AppConfig::default());
    let session = Arc::new(course_session(&config, "ml-005"));
    let output = tempdir().unwrap();
    let context = DownloadJobContext {
        config: config.clone(),
        options: Arc::new(DownloadOptions {
            output: output.path().to_path_buf(),
            ..Default::default()
        }),
        session: session.clone(),
        downloader: Arc::new(FakeDownloader::new()),
        credentials: password_credentials(),
    };

    let report = workflows::download_class(&context, "ml-005").await.unwrap();

    assert_eq!(session.logins.load(Ordering::SeqCst), 1);
    let intro = output.path().join("ml-005/01_week-1/01_intro");
    assert_eq!(
        fs::read_to_string(intro.join("01_welcome.mp4")).unwrap(),
        "https://cdn.example.org/v1/540.mp4"
    );
    assert!(intro.join("01_welcome_de.srt").is_file());
    assert!(intro.join("01_welcome_en.srt").is_file());
    assert!(intro.join("01_welcome.txt").is_file());
    assert!(
        output
            .path()
            .join("ml-005/02_week-2/01_regression/01_linear.mp4")
            .is_file()
    );
    assert!(!output.path().join("ml-005/03_week-3").exists());

    assert_eq!(report.stats.written, 5);
    let unresolved = report
        .warnings()
        .filter(|e| matches!(e, RunEvent::LectureUnresolved { .. }))
        .count();
    assert_eq!(unresolved, 2);
}

#[tokio::test]
async fn test_each_course_is_isolated() {
    let config = Arc::new(AppConfig::default());
    let output = tempdir().unwrap();
    let context = DownloadJobContext {
        config: config.clone(),
        options: Arc::new(DownloadOptions {
            output: output.path().to_path_buf(),
            skip_download: true,
            ..Default::default()
        }),
        session: Arc::new(course_session(&config, "ml-005")),
        downloader: Arc::new(FakeDownloader::new()),
        credentials: password_credentials(),
    };

    let classes = vec!["missing-course".to_string(), "ml-005".to_string()];
    let results = workflows::run_classes(&context, &classes).await;

    assert!(results[0].1.is_err());
    let report = results[1].1.as_ref().unwrap();
    assert_eq!(report.stats.touched, 5);
    assert!(workflows::summarize(&results).is_err());
}

#[tokio::test]
async fn test_local_page_is_created_then_reused() {
    let config = Arc::new(AppConfig::default());
    let output = tempdir().unwrap();
    let cache = output.path().join("ml-005-syllabus.json");
    let options = Arc::new(DownloadOptions {
        output: output.path().to_path_buf(),
        skip_download: true,
        local_page: Some(cache.clone()),
        ..Default::default()
    });

    let first_session = Arc::new(course_session(&config, "ml-005"));
    let first = DownloadJobContext {
        config: config.clone(),
        options: options.clone(),
        session: first_session.clone(),
        downloader: Arc::new(FakeDownloader::new()),
        credentials: password_credentials(),
    };
    workflows::download_class(&first, "ml-005").await.unwrap();
    assert_eq!(
        fs::read_to_string(&cache).unwrap(),
        fs::read_to_string("tests/fixtures/syllabus_response.json").unwrap()
    );

    // 第二次运行的会话中没有大纲页面，只能读取缓存
    let second_session = Arc::new(
        FakeSession::new()
            .with_fixture(video_url(&config, "v1"), "video_v1.json")
            .with_fixture(video_url(&config, "v2"), "video_v2.json")
            .with_fixture(video_url(&config, "v3"), "video_v3.json"),
    );
    let second = DownloadJobContext {
        session: second_session.clone(),
        ..first
    };
    let report = workflows::download_class(&second, "ml-005").await.unwrap();

    let syllabus = syllabus_url(&config, "ml-005");
    assert!(!second_session.requests.lock().unwrap().contains(&syllabus));
    assert_eq!(report.stats.skipped_existing, 5);
}
