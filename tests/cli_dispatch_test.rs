// tests/cli_dispatch_test.rs

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

// 辅助函数，避免重复；HOME 指向临时目录，不读写真实的配置文件
fn main_command(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env("HOME", home)
        .env_remove("COURSERA_USERNAME")
        .env_remove("COURSERA_PASSWORD");
    cmd
}

#[test]
fn test_help_flag() {
    let home = tempdir().unwrap();
    main_command(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("显示此帮助信息并退出"))
        .stdout(predicate::str::contains("--section-filter"));
}

#[test]
fn test_missing_class_name_shows_usage() {
    let home = tempdir().unwrap();
    main_command(home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_filter_is_rejected() {
    let home = tempdir().unwrap();
    main_command(home.path())
        .args(["ml-005", "--lecture-filter", "("])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("无效的过滤表达式"));
}

#[test]
fn test_missing_credentials_is_reported() {
    let home = tempdir().unwrap();
    main_command(home.path())
        .arg("ml-005")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("未提供登录凭据"));
    // 首次运行时会写出默认配置
    assert!(home.path().join(".coursera-dl/config.json").is_file());
}

#[test]
fn test_missing_cookies_file_is_reported() {
    let home = tempdir().unwrap();
    main_command(home.path())
        .args(["ml-005", "-c", "no-such-cookies.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("未找到 cookies 文件"));
}

#[test]
fn test_unknown_downloader_is_rejected() {
    let home = tempdir().unwrap();
    main_command(home.path())
        .args(["ml-005", "--downloader", "ftp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--downloader"));
}
