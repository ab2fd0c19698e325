// src/main.rs

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use coursera_dl::{cli::Cli, logger, run_from_cli};
use std::{env, sync::Arc, time::Duration};

#[tokio::main]
async fn main() {
    // 为 Windows 终端启用 ANSI 颜色支持。
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n{} 用户强制中断程序。", "[!]".yellow());
            tokio::time::sleep(Duration::from_millis(100)).await;
            std::process::exit(130);
        }
    });

    let bin_name = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| "coursera-dl".to_string());

    let after_help = format!(
        "示例:\n  # 使用用户名登录并下载课程的视频与英文字幕\n  {bin} -u me@example.com -f \"mp4 srt\" --subtitle-language en machine-learning\n\n  # 使用浏览器导出的 cookies 文件，只下载前两周\n  {bin} -c cookies.txt --section-filter \"week0[1-2]\" ml-005\n\n  # 下载完每个章节后生成播放列表并运行命令\n  {bin} --playlist --hook \"ls -l\" algo-001",
        bin = bin_name
    );

    let cmd = Cli::command().after_help(after_help);
    let args = match Cli::from_arg_matches(&cmd.get_matches()) {
        Ok(args) => Arc::new(args),
        Err(e) => e.exit(),
    };

    logger::init_logger(args.log_level);

    if let Err(e) = run_from_cli(args).await {
        log::error!("程序执行出错: {}", e);
        eprintln!("\n{} {}", "[X]".red(), format!("程序执行出错: {}", e).red());
        std::process::exit(1);
    }
}
