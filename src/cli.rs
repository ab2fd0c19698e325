// src/cli.rs

use crate::constants;
use clap::{Parser, ValueEnum, command, crate_version};
use std::path::PathBuf;

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// 可选的下载后端
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum DownloaderKind {
    /// 内置下载器 (支持断点续传)
    #[default]
    Native,
    Wget,
    Curl,
    Aria2,
    Axel,
}

#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    arg_required_else_help = true,
    disable_help_flag = true,
    disable_version_flag = true,
)]
pub struct Cli {
    /// 要下载的课程名 (例如 "machine-learning")，可指定多个
    #[arg(value_name = "CLASS_NAMES", required = true, num_args = 1..)]
    pub class_names: Vec<String>,

    // --- 登录 (Authentication) ---
    /// 平台用户名 (邮箱)
    #[arg(short, long, help_heading = "Authentication")]
    pub username: Option<String>,
    /// 平台密码 (省略时将在终端提示输入)
    #[arg(short, long, help_heading = "Authentication")]
    pub password: Option<String>,
    /// 使用浏览器导出的 cookies.txt 登录
    #[arg(short, long, value_name = "FILE", help_heading = "Authentication")]
    pub cookies_file: Option<PathBuf>,

    // --- 资源选择 (Selection) ---
    /// 要下载的文件格式，空格或逗号分隔，例如 "mp4 srt"；'all' 表示全部
    #[arg(short, long, default_value_t = constants::DEFAULT_FORMATS.to_string(), help_heading = "Selection")]
    pub formats: String,
    /// 要忽略的文件格式，空格或逗号分隔
    #[arg(long, value_name = "FORMATS", help_heading = "Selection")]
    pub ignore_formats: Option<String>,
    /// 只下载名称匹配该正则的章节
    #[arg(long, value_name = "REGEX", help_heading = "Selection")]
    pub section_filter: Option<String>,
    /// 只下载名称匹配该正则的讲座
    #[arg(long, value_name = "REGEX", help_heading = "Selection")]
    pub lecture_filter: Option<String>,
    /// 只下载标题匹配该正则的资源
    #[arg(long, value_name = "REGEX", help_heading = "Selection")]
    pub resource_filter: Option<String>,
    /// 视频清晰度，例如 '360p'、'540p'、'720p'；不可用时回退到最高清晰度
    #[arg(short = 'q', long, default_value_t = constants::DEFAULT_VIDEO_RESOLUTION.to_string(), help_heading = "Selection")]
    pub video_resolution: String,
    /// 字幕与文稿语言，例如 'en'、'zh-CN'；'all' 表示全部语言
    #[arg(long, default_value_t = constants::DEFAULT_SUBTITLE_LANGUAGE.to_string(), help_heading = "Selection")]
    pub subtitle_language: String,

    // --- 下载选项 (Options) ---
    /// 设置文件保存目录
    #[arg(short, long, value_name = "DIR", default_value_os_t = PathBuf::from(constants::DEFAULT_SAVE_DIR), help_heading = "Options")]
    pub output: PathBuf,
    /// 覆盖已存在的文件
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub overwrite: bool,
    /// 续传未完成的下载
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub resume: bool,
    /// 在章节目录名前加上课程名
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub verbose_dirs: bool,
    /// 以倒序处理模块
    #[arg(short, long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub reverse: bool,
    /// 文件名同时包含章节序号与讲座序号
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub combined_section_lectures_nums: bool,
    /// 为每个章节目录生成 M3U 播放列表
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub playlist: bool,
    /// 每个章节处理完成后运行的命令 (可重复指定)
    #[arg(long = "hook", value_name = "COMMAND", help_heading = "Options")]
    pub hooks: Vec<String>,
    /// 选择下载后端
    #[arg(long, value_enum, default_value_t = DownloaderKind::Native, help_heading = "Options")]
    pub downloader: DownloaderKind,
    /// 外部下载工具的可执行文件路径
    #[arg(long, value_name = "BIN", help_heading = "Options")]
    pub downloader_path: Option<String>,

    // --- 调试 (Debug) ---
    /// 不下载文件，只创建空的占位文件
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Debug")]
    pub skip_download: bool,
    /// 使用本地缓存的课程大纲页面；不存在时下载并保存
    #[arg(short = 'l', long, value_name = "FILE", help_heading = "Debug")]
    pub process_local_page: Option<PathBuf>,

    // --- 通用选项 (General) ---
    /// 显示此帮助信息并退出
    #[arg(short = 'h', long, action = clap::ArgAction::Help, global = true, help_heading = "General")]
    _help: Option<bool>,
    /// 显示版本信息并退出
    #[arg(short = 'V', long, action = clap::ArgAction::Version, global = true, help_heading = "General")]
    _version: Option<bool>,
    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}
