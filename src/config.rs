// src/config.rs

pub mod credentials;

use crate::{
    cli::{Cli, DownloaderKind},
    constants::{self, api::templates},
    downloader::{naming::NamingScheme, selector::FormatSelection},
    error::{AppError, AppResult},
    extractor::video::{LocatorPreferences, SubtitleLanguage},
    filter::TextFilter,
};
use anyhow::{Context, anyhow};
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeSet, HashMap},
    fs,
    path::PathBuf,
    time::Duration,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

/// `~/.coursera-dl/config.json` 的内容
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default = "default_url_templates")]
    pub url_templates: HashMap<String, String>,
}

fn default_url_templates() -> HashMap<String, String> {
    HashMap::from([
        (
            templates::COURSE_MATERIALS.into(),
            "https://api.coursera.org/api/opencourse.v1/course/{class_name}?showLockedItems=true"
                .into(),
        ),
        (
            templates::VIDEO_METADATA.into(),
            "https://api.coursera.org/api/opencourse.v1/video/{video_id}".into(),
        ),
        (
            templates::LOGIN.into(),
            "https://api.coursera.org/api/login/v3".into(),
        ),
        (templates::SITE_ROOT.into(), "https://www.coursera.org".into()),
    ])
}

impl Default for ExternalConfig {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            network: NetworkConfig {
                connect_timeout_secs: Some(10),
                timeout_secs: Some(60),
                max_retries: Some(3),
            },
            url_templates: default_url_templates(),
        }
    }
}

fn get_config_path() -> AppResult<PathBuf> {
    let path = dirs::home_dir()
        .ok_or_else(|| AppError::Other(anyhow!("无法获取用户主目录")))?
        .join(constants::CONFIG_DIR_NAME)
        .join(constants::CONFIG_FILE_NAME);
    Ok(path)
}

pub fn load_or_create_external_config() -> AppResult<ExternalConfig> {
    let config_path = get_config_path()?;
    if config_path.is_file() {
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("读取配置文件 '{}' 失败", config_path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件 '{}' 失败", config_path.display()))
            .map_err(AppError::from)
    } else {
        info!("配置文件 {:?} 不存在，将创建默认配置。", config_path);
        let config = ExternalConfig::default();

        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json_content = serde_json::to_string_pretty(&config)?;
        fs::write(&config_path, json_content)?;

        Ok(config)
    }
}

/// 网络层与 API 地址相关的配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_retries: u32,
    pub url_templates: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_external(external: &ExternalConfig) -> Self {
        let mut url_templates = default_url_templates();
        url_templates.extend(external.url_templates.clone());
        Self {
            user_agent: constants::USER_AGENT.into(),
            connect_timeout: Duration::from_secs(
                external.network.connect_timeout_secs.unwrap_or(10),
            ),
            timeout: Duration::from_secs(external.network.timeout_secs.unwrap_or(60)),
            max_retries: external.network.max_retries.unwrap_or(3),
            url_templates,
        }
    }

    pub fn template(&self, key: &str) -> AppResult<&str> {
        self.url_templates
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| AppError::MissingTemplate(key.to_string()))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_external(&ExternalConfig::default())
    }
}

/// 单次课程下载的全部用户选项
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub output: PathBuf,
    pub formats: FormatSelection,
    pub ignored_formats: BTreeSet<String>,
    pub section_filter: TextFilter,
    pub lecture_filter: TextFilter,
    pub resource_filter: TextFilter,
    pub verbose_dirs: bool,
    pub overwrite: bool,
    pub resume: bool,
    pub skip_download: bool,
    /// 课程大纲页面的本地缓存文件
    pub local_page: Option<PathBuf>,
    pub reverse_modules: bool,
    pub naming: NamingScheme,
    pub locator: LocatorPreferences,
    pub hooks: Vec<String>,
    pub playlist: bool,
    pub downloader: DownloaderKind,
    pub downloader_path: Option<String>,
}

impl DownloadOptions {
    pub fn from_cli(args: &Cli) -> AppResult<Self> {
        Ok(Self {
            output: args.output.clone(),
            formats: args.formats.parse()?,
            ignored_formats: args
                .ignore_formats
                .as_deref()
                .map(parse_format_list)
                .unwrap_or_default(),
            section_filter: TextFilter::new(args.section_filter.as_deref())?,
            lecture_filter: TextFilter::new(args.lecture_filter.as_deref())?,
            resource_filter: TextFilter::new(args.resource_filter.as_deref())?,
            verbose_dirs: args.verbose_dirs,
            overwrite: args.overwrite,
            resume: args.resume,
            skip_download: args.skip_download,
            local_page: args.process_local_page.clone(),
            reverse_modules: args.reverse,
            naming: if args.combined_section_lectures_nums {
                NamingScheme::Combined
            } else {
                NamingScheme::Default
            },
            locator: LocatorPreferences {
                subtitle_language: args.subtitle_language.parse()?,
                resolution: args.video_resolution.clone(),
            },
            hooks: args.hooks.clone(),
            playlist: args.playlist,
            downloader: args.downloader,
            downloader_path: args.downloader_path.clone(),
        })
    }
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from(constants::DEFAULT_SAVE_DIR),
            formats: FormatSelection::All,
            ignored_formats: BTreeSet::new(),
            section_filter: TextFilter::any(),
            lecture_filter: TextFilter::any(),
            resource_filter: TextFilter::any(),
            verbose_dirs: false,
            overwrite: false,
            resume: false,
            skip_download: false,
            local_page: None,
            reverse_modules: false,
            naming: NamingScheme::Default,
            locator: LocatorPreferences {
                subtitle_language: SubtitleLanguage::All,
                resolution: constants::DEFAULT_VIDEO_RESOLUTION.to_string(),
            },
            hooks: Vec::new(),
            playlist: false,
            downloader: DownloaderKind::Native,
            downloader_path: None,
        }
    }
}

/// 解析空格或逗号分隔的格式列表，统一为小写
pub fn parse_format_list(raw: &str) -> BTreeSet<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
