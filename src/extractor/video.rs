// src/extractor/video.rs

use crate::{
    client::Session,
    config::AppConfig,
    constants::{self, api::mime, api::templates},
    error::*,
    models::{
        EventLog, Resource, ResourceKey, ResourceKind, ResourceMap, RunEvent,
        api::{VideoMetadataResponse, VideoSource},
    },
    utils,
};
use log::{debug, info};
use serde_json::{Map, Value};
use std::str::FromStr;

/// 字幕/文稿语言选择
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubtitleLanguage {
    All,
    Code(String),
}

impl FromStr for SubtitleLanguage {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AppError::UserInputError("字幕语言不能为空".to_string()));
        }
        if s.eq_ignore_ascii_case("all") {
            Ok(SubtitleLanguage::All)
        } else {
            Ok(SubtitleLanguage::Code(s.to_string()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorPreferences {
    pub subtitle_language: SubtitleLanguage,
    pub resolution: String,
}

/// 把讲座中的视频 ID 解析为具体的视频、字幕与文稿地址
pub struct VideoLocator<'a> {
    session: &'a dyn Session,
    config: &'a AppConfig,
}

impl<'a> VideoLocator<'a> {
    pub fn new(session: &'a dyn Session, config: &'a AppConfig) -> Self {
        Self { session, config }
    }

    /// 网络错误原样向上传递；元数据格式错误返回 `ResourceResolution`
    pub async fn locate(
        &self,
        video_id: &str,
        prefs: &LocatorPreferences,
        events: &mut EventLog,
    ) -> AppResult<ResourceMap> {
        let url = utils::fill_template(
            self.config.template(templates::VIDEO_METADATA)?,
            &[("video_id", video_id)],
        );
        let page = self.session.get_text(&url).await?;
        debug!("解析视频 <{}> 的元数据", video_id);
        resolve_video_metadata(
            video_id,
            &page,
            prefs,
            self.config.template(templates::SITE_ROOT)?,
            events,
        )
    }
}

fn resolution_value(label: &str) -> u32 {
    label
        .trim_end_matches(|c: char| !c.is_ascii_digit())
        .parse()
        .unwrap_or(0)
}

/// 从元数据文档中挑选视频清晰度与字幕语言
pub fn resolve_video_metadata(
    video_id: &str,
    page: &str,
    prefs: &LocatorPreferences,
    site_root: &str,
    events: &mut EventLog,
) -> AppResult<ResourceMap> {
    let resolution_error = |reason: String| AppError::ResourceResolution {
        video_id: video_id.to_string(),
        reason,
    };
    let dom: VideoMetadataResponse =
        serde_json::from_str(page).map_err(|e| resolution_error(format!("元数据格式错误: {}", e)))?;

    let mut sources: Vec<&VideoSource> = dom.sources.iter().collect();
    // 清晰度从高到低；数值相同时按标签排序，保证结果稳定
    sources.sort_by(|a, b| {
        resolution_value(&b.resolution)
            .cmp(&resolution_value(&a.resolution))
            .then_with(|| b.resolution.cmp(&a.resolution))
    });
    let best = *sources
        .first()
        .ok_or_else(|| resolution_error("没有任何可用的视频清晰度".to_string()))?;

    let chosen = match sources.iter().find(|s| s.resolution == prefs.resolution) {
        Some(source) => {
            info!("视频 <{}> 使用清晰度 {}", video_id, prefs.resolution);
            *source
        }
        None => {
            events.record(RunEvent::ResolutionFallback {
                video_id: video_id.to_string(),
                requested: prefs.resolution.clone(),
                chosen: best.resolution.clone(),
            });
            best
        }
    };
    let video_url = chosen
        .format_sources
        .get(mime::MP4)
        .ok_or_else(|| resolution_error(format!("清晰度 {} 没有 mp4 地址", chosen.resolution)))?;

    let mut resources = ResourceMap::new();
    resources.insert(ResourceKey::video(), Resource::untitled(video_url.clone()));

    for (kind, tracks) in [
        (ResourceKind::Subtitle, &dom.subtitles),
        (ResourceKind::Transcript, &dom.subtitles_txt),
    ] {
        let Some(tracks) = tracks else {
            debug!("视频 <{}> 没有{}", video_id, kind.description());
            continue;
        };
        for (language, url) in select_tracks(video_id, kind, tracks, &prefs.subtitle_language, events)
        {
            let url = utils::make_absolute_url(site_root, url)
                .map_err(|e| resolution_error(format!("{}地址无效 '{}': {}", kind.description(), url, e)))?;
            resources.insert(ResourceKey::with_language(kind, language), Resource::untitled(url));
        }
    }

    Ok(resources)
}

fn select_tracks<'t>(
    video_id: &str,
    kind: ResourceKind,
    tracks: &'t Map<String, Value>,
    wanted: &SubtitleLanguage,
    events: &mut EventLog,
) -> Vec<(&'t str, &'t str)> {
    match wanted {
        SubtitleLanguage::All => tracks
            .iter()
            .filter_map(|(l, u)| Some((l.as_str(), u.as_str()?)))
            .collect(),
        SubtitleLanguage::Code(code) => {
            if let Some((lang, url)) = tracks.iter().find(|(lang, _)| *lang == code) {
                return url.as_str().map(|url| vec![(lang.as_str(), url)]).unwrap_or_default();
            }
            let fallback = constants::FALLBACK_SUBTITLE_LANGUAGE;
            if code != fallback {
                events.record(RunEvent::LanguageFallback {
                    video_id: video_id.to_string(),
                    kind,
                    requested: code.clone(),
                });
            }
            tracks
                .get(fallback)
                .and_then(Value::as_str)
                .map(|url| vec![(fallback, url)])
                .unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_value() {
        assert_eq!(resolution_value("720p"), 720);
        assert_eq!(resolution_value("1080"), 1080);
        assert_eq!(resolution_value("hd"), 0);
    }

    #[test]
    fn test_subtitle_language_parse() {
        assert_eq!("all".parse::<SubtitleLanguage>().unwrap(), SubtitleLanguage::All);
        assert_eq!("ALL".parse::<SubtitleLanguage>().unwrap(), SubtitleLanguage::All);
        assert_eq!(
            "zh-CN".parse::<SubtitleLanguage>().unwrap(),
            SubtitleLanguage::Code("zh-CN".into())
        );
        assert!("".parse::<SubtitleLanguage>().is_err());
    }
}
