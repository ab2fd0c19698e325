// src/models/mod.rs

pub mod api;

use crate::{completion::CompletionState, error::AppError};
use chrono::{DateTime, Utc};
use std::{fmt, path::PathBuf, str::FromStr};

/// 资源种类，决定了文件的扩展名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Video,
    Subtitle,
    Transcript,
}

impl ResourceKind {
    pub fn extension(self) -> &'static str {
        match self {
            ResourceKind::Video => "mp4",
            ResourceKind::Subtitle => "srt",
            ResourceKind::Transcript => "txt",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ResourceKind::Video => "视频",
            ResourceKind::Subtitle => "字幕",
            ResourceKind::Transcript => "文稿",
        }
    }
}

/// 资源格式键，例如 `mp4`、`en.srt`、`zh-CN.txt`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    kind: ResourceKind,
    language: Option<String>,
}

impl ResourceKey {
    pub fn video() -> Self {
        Self {
            kind: ResourceKind::Video,
            language: None,
        }
    }

    pub fn subtitle(language: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::Subtitle,
            language: Some(language.into()),
        }
    }

    pub fn transcript(language: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::Transcript,
            language: Some(language.into()),
        }
    }

    pub fn with_language(kind: ResourceKind, language: impl Into<String>) -> Self {
        match kind {
            ResourceKind::Video => Self::video(),
            _ => Self {
                kind,
                language: Some(language.into()),
            },
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// 去掉语言前缀后的规范扩展名：`en.srt` -> `srt`
    pub fn extension(&self) -> &'static str {
        self.kind.extension()
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.language {
            Some(lang) => write!(f, "{}.{}", lang, self.extension()),
            None => f.write_str(self.extension()),
        }
    }
}

impl FromStr for ResourceKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (language, ext) = match s.rsplit_once('.') {
            Some((lang, ext)) if !lang.is_empty() => (Some(lang), ext),
            _ => (None, s),
        };
        let kind = match ext {
            "mp4" => ResourceKind::Video,
            "srt" => ResourceKind::Subtitle,
            "txt" => ResourceKind::Transcript,
            _ => {
                return Err(AppError::UserInputError(format!(
                    "未知的资源格式 '{}'",
                    s
                )));
            }
        };
        match (kind, language) {
            (ResourceKind::Video, None) => Ok(Self::video()),
            (ResourceKind::Video, Some(_)) | (_, None) => Err(AppError::UserInputError(format!(
                "资源格式 '{}' 的语言前缀不合法",
                s
            ))),
            (kind, Some(lang)) => Ok(Self::with_language(kind, lang)),
        }
    }
}

/// 一个可下载的资源地址；`title` 为空表示没有标题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub url: String,
    pub title: String,
}

impl Resource {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }

    pub fn untitled(url: impl Into<String>) -> Self {
        Self::new(url, "")
    }
}

/// 按插入顺序保存的 资源格式键 -> 资源列表 映射。
/// 顺序会影响文件命名，因此不能换成哈希表。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceMap {
    entries: Vec<(ResourceKey, Vec<Resource>)>,
}

impl ResourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: ResourceKey, resource: Resource) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, resources)) => resources.push(resource),
            None => self.entries.push((key, vec![resource])),
        }
    }

    pub fn get(&self, key: &ResourceKey) -> Option<&[Resource]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, r)| r.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceKey, &[Resource])> {
        self.entries.iter().map(|(k, r)| (k, r.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &ResourceKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(ResourceKey, Resource)> for ResourceMap {
    fn from_iter<I: IntoIterator<Item = (ResourceKey, Resource)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, resource) in iter {
            map.insert(key, resource);
        }
        map
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lecture {
    pub slug: String,
    pub resources: ResourceMap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub slug: String,
    pub lectures: Vec<Lecture>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub slug: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: String,
    pub modules: Vec<Module>,
}

/// 经过格式与标题过滤后的单个资源
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedResource {
    pub key: ResourceKey,
    pub url: String,
    pub title: String,
}

/// 已确定本地路径的下载目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub path: PathBuf,
    pub url: String,
    pub key: ResourceKey,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TargetOutcome {
    /// 文件已存在，未写入
    SkippedExisting,
    /// 通过下载器写入
    Written,
    /// 占位模式下只创建了空文件
    TouchedOnly,
}

/// 一次课程下载过程中值得告知用户的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    ResolutionFallback {
        video_id: String,
        requested: String,
        chosen: String,
    },
    LanguageFallback {
        video_id: String,
        kind: ResourceKind,
        requested: String,
    },
    LectureUnresolved {
        lecture: String,
        reason: String,
    },
    SectionFiltered {
        section: String,
    },
    LectureFiltered {
        lecture: String,
    },
    TargetWritten {
        path: PathBuf,
        outcome: TargetOutcome,
    },
    TargetExists {
        path: PathBuf,
    },
    DuplicateTarget {
        path: PathBuf,
    },
    PlaylistWritten {
        path: PathBuf,
        entries: usize,
    },
    HookFinished {
        hook: String,
        dir: PathBuf,
    },
    HookFailed {
        hook: String,
        dir: PathBuf,
        reason: String,
    },
}

impl RunEvent {
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            RunEvent::ResolutionFallback { .. }
                | RunEvent::LanguageFallback { .. }
                | RunEvent::LectureUnresolved { .. }
                | RunEvent::DuplicateTarget { .. }
                | RunEvent::HookFailed { .. }
        )
    }
}

impl fmt::Display for RunEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunEvent::ResolutionFallback { video_id, requested, chosen } => write!(
                f,
                "视频 <{}> 没有 {} 清晰度，改为下载最高清晰度 {}",
                video_id, requested, chosen
            ),
            RunEvent::LanguageFallback { video_id, kind, requested } => write!(
                f,
                "视频 <{}> 没有 '{}' 语言的{}，改用 'en'",
                video_id,
                requested,
                kind.description()
            ),
            RunEvent::LectureUnresolved { lecture, reason } => {
                write!(f, "讲座 '{}' 的资源解析失败，已跳过: {}", lecture, reason)
            }
            RunEvent::SectionFiltered { section } => write!(f, "章节 '{}' 被过滤器跳过", section),
            RunEvent::LectureFiltered { lecture } => write!(f, "讲座 '{}' 被过滤器跳过", lecture),
            RunEvent::TargetWritten { path, outcome } => match outcome {
                TargetOutcome::TouchedOnly => write!(f, "已创建占位文件: {}", path.display()),
                _ => write!(f, "已下载: {}", path.display()),
            },
            RunEvent::TargetExists { path } => write!(f, "文件已存在，跳过: {}", path.display()),
            RunEvent::DuplicateTarget { path } => {
                write!(f, "同一讲座中出现重复的目标文件，已跳过: {}", path.display())
            }
            RunEvent::PlaylistWritten { path, entries } => {
                write!(f, "已生成播放列表 {} ({} 项)", path.display(), entries)
            }
            RunEvent::HookFinished { hook, dir } => {
                write!(f, "已在 {} 中运行钩子 '{}'", dir.display(), hook)
            }
            RunEvent::HookFailed { hook, dir, reason } => write!(
                f,
                "钩子 '{}' 在 {} 中运行失败: {}",
                hook,
                dir.display(),
                reason
            ),
        }
    }
}

/// 事件记录器：同时写入日志与事件列表
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<RunEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: RunEvent) {
        if event.is_warning() {
            log::warn!("{}", event);
        } else {
            log::info!("{}", event);
        }
        self.events.push(event);
    }

    pub fn events(&self) -> &[RunEvent] {
        &self.events
    }

    pub fn warnings(&self) -> impl Iterator<Item = &RunEvent> {
        self.events.iter().filter(|e| e.is_warning())
    }

    pub fn into_events(self) -> Vec<RunEvent> {
        self.events
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadStats {
    pub sections_processed: usize,
    pub sections_skipped: usize,
    pub lectures_skipped: usize,
    pub written: usize,
    pub touched: usize,
    pub skipped_existing: usize,
}

impl DownloadStats {
    pub fn record(&mut self, outcome: TargetOutcome) {
        match outcome {
            TargetOutcome::Written => self.written += 1,
            TargetOutcome::TouchedOnly => self.touched += 1,
            TargetOutcome::SkippedExisting => self.skipped_existing += 1,
        }
    }

    pub fn writes(&self) -> usize {
        self.written + self.touched
    }
}

/// 单个课程的下载结果
#[derive(Debug, Clone)]
pub struct CourseReport {
    pub course: String,
    pub completion: CompletionState,
    pub last_activity: Option<DateTime<Utc>>,
    pub stats: DownloadStats,
    pub events: Vec<RunEvent>,
}

impl CourseReport {
    pub fn is_complete(&self) -> bool {
        self.completion == CompletionState::Complete
    }

    pub fn warnings(&self) -> impl Iterator<Item = &RunEvent> {
        self.events.iter().filter(|e| e.is_warning())
    }
}
