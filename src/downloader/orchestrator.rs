// src/downloader/orchestrator.rs

use super::{
    Downloader,
    naming::{PathNamer, effective_titles},
    post_process,
    selector::ResourceSelector,
};
use crate::{
    completion::{self, ActivityTracker},
    config::DownloadOptions,
    error::*,
    models::{
        Course, CourseReport, DownloadStats, DownloadTarget, EventLog, Lecture, RunEvent,
        Section, TargetOutcome,
    },
    symbols, ui, utils,
};
use chrono::Utc;
use log::{debug, info};
use std::{
    collections::HashSet,
    fs::{self, File},
    path::{Path, PathBuf},
};

/// 按顺序遍历课程树，把选中的资源写入本地目录
pub struct CourseDownloader<'a> {
    options: &'a DownloadOptions,
    downloader: &'a dyn Downloader,
}

/// 一次课程下载过程中的可变状态
struct RunState {
    tracker: ActivityTracker,
    stats: DownloadStats,
    events: EventLog,
}

impl<'a> CourseDownloader<'a> {
    pub fn new(options: &'a DownloadOptions, downloader: &'a dyn Downloader) -> Self {
        Self {
            options,
            downloader,
        }
    }

    /// 下载整个课程。任何资源写入失败都会中止本课程并向上返回错误。
    pub async fn download(&self, course: &Course, events: EventLog) -> AppResult<CourseReport> {
        let namer = PathNamer::new(self.options.naming, self.options.verbose_dirs, &course.id);
        let course_root = self.options.output.join(utils::sanitize_filename(&course.id));
        let mut state = RunState {
            tracker: ActivityTracker::new(),
            stats: DownloadStats::default(),
            events,
        };

        for (module_idx, module) in course.modules.iter().enumerate() {
            let module_dir = course_root.join(namer.module_dir(module_idx + 1, &module.slug));
            for (section_idx, section) in module.sections.iter().enumerate() {
                if !self.options.section_filter.matches(&section.slug) {
                    state.stats.sections_skipped += 1;
                    state.events.record(RunEvent::SectionFiltered {
                        section: section.slug.clone(),
                    });
                    continue;
                }
                let section_dir =
                    module_dir.join(namer.section_dir(section_idx + 1, &section.slug));
                ui::print_sub_header(&format!("{}/{}", module.slug, section.slug));
                self.download_section(&namer, section_idx + 1, section, &section_dir, &mut state)
                    .await?;
                self.finish_section(&section_dir, &mut state).await?;
                state.stats.sections_processed += 1;
            }
        }

        let last_activity = state.tracker.latest();
        let completion = completion::estimate(Utc::now(), last_activity);
        info!(
            "课程 '{}' 处理完毕: 写入 {} 个文件，跳过 {} 个已存在的文件，完结状态 {:?}",
            course.id,
            state.stats.writes(),
            state.stats.skipped_existing,
            completion
        );
        Ok(CourseReport {
            course: course.id.clone(),
            completion,
            last_activity,
            stats: state.stats,
            events: state.events.into_events(),
        })
    }

    async fn download_section(
        &self,
        namer: &PathNamer,
        section_ordinal: usize,
        section: &Section,
        section_dir: &Path,
        state: &mut RunState,
    ) -> AppResult<()> {
        for (lecture_idx, lecture) in section.lectures.iter().enumerate() {
            if !self.options.lecture_filter.matches(&lecture.slug) {
                state.stats.lectures_skipped += 1;
                state.events.record(RunEvent::LectureFiltered {
                    lecture: lecture.slug.clone(),
                });
                continue;
            }
            let targets = self.plan_lecture(
                namer,
                section_ordinal,
                lecture_idx + 1,
                lecture,
                section_dir,
                &mut state.events,
            );
            for target in &targets {
                let outcome = self.materialize(target, section_dir, state).await?;
                state.stats.record(outcome);
            }
        }
        Ok(())
    }

    /// 选择资源并确定每个资源的本地路径。
    ///
    /// 标题与扩展名完全相同的资源只保留第一个；不同标题在清理非法字符后
    /// 撞上同一路径时，按选择顺序追加 `_2`、`_3` 后缀。
    fn plan_lecture(
        &self,
        namer: &PathNamer,
        section_ordinal: usize,
        lecture_ordinal: usize,
        lecture: &Lecture,
        section_dir: &Path,
        events: &mut EventLog,
    ) -> Vec<DownloadTarget> {
        let selector = ResourceSelector {
            formats: &self.options.formats,
            ignored: &self.options.ignored_formats,
            title_filter: &self.options.resource_filter,
        };
        let selected = selector.select(&lecture.resources);
        let titles = effective_titles(&selected);

        let mut identities: HashSet<(String, &str)> = HashSet::new();
        let mut paths: HashSet<PathBuf> = HashSet::new();
        let mut targets = Vec::with_capacity(selected.len());
        for (resource, title) in selected.into_iter().zip(titles) {
            let extension = resource.key.extension();
            let name_for = |title: &str| {
                section_dir.join(namer.file_name(
                    section_ordinal,
                    lecture_ordinal,
                    &lecture.slug,
                    title,
                    extension,
                ))
            };
            let mut path = name_for(&title);
            if !identities.insert((title.clone(), extension)) {
                events.record(RunEvent::DuplicateTarget { path });
                continue;
            }
            let mut suffix = 2;
            while paths.contains(&path) {
                let renamed = if title.is_empty() {
                    suffix.to_string()
                } else {
                    format!("{}_{}", title, suffix)
                };
                path = name_for(&renamed);
                suffix += 1;
            }
            if suffix > 2 {
                debug!("讲座 '{}' 中标题 '{}' 的文件名冲突，改用 {:?}", lecture.slug, title, path);
            }
            paths.insert(path.clone());
            targets.push(DownloadTarget {
                path,
                url: resource.url,
                key: resource.key,
            });
        }
        debug!("讲座 '{}' 共有 {} 个下载目标", lecture.slug, targets.len());
        targets
    }

    async fn materialize(
        &self,
        target: &DownloadTarget,
        section_dir: &Path,
        state: &mut RunState,
    ) -> AppResult<TargetOutcome> {
        let exists = target.path.exists();
        if exists && !self.options.overwrite && !self.options.resume {
            // 早已下载完成的文件也参与完结判断
            let modified = fs::metadata(&target.path)?.modified()?;
            state.tracker.observe_system_time(modified);
            ui::plain(&format!("  {} {} (已存在)", *symbols::SKIP, file_label(&target.path)));
            state.events.record(RunEvent::TargetExists {
                path: target.path.clone(),
            });
            return Ok(TargetOutcome::SkippedExisting);
        }

        fs::create_dir_all(section_dir)?;
        let outcome = if self.options.skip_download {
            File::create(&target.path)?;
            TargetOutcome::TouchedOnly
        } else {
            info!("下载 [{}] {} -> {:?}", target.key, target.url, target.path);
            self.downloader
                .fetch(&target.url, &target.path, self.options.resume)
                .await?;
            TargetOutcome::Written
        };
        state.tracker.observe(Utc::now());
        ui::plain(&format!("  {} {}", *symbols::OK, file_label(&target.path)));
        state.events.record(RunEvent::TargetWritten {
            path: target.path.clone(),
            outcome,
        });
        Ok(outcome)
    }

    /// 章节处理完成后生成播放列表并运行钩子；目录不存在时什么也不做
    async fn finish_section(&self, section_dir: &Path, state: &mut RunState) -> AppResult<()> {
        if !section_dir.is_dir() {
            debug!("章节目录 {:?} 不存在，跳过后处理", section_dir);
            return Ok(());
        }
        if self.options.playlist {
            for (path, entries) in post_process::write_playlists(section_dir)? {
                state.events.record(RunEvent::PlaylistWritten { path, entries });
            }
        }
        if !self.options.hooks.is_empty() {
            post_process::run_hooks(&self.options.hooks, section_dir, &mut state.events).await;
        }
        Ok(())
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
