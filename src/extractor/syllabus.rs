// src/extractor/syllabus.rs

use super::video::{LocatorPreferences, VideoLocator};
use crate::{
    constants::api::element_types,
    error::*,
    models::{
        Course, EventLog, Lecture, Module, ResourceMap, RunEvent, Section,
        api::{LectureElement, SyllabusResponse},
    },
};
use log::{debug, info};

/// 把课程大纲文档转换为 模块 -> 章节 -> 讲座 树，并解析每个讲座的资源。
/// 没有资源的讲座、没有讲座的章节、没有章节的模块都会被剪除。
pub struct SyllabusParser<'a> {
    locator: VideoLocator<'a>,
    preferences: &'a LocatorPreferences,
    reverse_modules: bool,
}

impl<'a> SyllabusParser<'a> {
    pub fn new(
        locator: VideoLocator<'a>,
        preferences: &'a LocatorPreferences,
        reverse_modules: bool,
    ) -> Self {
        Self {
            locator,
            preferences,
            reverse_modules,
        }
    }

    pub async fn parse(
        &self,
        course_id: &str,
        source_url: &str,
        page: &str,
        events: &mut EventLog,
    ) -> AppResult<Course> {
        let dom: SyllabusResponse =
            serde_json::from_str(page).map_err(|source| AppError::ApiParseFailed {
                url: source_url.to_string(),
                source,
            })?;
        info!("开始解析课程 '{}' 的大纲，这可能需要一些时间", course_id);

        let mut modules = Vec::new();
        for module in &dom.course_material.elements {
            let mut sections = Vec::new();
            for section in &module.elements {
                let mut lectures = Vec::new();
                for lecture in &section.elements {
                    if let Some(resources) = self.resolve_lecture(lecture, events).await? {
                        lectures.push(Lecture {
                            slug: lecture.slug.clone(),
                            resources,
                        });
                    }
                }
                if lectures.is_empty() {
                    debug!("章节 '{}' 没有可下载的讲座，已剪除", section.slug);
                } else {
                    sections.push(Section {
                        slug: section.slug.clone(),
                        lectures,
                    });
                }
            }
            if sections.is_empty() {
                debug!("模块 '{}' 没有可下载的章节，已剪除", module.slug);
            } else {
                modules.push(Module {
                    slug: module.slug.clone(),
                    sections,
                });
            }
        }

        if self.reverse_modules {
            modules.reverse();
        }
        info!("课程 '{}' 共解析出 {} 个模块", course_id, modules.len());
        Ok(Course {
            id: course_id.to_string(),
            modules,
        })
    }

    /// 非讲座条目或解析不出资源的讲座返回 `None`
    async fn resolve_lecture(
        &self,
        lecture: &LectureElement,
        events: &mut EventLog,
    ) -> AppResult<Option<ResourceMap>> {
        if lecture.content.type_name != element_types::LECTURE {
            debug!(
                "跳过非讲座条目 '{}' (类型: {})",
                lecture.slug, lecture.content.type_name
            );
            return Ok(None);
        }
        let Some(video_id) = lecture.content.video_id() else {
            events.record(RunEvent::LectureUnresolved {
                lecture: lecture.slug.clone(),
                reason: "讲座中没有视频 ID".to_string(),
            });
            return Ok(None);
        };

        match self.locator.locate(video_id, self.preferences, events).await {
            Ok(resources) if resources.is_empty() => Ok(None),
            Ok(resources) => Ok(Some(resources)),
            // 单个讲座的元数据损坏不影响整门课程
            Err(e @ AppError::ResourceResolution { .. }) => {
                events.record(RunEvent::LectureUnresolved {
                    lecture: lecture.slug.clone(),
                    reason: e.to_string(),
                });
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
