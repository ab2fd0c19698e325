// src/models/api.rs

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

// --- 课程大纲 (Syllabus) API 响应结构体 ---

#[derive(Deserialize, Debug, Clone)]
pub struct SyllabusResponse {
    #[serde(rename = "courseMaterial")]
    pub course_material: CourseMaterial,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CourseMaterial {
    #[serde(default)]
    pub elements: Vec<ModuleElement>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ModuleElement {
    pub slug: String,
    #[serde(default)]
    pub elements: Vec<SectionElement>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SectionElement {
    pub slug: String,
    #[serde(default)]
    pub elements: Vec<LectureElement>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct LectureElement {
    pub slug: String,
    pub content: LectureContent,
}

#[derive(Deserialize, Debug, Clone)]
pub struct LectureContent {
    #[serde(rename = "typeName")]
    pub type_name: String,
    /// 不同类型的条目结构差异很大，只在需要时读取
    #[serde(default)]
    pub definition: Value,
}

impl LectureContent {
    pub fn video_id(&self) -> Option<&str> {
        self.definition.get("videoId").and_then(Value::as_str)
    }
}

// --- 视频元数据 (Video) API 响应结构体 ---

#[derive(Deserialize, Debug, Clone)]
pub struct VideoMetadataResponse {
    #[serde(default)]
    pub sources: Vec<VideoSource>,
    /// 语言代码 -> 地址，保持文档中的顺序
    pub subtitles: Option<Map<String, Value>>,
    #[serde(rename = "subtitlesTxt")]
    pub subtitles_txt: Option<Map<String, Value>>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct VideoSource {
    pub resolution: String,
    #[serde(rename = "formatSources", default)]
    pub format_sources: HashMap<String, String>,
}
