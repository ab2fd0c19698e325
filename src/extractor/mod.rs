// src/extractor/mod.rs

pub mod syllabus;
pub mod video;

pub use syllabus::SyllabusParser;
pub use video::{LocatorPreferences, SubtitleLanguage, VideoLocator};
