// src/downloader/naming.rs

use crate::{models::SelectedResource, utils};
use std::collections::{BTreeSet, HashMap};

/// 文件命名方案
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingScheme {
    /// `03_intro.mp4`
    #[default]
    Default,
    /// `02_03_intro.mp4`，同时包含章节序号
    Combined,
}

/// 根据树中的位置生成目录名与文件名。输出只取决于传入的参数。
#[derive(Debug, Clone)]
pub struct PathNamer {
    scheme: NamingScheme,
    prefix: Option<String>,
}

impl PathNamer {
    pub fn new(scheme: NamingScheme, verbose_dirs: bool, course_id: &str) -> Self {
        Self {
            scheme,
            prefix: verbose_dirs.then(|| course_id.to_uppercase()),
        }
    }

    pub fn module_dir(&self, ordinal: usize, slug: &str) -> String {
        utils::sanitize_filename(&format!("{:02}_{}", ordinal, slug))
    }

    pub fn section_dir(&self, ordinal: usize, slug: &str) -> String {
        let name = match &self.prefix {
            Some(prefix) => format!("{}_{:02}_{}", prefix, ordinal, slug),
            None => format!("{:02}_{}", ordinal, slug),
        };
        utils::sanitize_filename(&name)
    }

    /// 序号从 1 开始；`title` 为空时不加后缀
    pub fn file_name(
        &self,
        section_ordinal: usize,
        lecture_ordinal: usize,
        lecture_slug: &str,
        title: &str,
        extension: &str,
    ) -> String {
        let mut stem = match self.scheme {
            NamingScheme::Default => format!("{:02}_{}", lecture_ordinal, lecture_slug),
            NamingScheme::Combined => format!(
                "{:02}_{:02}_{}",
                section_ordinal, lecture_ordinal, lecture_slug
            ),
        };
        if !title.is_empty() {
            stem.push('_');
            stem.push_str(title);
        }
        format!("{}.{}", utils::sanitize_filename(&stem), extension)
    }
}

/// 计算每个资源在文件名中使用的标题。
///
/// 同一讲座中若有多种语言共用一个扩展名 (例如 `en.srt` 与 `de.srt`)，
/// 语言代码会并入标题：`03_intro_en.srt`、`03_intro_de.srt`。
/// 只有一种语言时保持 `03_intro.srt`。
pub fn effective_titles(selected: &[SelectedResource]) -> Vec<String> {
    let mut languages: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for resource in selected {
        if let Some(lang) = resource.key.language() {
            languages
                .entry(resource.key.extension())
                .or_default()
                .insert(lang);
        }
    }

    selected
        .iter()
        .map(|resource| {
            let ambiguous = languages
                .get(resource.key.extension())
                .is_some_and(|langs| langs.len() > 1);
            match resource.key.language() {
                Some(lang) if ambiguous && resource.title.is_empty() => lang.to_string(),
                Some(lang) if ambiguous => format!("{}_{}", resource.title, lang),
                _ => resource.title.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResourceKey;

    fn selected(key: ResourceKey, title: &str) -> SelectedResource {
        SelectedResource {
            key,
            url: "http://x/a".to_string(),
            title: title.to_string(),
        }
    }

    #[test]
    fn test_default_scheme_names() {
        let namer = PathNamer::new(NamingScheme::Default, false, "ml-005");
        assert_eq!(namer.file_name(2, 3, "intro", "", "mp4"), "03_intro.mp4");
        assert_eq!(namer.file_name(2, 3, "intro", "", "srt"), "03_intro.srt");
        assert_eq!(namer.file_name(2, 3, "intro", "slides", "txt"), "03_intro_slides.txt");
    }

    #[test]
    fn test_combined_scheme_names() {
        let namer = PathNamer::new(NamingScheme::Combined, false, "ml-005");
        assert_eq!(namer.file_name(2, 3, "intro", "", "mp4"), "02_03_intro.mp4");
        assert_eq!(
            namer.file_name(12, 1, "intro", "notes", "txt"),
            "12_01_intro_notes.txt"
        );
    }

    #[test]
    fn test_directory_names() {
        let plain = PathNamer::new(NamingScheme::Default, false, "ml-005");
        assert_eq!(plain.module_dir(1, "week-1"), "01_week-1");
        assert_eq!(plain.section_dir(4, "linear-regression"), "04_linear-regression");

        let verbose = PathNamer::new(NamingScheme::Default, true, "ml-005");
        assert_eq!(
            verbose.section_dir(4, "linear-regression"),
            "ML-005_04_linear-regression"
        );
    }

    #[test]
    fn test_names_are_independent_of_call_order() {
        let namer = PathNamer::new(NamingScheme::Default, false, "c");
        let first = namer.file_name(1, 5, "a", "t", "mp4");
        let _ = namer.file_name(9, 9, "zzz", "", "srt");
        assert_eq!(namer.file_name(1, 5, "a", "t", "mp4"), first);
    }

    #[test]
    fn test_effective_titles_fold_language_only_on_conflict() {
        let resources = vec![
            selected(ResourceKey::video(), ""),
            selected(ResourceKey::subtitle("en"), ""),
            selected(ResourceKey::subtitle("de"), ""),
            selected(ResourceKey::transcript("en"), ""),
            selected(ResourceKey::transcript("en"), "notes"),
        ];
        assert_eq!(
            effective_titles(&resources),
            vec!["", "en", "de", "", "notes"]
        );

        let titled = vec![
            selected(ResourceKey::subtitle("en"), "part1"),
            selected(ResourceKey::subtitle("fr"), "part1"),
        ];
        assert_eq!(effective_titles(&titled), vec!["part1_en", "part1_fr"]);
    }
}
