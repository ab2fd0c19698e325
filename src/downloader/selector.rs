// src/downloader/selector.rs

use crate::{
    config::parse_format_list,
    error::*,
    filter::TextFilter,
    models::{ResourceMap, SelectedResource},
};
use log::debug;
use std::{collections::BTreeSet, str::FromStr};

/// 接受的文件格式：全部，或一组扩展名
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSelection {
    All,
    Only(BTreeSet<String>),
}

impl FormatSelection {
    pub fn accepts(&self, extension: &str) -> bool {
        match self {
            FormatSelection::All => true,
            FormatSelection::Only(formats) => formats.contains(extension),
        }
    }
}

impl FromStr for FormatSelection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let formats = parse_format_list(s);
        if formats.is_empty() {
            return Err(AppError::UserInputError("文件格式列表不能为空".to_string()));
        }
        if formats.contains("all") {
            Ok(FormatSelection::All)
        } else {
            Ok(FormatSelection::Only(formats))
        }
    }
}

/// 按格式与标题过滤讲座的资源
pub struct ResourceSelector<'a> {
    pub formats: &'a FormatSelection,
    pub ignored: &'a BTreeSet<String>,
    pub title_filter: &'a TextFilter,
}

impl ResourceSelector<'_> {
    pub fn includes_extension(&self, extension: &str) -> bool {
        !self.ignored.contains(extension) && self.formats.accepts(extension)
    }

    /// 结果保持资源映射的插入顺序
    pub fn select(&self, resources: &ResourceMap) -> Vec<SelectedResource> {
        let mut selected = Vec::new();
        for (key, entries) in resources.iter() {
            if !self.includes_extension(key.extension()) {
                debug!("格式 '{}' 未被选中", key);
                continue;
            }
            for resource in entries {
                if !resource.title.is_empty() && !self.title_filter.matches(&resource.title) {
                    debug!("资源标题 '{}' 未通过过滤器", resource.title);
                    continue;
                }
                selected.push(SelectedResource {
                    key: key.clone(),
                    url: resource.url.clone(),
                    title: resource.title.clone(),
                });
            }
        }
        selected
    }
}
