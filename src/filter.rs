// src/filter.rs

use crate::error::{AppError, AppResult};
use regex::Regex;

/// 预编译的正则过滤器；未设置时匹配一切。
///
/// 匹配语义是"包含"而不是"整体匹配"：`week0[1-2]` 会匹配 `week01-intro`。
#[derive(Debug, Clone, Default)]
pub struct TextFilter {
    pattern: Option<Regex>,
}

impl TextFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn new(pattern: Option<&str>) -> AppResult<Self> {
        let pattern = pattern
            .filter(|p| !p.is_empty())
            .map(|p| {
                Regex::new(p).map_err(|source| AppError::InvalidFilter {
                    pattern: p.to_string(),
                    source,
                })
            })
            .transpose()?;
        Ok(Self { pattern })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.as_ref().is_none_or(|re| re.is_match(text))
    }

    pub fn is_active(&self) -> bool {
        self.pattern.is_some()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.pattern.as_ref().map(Regex::as_str)
    }
}
