// src/utils.rs

use crate::constants;
use regex::Regex;
use std::{ffi::OsStr, path::Path, sync::LazyLock};
use url::Url;

static ILLEGAL_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/*?:"<>|\x00-\x1f]"#).unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// 清理文件名中的非法字符。相同输入总是得到相同输出。
pub fn sanitize_filename(name: &str) -> String {
    let original_name = name.trim();
    if original_name.is_empty() {
        return "unknown".to_string();
    }

    let stem = Path::new(original_name)
        .file_stem()
        .unwrap_or_else(|| OsStr::new(original_name))
        .to_string_lossy()
        .to_uppercase();
    let windows_reserved = [
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7",
        "COM8", "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];

    let mut name = if windows_reserved.contains(&stem.as_ref()) {
        format!("_{}", original_name)
    } else {
        original_name.to_string()
    };

    name = ILLEGAL_CHARS_RE.replace_all(&name, " ").into_owned();
    name = WHITESPACE_RE.replace_all(&name, " ").trim().to_string();
    name = name.trim_matches(|c: char| c == '.' || c.is_whitespace()).to_string();
    if name.is_empty() {
        return "unnamed".to_string();
    }
    // 路径片段中不保留空格
    name = name.replace(' ', "_");

    if name.len() > constants::MAX_FILENAME_BYTES {
        name = safe_truncate_utf8(&name, constants::MAX_FILENAME_BYTES).to_string();
    }
    name
}

fn safe_truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut i = max_bytes;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    &s[..i]
}

pub fn truncate_text(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut end_pos = 0;
    for (i, c) in text.char_indices() {
        width += if c.is_ascii() { 1 } else { 2 };
        if width > max_width.saturating_sub(3) {
            end_pos = i;
            break;
        }
    }
    if end_pos == 0 {
        text.to_string()
    } else {
        format!("{}...", &text[..end_pos])
    }
}

/// 把模板中的 `{key}` 替换为对应的值
pub fn fill_template(template: &str, params: &[(&str, &str)]) -> String {
    params.iter().fold(template.to_string(), |url, (key, val)| {
        url.replace(&format!("{{{}}}", key), val)
    })
}

/// 把相对地址补全为以 `root` 为基准的绝对地址；已是绝对地址的原样返回
pub fn make_absolute_url(root: &str, url: &str) -> Result<String, url::ParseError> {
    match Url::parse(url) {
        Ok(abs) => Ok(abs.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Url::parse(root)?.join(url)?.to_string()),
        Err(e) => Err(e),
    }
}
