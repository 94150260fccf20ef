// src/utils.rs

use crate::constants;
use std::sync::LazyLock;
use regex::Regex;
use std::{ffi::OsStr, path::Path};
use url::Url;

static ILLEGAL_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"[\\/*?:"<>|]"#).unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static COURSE_PATH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/course/([^/?#]+)").unwrap());

pub fn sanitize_filename(name: &str) -> String {
    let original_name = name.trim();
    if original_name.is_empty() { return "unknown".to_string(); }

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
    if name.is_empty() { return "unnamed".to_string(); }

    if name.len() > constants::MAX_FILENAME_BYTES {
        if let (Some(stem_part), Some(ext)) = (Path::new(&name).file_stem(), Path::new(&name).extension()) {
            let stem_part_str = stem_part.to_string_lossy();
            let ext_str = format!(".{}", ext.to_string_lossy());
            let max_stem_bytes = constants::MAX_FILENAME_BYTES.saturating_sub(ext_str.len());
            let truncated_stem = safe_truncate_utf8(&stem_part_str, max_stem_bytes);
            name = format!("{}{}", truncated_stem, ext_str);
        } else {
            name = safe_truncate_utf8(&name, constants::MAX_FILENAME_BYTES).to_string();
        }
    }
    name
}

fn safe_truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes { return s; }
    let mut i = max_bytes;
    while i > 0 && !s.is_char_boundary(i) { i -= 1; }
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
    if end_pos == 0 { text.to_string() } else { format!("{}...", &text[..end_pos]) }
}

/// 章节目录名: 两位序号 + 标题
pub fn chapter_dir_name(position: u32, title: &str) -> String {
    sanitize_filename(&format!("{:02} {}", position, title))
}

/// 没有扩展名的练习文件补上 `.txt`
pub fn with_txt_fallback(file_name: &str) -> String {
    if Path::new(file_name).extension().is_some() {
        file_name.to_string()
    } else {
        format!("{}.txt", file_name)
    }
}

/// 从课程链接中取出 slug，纯 slug 或数字 ID 原样返回
pub fn parse_course_ref(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(url) = Url::parse(input) {
        return COURSE_PATH_RE
            .captures(url.path())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
    }
    if input.contains('/') || input.contains(char::is_whitespace) {
        return None;
    }
    Some(input.to_string())
}
