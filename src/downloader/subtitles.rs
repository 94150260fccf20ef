// src/downloader/subtitles.rs

use crate::models::Caption;
use regex::Regex;
use std::sync::LazyLock;

static VOICE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<v.*>(.*)</v>").unwrap());
static MILLIS_SEP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d\d:\d\d)\.(\d\d\d)\b").unwrap());
static SHORT_TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\n|\s)(\d\d:\d\d,\d\d\d)(\s|\n)").unwrap());
static CUE_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\n(?:\d+\n)?").unwrap());

/// 指定了语言时只取第一个匹配的字幕 (大小写不敏感的子串匹配)，否则全部下载
pub fn select_captions<'a>(captions: &'a [Caption], lang: Option<&str>) -> Vec<&'a Caption> {
    match lang {
        Some(lang) => {
            let wanted = lang.to_lowercase();
            captions
                .iter()
                .find(|c| c.locale_id.to_lowercase().contains(&wanted))
                .into_iter()
                .collect()
        }
        None => captions.iter().collect(),
    }
}

/// WebVTT → SRT: 补全小时位、毫秒分隔符改为逗号、去掉说话人标签并重新编号
pub fn vtt_to_srt(vtt: &str) -> String {
    let text = vtt.trim();
    let text = text.strip_prefix("WEBVTT").unwrap_or(text).replace("\r\n", "\n");
    let text = VOICE_TAG_RE.replace_all(&text, "$1");
    let text = MILLIS_SEP_RE.replace_all(&text, "$1,$2");
    let text = SHORT_TIMESTAMP_RE.replace_all(&text, "${1}00:${2}${3}");

    CUE_SPLIT_RE
        .split(&text)
        .skip(1)
        .enumerate()
        .map(|(i, cue)| format!("{}\n{}\n\n", i + 1, cue))
        .collect()
}
