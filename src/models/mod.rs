// src/models/mod.rs

pub mod api;

use crate::symbols;
use colored::{ColoredString, Colorize};
use std::path::PathBuf;

pub use api::{Caption, SupplementaryAsset};

/// 目录节点的类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Chapter,
    VideoLecture,
    ArticleLecture,
    EbookLecture,
    SimpleQuiz,
    CodingExercise,
    PracticeAssignment,
}

impl ContentKind {
    pub fn is_chapter(self) -> bool {
        self == ContentKind::Chapter
    }

    /// 课时类节点 (视频 / 文章 / 电子书)
    pub fn is_lecture(self) -> bool {
        matches!(
            self,
            ContentKind::VideoLecture | ContentKind::ArticleLecture | ContentKind::EbookLecture
        )
    }

    /// 练习类节点，需要关联到所属课时的序号
    pub fn is_exercise(self) -> bool {
        matches!(
            self,
            ContentKind::SimpleQuiz | ContentKind::CodingExercise | ContentKind::PracticeAssignment
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSource {
    pub label: String,
    pub height: u32,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VideoPayload {
    /// 按分辨率从高到低排列的 MP4 地址
    pub sources: Vec<VideoSource>,
    pub hls_url: Option<String>,
    pub captions: Vec<Caption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ItemPayload {
    #[default]
    Empty,
    Video(VideoPayload),
    Article { body: String },
    Ebook { file_url: Option<String> },
}

/// 规范化后的一个目录节点。只由目录规范化流程构造，之后不再修改。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub kind: ContentKind,
    pub id: Option<u64>,
    pub position: u32,
    pub title: String,
    pub payload: ItemPayload,
    pub supplementary_assets: Vec<SupplementaryAsset>,
}

impl ContentItem {
    /// 文件名前缀，如 `007`
    pub fn padded_position(&self) -> String {
        format!("{:03}", self.position)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DownloadStatus {
    Success,
    Skipped,
    Unavailable,
}

impl DownloadStatus {
    pub fn get_display_info(
        &self,
    ) -> (
        &'static ColoredString,
        fn(ColoredString) -> ColoredString,
        &'static str,
    ) {
        match self {
            DownloadStatus::Success => (&symbols::OK, |s| s.green(), "完成"),
            DownloadStatus::Skipped => (&symbols::INFO, |s| s.yellow(), "(already downloaded)"),
            DownloadStatus::Unavailable => (&symbols::WARN, |s| s.yellow(), "没有可下载的资源"),
        }
    }
}

/// 下载过程中遇到 403 时记录的断点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartToken {
    pub kind: ContentKind,
    pub item_id: u64,
    pub chapter_context: PathBuf,
}

/// 一次顺序下载的结果: 全部完成，或需要重新拉取目录后从断点继续
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    RestartNeeded(RestartToken),
}
