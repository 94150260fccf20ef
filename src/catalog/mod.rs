// src/catalog/mod.rs

pub mod fetcher;
pub mod normalizer;

pub use fetcher::CatalogFetcher;
pub use normalizer::{NormalizedCatalog, normalize};

use crate::{
    cli::Cli,
    error::{AppError, AppResult},
};

/// 决定规范化结果范围的选项。单课时与章节范围互斥。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionOptions {
    pub lecture: Option<u32>,
    pub chapter_start: Option<u32>,
    pub chapter_end: Option<u32>,
}

impl SelectionOptions {
    pub fn from_cli(args: &Cli) -> Self {
        Self {
            lecture: args.lecture,
            chapter_start: args.chapter_start,
            chapter_end: args.chapter_end,
        }
    }

    pub fn has_chapter_range(&self) -> bool {
        self.chapter_start.is_some() || self.chapter_end.is_some()
    }

    /// 不依赖课程目录就能发现的配置错误，在任何网络请求之前检查
    pub fn validate(&self) -> AppResult<()> {
        if self.lecture.is_some() && self.has_chapter_range() {
            return Err(AppError::Config(
                "--lecture 不能与 --chapter-start / --chapter-end 同时使用".to_string(),
            ));
        }
        if [self.lecture, self.chapter_start, self.chapter_end].contains(&Some(0)) {
            return Err(AppError::Config("课时与章节序号从 1 开始".to_string()));
        }
        if let (Some(start), Some(end)) = (self.chapter_start, self.chapter_end)
            && end <= start
        {
            return Err(AppError::Config(format!(
                "结束章节 ({}) 必须大于开始章节 ({})",
                end, start
            )));
        }
        Ok(())
    }
}
