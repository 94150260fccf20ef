// src/downloader/mod.rs

mod auth;
mod exercise;
mod job;
mod subtitles;
mod task_processor;
mod task_runner;

pub use auth::resume_from;
pub use job::CourseDownloader;
pub use subtitles::{select_captions, vtt_to_srt};
pub use task_processor::{SubtitleOptions, TaskProcessor};
pub use task_runner::run_sequence;

use crate::{
    error::AppResult,
    models::{ContentItem, DownloadStatus},
    symbols, ui,
};
use async_trait::async_trait;
use colored::*;
use itertools::Itertools;
use log::info;
use std::{
    path::Path,
    sync::{Arc, Mutex},
};

/// 各类内容的下载器。
/// 每个方法都是幂等的: 目标文件已存在时返回 `Skipped`；遇到 403 时返回 `AppError::AccessForbidden`。
#[async_trait]
pub trait ContentDownloader: Send + Sync {
    async fn download_video(&self, item: &ContentItem, chapter: &Path) -> AppResult<DownloadStatus>;
    async fn download_article(&self, item: &ContentItem, chapter: &Path)
    -> AppResult<DownloadStatus>;
    async fn download_ebook(&self, item: &ContentItem, chapter: &Path) -> AppResult<DownloadStatus>;
    async fn download_simple_quiz(
        &self,
        item: &ContentItem,
        lecture_index: u32,
        chapter: &Path,
    ) -> AppResult<DownloadStatus>;
    async fn download_coding_exercise(
        &self,
        item: &ContentItem,
        lecture_index: u32,
        chapter: &Path,
    ) -> AppResult<DownloadStatus>;
    async fn download_assignment(
        &self,
        item: &ContentItem,
        lecture_index: u32,
        chapter: &Path,
    ) -> AppResult<DownloadStatus>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DownloadStats {
    pub success: usize,
    pub skipped: usize,
    pub unavailable: usize,
    pub restarts: usize,
}

/// 整个下载过程的计数器，跨越多次重启累计
#[derive(Clone, Default)]
pub struct DownloadManager {
    stats: Arc<Mutex<DownloadStats>>,
    unavailable_items: Arc<Mutex<Vec<String>>>,
}

impl DownloadManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, name: &str, status: DownloadStatus) {
        let Ok(mut stats) = self.stats.lock() else {
            return;
        };
        match status {
            DownloadStatus::Success => stats.success += 1,
            DownloadStatus::Skipped => stats.skipped += 1,
            DownloadStatus::Unavailable => {
                info!("'{}' 没有可下载的资源", name);
                stats.unavailable += 1;
                if let Ok(mut items) = self.unavailable_items.lock() {
                    items.push(name.to_string());
                }
            }
        }
    }

    pub fn record_restart(&self) {
        if let Ok(mut stats) = self.stats.lock() {
            stats.restarts += 1;
        }
    }

    pub fn get_stats(&self) -> DownloadStats {
        self.stats
            .lock()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }

    pub fn print_report(&self) {
        let stats = self.get_stats();
        info!(
            "下载报告: Success={}, Skipped={}, Unavailable={}, Restarts={}",
            stats.success, stats.skipped, stats.unavailable, stats.restarts
        );

        if let Ok(items) = self.unavailable_items.lock()
            && !items.is_empty()
        {
            ui::print_sub_header("没有可下载资源的项目");
            for name in items.iter().sorted().dedup() {
                println!("  - {}", name);
            }
        }

        ui::print_sub_header("任务总结");
        let summary = format!(
            "{} | {} | {}",
            format!("完成: {}", stats.success).green(),
            format!("已存在: {}", stats.skipped).cyan(),
            format!("不可用: {}", stats.unavailable).yellow()
        );
        println!("{} {}", *symbols::OK, summary);
        if stats.restarts > 0 {
            println!(
                "{} 期间因访问被拒绝重新获取目录 {} 次",
                *symbols::INFO,
                stats.restarts
            );
        }
    }
}
