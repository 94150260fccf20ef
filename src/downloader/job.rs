// src/downloader/job.rs

use super::{ContentDownloader, DownloadManager, auth, task_runner};
use crate::{
    catalog::{CatalogFetcher, NormalizedCatalog, SelectionOptions, normalize},
    client::Transport,
    error::*,
    models::{Outcome, RestartToken, api::RawRecord},
    ui::FetchProgress,
};
use log::{debug, error, info};
use reqwest::header::HeaderMap;
use std::path::Path;

enum Phase {
    Running,
    Restarting(RestartToken),
}

/// 课程下载的控制器: 拉取目录 → 规范化 → 顺序下载，
/// 下载中途遇到 403 时从第一页重新拉取目录并从失败项继续。
pub struct CourseDownloader<'a> {
    transport: &'a dyn Transport,
    downloader: &'a dyn ContentDownloader,
    progress: &'a dyn FetchProgress,
    headers: HeaderMap,
    manager: DownloadManager,
    max_restarts: Option<u32>,
}

impl<'a> CourseDownloader<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        downloader: &'a dyn ContentDownloader,
        progress: &'a dyn FetchProgress,
        headers: HeaderMap,
    ) -> Self {
        Self {
            transport,
            downloader,
            progress,
            headers,
            manager: DownloadManager::new(),
            max_restarts: None,
        }
    }

    /// `None` 表示不限制重启次数
    pub fn with_max_restarts(mut self, max_restarts: Option<u32>) -> Self {
        self.max_restarts = max_restarts;
        self
    }

    pub fn manager(&self) -> &DownloadManager {
        &self.manager
    }

    /// `catalog_url` 必须是目录接口的第一页
    pub async fn run(
        &self,
        catalog_url: &str,
        course_root: &Path,
        options: &SelectionOptions,
    ) -> AppResult<()> {
        options.validate()?;
        let mut phase = Phase::Running;
        let mut attempts = 0u32;

        loop {
            let catalog = self.load_catalog(catalog_url, options).await?;
            let (items, resume_chapter) = match &phase {
                Phase::Running => (catalog.items.as_slice(), None),
                Phase::Restarting(token) => (
                    auth::resume_from(&catalog.items, token.kind, token.item_id)?,
                    Some(token.chapter_context.clone()),
                ),
            };

            let outcome = task_runner::run_sequence(
                items,
                &catalog.lecture_index,
                course_root,
                resume_chapter,
                self.downloader,
                &self.manager,
            )
            .await
            .inspect_err(|e| error!("下载过程中发生不可恢复的错误: {}", e))?;

            match outcome {
                Outcome::Completed => {
                    info!("课程下载完成，共重启 {} 次", attempts);
                    return Ok(());
                }
                Outcome::RestartNeeded(token) => {
                    attempts += 1;
                    auth::check_restart_budget(&token, attempts, self.max_restarts)?;
                    self.manager.record_restart();
                    auth::announce_restart(&token, attempts);
                    phase = Phase::Restarting(token);
                }
            }
        }
    }

    async fn load_catalog(
        &self,
        catalog_url: &str,
        options: &SelectionOptions,
    ) -> AppResult<NormalizedCatalog> {
        debug!("获取课程目录: {}", catalog_url);
        let raw: Vec<RawRecord> = CatalogFetcher::new(self.transport, self.progress)
            .fetch_all(catalog_url, &self.headers)
            .await?;
        normalize(raw, options)
    }
}
