// src/downloader/task_processor.rs

use super::{ContentDownloader, subtitles};
use crate::{
    client::RobustClient,
    config::AppConfig,
    constants::{self, api::asset_types},
    error::*,
    models::{Caption, ContentItem, DownloadStatus, ItemPayload, SupplementaryAsset},
    ui, utils,
};
use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, info, warn};
use regex::Regex;
use reqwest::header::{self, HeaderMap, HeaderValue};
use std::{
    fs,
    io::Write as IoWrite,
    path::Path,
    sync::{Arc, LazyLock},
};
use tempfile::NamedTempFile;

static NEWLINES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").unwrap());

/// 字幕相关的命令行选项
#[derive(Debug, Clone, Default)]
pub struct SubtitleOptions {
    pub skip: bool,
    pub lang: Option<String>,
}

/// 基于 HTTP 的内容下载器，负责把每个课时/练习落盘到章节目录中。
pub struct TaskProcessor {
    pub(super) http_client: Arc<RobustClient>,
    pub(super) auth_headers: HeaderMap,
    pub(super) config: Arc<AppConfig>,
    subtitles: SubtitleOptions,
}

impl TaskProcessor {
    pub fn new(
        http_client: Arc<RobustClient>,
        auth_headers: HeaderMap,
        config: Arc<AppConfig>,
        subtitles: SubtitleOptions,
    ) -> Self {
        Self {
            http_client,
            auth_headers,
            config,
            subtitles,
        }
    }

    /// 流式写入同目录下的临时文件，完整写完后再改名为目标文件。
    /// 中途失败 (包括 403) 时临时文件被丢弃，不会留下半截的目标文件。
    pub(super) async fn stream_download(
        &self,
        url: &str,
        target: &Path,
        headers: &HeaderMap,
    ) -> AppResult<()> {
        let dir = target.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let res = self.http_client.get_with_headers(url, headers).await?;
        let total = res.content_length().unwrap_or(0);
        let file_name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let pbar = ui::new_bytes_progress_bar(
            total,
            &utils::truncate_text(&file_name, constants::FILENAME_TRUNCATE_LENGTH),
        );

        let mut temp = NamedTempFile::new_in(dir)?;
        let mut stream = res.bytes_stream();
        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.inspect_err(|_| pbar.abandon())?;
            temp.write_all(&chunk)?;
            pbar.inc(chunk.len() as u64);
        }
        temp.flush()?;
        pbar.finish_and_clear();

        temp.persist(target)?;
        debug!("已保存: {:?}", target);
        Ok(())
    }

    /// 课时附带的附件: 文件直接下载，外部链接保存为 `.url` 快捷方式
    async fn download_supplementary_assets(
        &self,
        item: &ContentItem,
        chapter: &Path,
    ) -> AppResult<()> {
        let prefix = item.padded_position();
        for asset in &item.supplementary_assets {
            match asset.asset_type.as_str() {
                asset_types::FILE => self.download_asset_file(asset, &prefix, chapter).await?,
                asset_types::EXTERNAL_LINK => write_link_shortcut(asset, &prefix, chapter)?,
                other => debug!("忽略类型为 '{}' 的附件: {}", other, asset.title),
            }
        }
        Ok(())
    }

    async fn download_asset_file(
        &self,
        asset: &SupplementaryAsset,
        prefix: &str,
        chapter: &Path,
    ) -> AppResult<()> {
        let file_name = asset.filename.as_deref().unwrap_or(&asset.title);
        let target = chapter.join(utils::sanitize_filename(&format!(
            "{} {}",
            prefix, file_name
        )));
        if target.exists() {
            debug!("附件已存在，跳过: {:?}", target);
            return Ok(());
        }
        let Some(url) = asset
            .download_urls
            .get(asset_types::FILE)
            .and_then(|entries| entries.iter().find_map(|e| e.file.as_deref()))
        else {
            warn!("附件 '{}' 没有下载地址", asset.title);
            return Ok(());
        };
        self.stream_download(url, &target, &HeaderMap::new()).await
    }

    /// 每条字幕单独判断是否已存在，中途 403 后重试只补齐缺失的语言
    async fn download_captions(
        &self,
        captions: &[Caption],
        video_name: &str,
        chapter: &Path,
    ) -> AppResult<()> {
        let selected = subtitles::select_captions(captions, self.subtitles.lang.as_deref());
        if selected.is_empty() {
            debug!("没有匹配语言 {:?} 的字幕", self.subtitles.lang);
            return Ok(());
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_static(constants::SUBTITLE_USER_AGENT),
        );
        for caption in selected {
            let target = chapter.join(format!("{}.{}.srt", video_name, caption.locale_id));
            if target.exists() {
                debug!("字幕已存在，跳过: {:?}", target);
                continue;
            }
            let res = self
                .http_client
                .get_with_headers(caption.url.as_str(), &headers)
                .await?;
            let srt = subtitles::vtt_to_srt(&res.text().await?);
            write_atomically(&target, srt.as_bytes())?;
            info!("字幕已保存: {:?}", target);
        }
        Ok(())
    }
}

/// 先写入同目录下的临时文件，再改名为目标文件
fn write_atomically(target: &Path, contents: &[u8]) -> AppResult<()> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.flush()?;
    temp.persist(target)?;
    Ok(())
}

fn write_link_shortcut(asset: &SupplementaryAsset, prefix: &str, chapter: &Path) -> AppResult<()> {
    let Some(url) = asset.external_url.as_deref() else {
        return Ok(());
    };
    let target = chapter.join(utils::sanitize_filename(&format!(
        "{} {}.url",
        prefix, asset.title
    )));
    if !target.exists() {
        fs::write(&target, format!("[InternetShortcut]\nURL={}\n", url))?;
    }
    Ok(())
}

/// 还原文章正文中转义的引号，换行替换为 `<br>`
pub(super) fn article_body_html(body: &str) -> String {
    let body = body.replace("\\\"", "\"");
    NEWLINES_RE.replace_all(&body, "<br>").into_owned()
}

#[async_trait]
impl ContentDownloader for TaskProcessor {
    async fn download_video(&self, item: &ContentItem, chapter: &Path) -> AppResult<DownloadStatus> {
        let ItemPayload::Video(video) = &item.payload else {
            return Ok(DownloadStatus::Unavailable);
        };
        let video_name = utils::sanitize_filename(&format!("{} {}", item.padded_position(), item.title));

        if !self.subtitles.skip && !video.captions.is_empty() {
            self.download_captions(&video.captions, &video_name, chapter)
                .await?;
        }
        self.download_supplementary_assets(item, chapter).await?;

        let target = chapter.join(format!("{}.mp4", video_name));
        if target.exists() {
            return Ok(DownloadStatus::Skipped);
        }
        let Some(best) = video.sources.first() else {
            warn!("课时 '{}' 没有 MP4 视频源 (hls: {:?})", item.title, video.hls_url);
            return Ok(DownloadStatus::Unavailable);
        };
        info!("下载视频 '{}' ({}p)", item.title, best.height);
        self.stream_download(&best.url, &target, &HeaderMap::new())
            .await?;
        Ok(DownloadStatus::Success)
    }

    async fn download_article(
        &self,
        item: &ContentItem,
        chapter: &Path,
    ) -> AppResult<DownloadStatus> {
        self.download_supplementary_assets(item, chapter).await?;

        let ItemPayload::Article { body } = &item.payload else {
            return Ok(DownloadStatus::Unavailable);
        };
        let target = chapter.join(utils::sanitize_filename(&format!(
            "{} {}.html",
            item.padded_position(),
            item.title
        )));
        if target.exists() {
            return Ok(DownloadStatus::Skipped);
        }
        fs::write(
            &target,
            super::exercise::render_page(&item.title, &article_body_html(body)),
        )?;
        Ok(DownloadStatus::Success)
    }

    async fn download_ebook(&self, item: &ContentItem, chapter: &Path) -> AppResult<DownloadStatus> {
        self.download_supplementary_assets(item, chapter).await?;

        let target = chapter.join(utils::sanitize_filename(&format!(
            "{} {}.pdf",
            item.padded_position(),
            item.title
        )));
        if target.exists() {
            return Ok(DownloadStatus::Skipped);
        }
        let ItemPayload::Ebook {
            file_url: Some(url),
        } = &item.payload
        else {
            return Ok(DownloadStatus::Unavailable);
        };
        self.stream_download(url, &target, &HeaderMap::new()).await?;
        Ok(DownloadStatus::Success)
    }

    async fn download_simple_quiz(
        &self,
        item: &ContentItem,
        lecture_index: u32,
        chapter: &Path,
    ) -> AppResult<DownloadStatus> {
        self.save_simple_quiz(item, lecture_index, chapter).await
    }

    async fn download_coding_exercise(
        &self,
        item: &ContentItem,
        lecture_index: u32,
        chapter: &Path,
    ) -> AppResult<DownloadStatus> {
        self.save_coding_exercise(item, lecture_index, chapter)
            .await
    }

    async fn download_assignment(
        &self,
        item: &ContentItem,
        lecture_index: u32,
        chapter: &Path,
    ) -> AppResult<DownloadStatus> {
        self.save_assignment(item, lecture_index, chapter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_body_html() {
        assert_eq!(
            article_body_html("<p class=\\\"x\\\">a</p>\n\nb\nc"),
            "<p class=\"x\">a</p><br>b<br>c"
        );
    }
}
