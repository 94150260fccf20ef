// src/downloader/task_runner.rs

use super::{ContentDownloader, DownloadManager};
use crate::{
    error::*,
    models::{ContentItem, ContentKind, DownloadStatus, Outcome, RestartToken},
    symbols, ui, utils,
};
use log::{debug, info, warn};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

/// 严格按顺序处理规范化后的序列，一项完成后才开始下一项。
///
/// 章节节点切换当前章节目录；`resume_chapter` 只在重启后传入，
/// 在遇到下一个章节节点之前作为当前章节目录。
/// 下载时遇到 403 不会继续，而是返回带断点的 `Outcome::RestartNeeded`。
pub async fn run_sequence(
    items: &[ContentItem],
    lecture_index: &HashMap<u64, u32>,
    course_root: &Path,
    resume_chapter: Option<PathBuf>,
    downloader: &dyn ContentDownloader,
    manager: &DownloadManager,
) -> AppResult<Outcome> {
    let mut chapter_dir = resume_chapter.unwrap_or_else(|| course_root.to_path_buf());
    debug!("开始顺序下载 {} 项，起始目录: {:?}", items.len(), chapter_dir);

    for item in items {
        if item.kind.is_chapter() {
            let name = utils::chapter_dir_name(item.position, &item.title);
            chapter_dir = course_root.join(&name);
            fs::create_dir_all(&chapter_dir)?;
            ui::print_chapter(&name);
            continue;
        }

        let display_name = format!("{} {}", item.padded_position(), item.title);
        match dispatch(item, lecture_index, &chapter_dir, downloader).await {
            Ok(status) => {
                manager.record(&display_name, status);
                print_result(item, &display_name, status);
            }
            Err(e) if e.is_auth_failure() => {
                let Some(item_id) = item.id else {
                    return Err(e);
                };
                warn!("'{}' 下载时访问被拒绝，准备重新获取目录: {}", display_name, e);
                ui::warn("(fail to connect, retrying)");
                return Ok(Outcome::RestartNeeded(RestartToken {
                    kind: item.kind,
                    item_id,
                    chapter_context: chapter_dir,
                }));
            }
            Err(e) => return Err(e),
        }
    }

    info!("序列处理完成");
    Ok(Outcome::Completed)
}

async fn dispatch(
    item: &ContentItem,
    lecture_index: &HashMap<u64, u32>,
    chapter: &Path,
    downloader: &dyn ContentDownloader,
) -> AppResult<DownloadStatus> {
    let owning_lecture = || {
        item.id
            .and_then(|id| lecture_index.get(&id).copied())
            .unwrap_or(0)
    };
    match item.kind {
        ContentKind::VideoLecture => downloader.download_video(item, chapter).await,
        ContentKind::ArticleLecture => downloader.download_article(item, chapter).await,
        ContentKind::EbookLecture => downloader.download_ebook(item, chapter).await,
        ContentKind::SimpleQuiz => {
            downloader
                .download_simple_quiz(item, owning_lecture(), chapter)
                .await
        }
        ContentKind::CodingExercise => {
            downloader
                .download_coding_exercise(item, owning_lecture(), chapter)
                .await
        }
        ContentKind::PracticeAssignment => {
            downloader
                .download_assignment(item, owning_lecture(), chapter)
                .await
        }
        ContentKind::Chapter => Ok(DownloadStatus::Skipped),
    }
}

fn print_result(item: &ContentItem, name: &str, status: DownloadStatus) {
    let tag = if item.kind.is_exercise() {
        &*symbols::EXERCISE
    } else {
        &*symbols::LECTURE
    };
    let (_, color_fn, label) = status.get_display_info();
    ui::print_item_result(tag, name, &color_fn(label.into()).to_string());
}
