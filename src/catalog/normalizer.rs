// src/catalog/normalizer.rs

use super::SelectionOptions;
use crate::{
    constants::api::{asset_types, classes, mime, quiz_types},
    error::{AppError, AppResult},
    models::{
        ContentItem, ContentKind, ItemPayload, VideoPayload, VideoSource,
        api::{RawAsset, RawRecord},
    },
};
use log::{debug, info};
use std::{collections::HashMap, iter};

/// 规范化后的下载序列，以及练习到所属课时序号的映射
#[derive(Debug, Clone, Default)]
pub struct NormalizedCatalog {
    pub items: Vec<ContentItem>,
    pub lecture_index: HashMap<u64, u32>,
}

impl NormalizedCatalog {
    /// 练习所属课时的序号，用作练习文件名的前缀
    pub fn owning_lecture(&self, item: &ContentItem) -> u32 {
        item.id
            .and_then(|id| self.lecture_index.get(&id).copied())
            .unwrap_or(0)
    }
}

/// 过滤 → 补齐首章节 → 建立练习索引 → (单课时 | 章节范围) 截取
pub fn normalize(raw: Vec<RawRecord>, options: &SelectionOptions) -> AppResult<NormalizedCatalog> {
    options.validate()?;

    let raw_count = raw.len();
    let filtered: Vec<ContentItem> = raw.into_iter().filter_map(to_content_item).collect();
    debug!("目录过滤: {} 条原始记录保留 {} 条", raw_count, filtered.len());

    let repaired = repair_leading_chapter(filtered);
    // 必须在截取之前建立，否则练习后面的课时可能已经被截掉
    let lecture_index = build_lecture_index(&repaired);

    let items = if let Some(position) = options.lecture {
        isolate_lecture(&repaired, position)?
    } else if options.has_chapter_range() {
        slice_chapters(repaired, options.chapter_start, options.chapter_end)?
    } else {
        repaired
    };

    info!("规范化完成，待处理 {} 项", items.len());
    Ok(NormalizedCatalog {
        items,
        lecture_index,
    })
}

fn classify(record: &RawRecord) -> Option<ContentKind> {
    match record.class.as_str() {
        classes::CHAPTER => Some(ContentKind::Chapter),
        classes::LECTURE => match record.asset.as_ref()?.asset_type.as_str() {
            asset_types::VIDEO => Some(ContentKind::VideoLecture),
            asset_types::ARTICLE => Some(ContentKind::ArticleLecture),
            asset_types::EBOOK => Some(ContentKind::EbookLecture),
            _ => None,
        },
        classes::QUIZ => match record.quiz_type.as_deref()? {
            quiz_types::SIMPLE_QUIZ => Some(ContentKind::SimpleQuiz),
            quiz_types::CODING_EXERCISE => Some(ContentKind::CodingExercise),
            _ => None,
        },
        classes::PRACTICE => Some(ContentKind::PracticeAssignment),
        _ => None,
    }
}

fn to_content_item(record: RawRecord) -> Option<ContentItem> {
    let kind = classify(&record)?;
    let payload = match (kind, record.asset) {
        (ContentKind::VideoLecture, Some(asset)) => ItemPayload::Video(video_payload(asset)),
        (ContentKind::ArticleLecture, Some(asset)) => ItemPayload::Article {
            body: asset.body.unwrap_or_default(),
        },
        (ContentKind::EbookLecture, Some(asset)) => ItemPayload::Ebook {
            file_url: asset
                .url_set
                .get(asset_types::EBOOK)
                .and_then(|entries| entries.iter().find_map(|e| e.file.clone())),
        },
        _ => ItemPayload::Empty,
    };

    Some(ContentItem {
        kind,
        id: record.id,
        position: record.object_index.unwrap_or_default(),
        title: record.title,
        payload,
        supplementary_assets: record.supplementary_assets,
    })
}

fn video_payload(asset: RawAsset) -> VideoPayload {
    let mut sources: Vec<VideoSource> = asset
        .url_set
        .get(asset_types::VIDEO)
        .map(|entries| {
            entries
                .iter()
                .filter(|e| e.mime.as_deref().is_none_or(|m| m == mime::MP4))
                .filter_map(|e| {
                    let url = e.file.clone()?;
                    let label = e.label.clone().unwrap_or_default();
                    let height = label.trim_end_matches('p').parse::<u32>().unwrap_or(0);
                    Some(VideoSource { label, height, url })
                })
                .collect()
        })
        .unwrap_or_default();
    // 高分辨率在前
    sources.sort_by(|a, b| b.height.cmp(&a.height));

    VideoPayload {
        sources,
        hls_url: asset.hls_url,
        captions: asset.captions,
    }
}

/// 序列不以章节开头时，用第一项的标题补一个第 1 章，原有章节序号整体后移。
/// 返回新的序列，不修改已有项。
fn repair_leading_chapter(items: Vec<ContentItem>) -> Vec<ContentItem> {
    let Some(first) = items.first() else {
        return items;
    };
    if first.kind.is_chapter() {
        return items;
    }

    info!("目录缺少首个章节，以 '{}' 为名补齐", first.title);
    let lost_chapter = ContentItem {
        kind: ContentKind::Chapter,
        id: None,
        position: 1,
        title: first.title.clone(),
        payload: ItemPayload::Empty,
        supplementary_assets: Vec::new(),
    };

    iter::once(lost_chapter)
        .chain(items.into_iter().map(|item| {
            if item.kind.is_chapter() {
                ContentItem {
                    position: item.position + 1,
                    ..item
                }
            } else {
                item
            }
        }))
        .collect()
}

/// 练习 id → 其后最近一个课时的序号；后面没有课时时退回到前面最近的课时
fn build_lecture_index(items: &[ContentItem]) -> HashMap<u64, u32> {
    let mut preceding = Vec::with_capacity(items.len());
    let mut last_lecture = None;
    for item in items {
        preceding.push(last_lecture);
        if item.kind.is_lecture() {
            last_lecture = Some(item.position);
        }
    }

    let mut index = HashMap::new();
    let mut following = None;
    for (i, item) in items.iter().enumerate().rev() {
        if item.kind.is_lecture() {
            following = Some(item.position);
        } else if item.kind.is_exercise()
            && let Some(id) = item.id
        {
            index.insert(id, following.or(preceding[i]).unwrap_or(0));
        }
    }
    index
}

fn isolate_lecture(items: &[ContentItem], position: u32) -> AppResult<Vec<ContentItem>> {
    let lecture_idx = items
        .iter()
        .position(|item| item.kind.is_lecture() && item.position == position)
        .ok_or_else(|| AppError::Lookup(format!("未找到序号为 {} 的课时", position)))?;

    let chapter = items[..lecture_idx]
        .iter()
        .rev()
        .find(|item| item.kind.is_chapter())
        .ok_or_else(|| AppError::Lookup(format!("课时 {} 之前没有任何章节", position)))?;

    Ok(vec![chapter.clone(), items[lecture_idx].clone()])
}

/// 按章节序号截取半开区间 `[start, end)`
fn slice_chapters(
    items: Vec<ContentItem>,
    start: Option<u32>,
    end: Option<u32>,
) -> AppResult<Vec<ContentItem>> {
    let chapter_count = items.iter().filter(|item| item.kind.is_chapter()).count();
    let find_chapter = |position: u32| {
        items
            .iter()
            .position(|item| item.kind.is_chapter() && item.position == position)
    };

    let start_idx = match start {
        Some(start) if start as usize > chapter_count => {
            return Err(AppError::Config(format!(
                "课程只有 {} 个章节，但指定从第 {} 章开始",
                chapter_count, start
            )));
        }
        Some(start) => find_chapter(start)
            .ok_or_else(|| AppError::Config(format!("课程中不存在第 {} 章", start)))?,
        None => 0,
    };
    let end_idx = match end {
        Some(end) => find_chapter(end)
            .ok_or_else(|| AppError::Config(format!("课程中不存在第 {} 章", end)))?,
        None => items.len(),
    };
    if end_idx < start_idx {
        return Err(AppError::Config(
            "章节顺序异常，结束章节位于开始章节之前".to_string(),
        ));
    }

    debug!("章节截取: 下标 [{}, {})", start_idx, end_idx);
    Ok(items
        .into_iter()
        .skip(start_idx)
        .take(end_idx - start_idx)
        .collect())
}
