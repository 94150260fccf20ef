// src/downloader/auth.rs

use crate::{
    error::*,
    models::{ContentItem, ContentKind, RestartToken},
    symbols,
};
use colored::Colorize;
use log::{info, warn};

/// 在重新规范化的序列中定位断点，返回从失败项 (含) 开始的剩余部分。
/// 课时、测验、章节各自使用独立的 id，因此按 (类型, id) 匹配。
pub fn resume_from(
    items: &[ContentItem],
    kind: ContentKind,
    item_id: u64,
) -> AppResult<&[ContentItem]> {
    let idx = items
        .iter()
        .position(|item| item.kind == kind && item.id == Some(item_id))
        .ok_or_else(|| {
            AppError::Lookup(format!(
                "重新获取的课程目录中找不到断点项目 ({:?}, id: {})",
                kind, item_id
            ))
        })?;
    info!("从第 {} 项 ({:?}, id: {}) 继续下载", idx, kind, item_id);
    Ok(&items[idx..])
}

/// 超过允许的重启次数后，把最后一次 403 作为致命错误返回
pub(super) fn check_restart_budget(
    token: &RestartToken,
    attempts: u32,
    max_restarts: Option<u32>,
) -> AppResult<()> {
    match max_restarts {
        Some(max) if attempts > max => {
            warn!("已重新获取目录 {} 次，仍然被拒绝访问，放弃", max);
            Err(AppError::AccessForbidden {
                url: format!("项目 id {} (已重试 {} 次)", token.item_id, max),
            })
        }
        _ => Ok(()),
    }
}

pub(super) fn announce_restart(token: &RestartToken, attempts: u32) {
    info!(
        "第 {} 次重启: 断点 id {}, 章节目录 {:?}",
        attempts, token.item_id, token.chapter_context
    );
    println!(
        "\n{} {}",
        *symbols::INFO,
        format!("重新获取课程目录 (第 {} 次)...", attempts).yellow()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemPayload;
    use std::path::PathBuf;

    fn item(kind: ContentKind, id: u64, position: u32) -> ContentItem {
        ContentItem {
            kind,
            id: Some(id),
            position,
            title: format!("item {}", id),
            payload: ItemPayload::Empty,
            supplementary_assets: Vec::new(),
        }
    }

    #[test]
    fn test_resume_from_is_inclusive_and_ignores_chapter_ids() {
        let items = vec![
            item(ContentKind::Chapter, 2, 1),
            item(ContentKind::VideoLecture, 1, 1),
            item(ContentKind::VideoLecture, 2, 2),
            item(ContentKind::VideoLecture, 3, 3),
        ];
        let rest = resume_from(&items, ContentKind::VideoLecture, 2).unwrap();
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[0].position, 2);
    }

    #[test]
    fn test_resume_from_matches_kind_as_well_as_id() {
        let items = vec![
            item(ContentKind::SimpleQuiz, 5, 1),
            item(ContentKind::VideoLecture, 9, 2),
            item(ContentKind::VideoLecture, 5, 3),
        ];
        let rest = resume_from(&items, ContentKind::VideoLecture, 5).unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].position, 3);

        let rest = resume_from(&items, ContentKind::SimpleQuiz, 5).unwrap();
        assert_eq!(rest.len(), 3);
    }

    #[test]
    fn test_resume_from_unknown_id_is_lookup_error() {
        let items = vec![item(ContentKind::VideoLecture, 1, 1)];
        assert!(matches!(
            resume_from(&items, ContentKind::VideoLecture, 42),
            Err(AppError::Lookup(_))
        ));
        assert!(matches!(
            resume_from(&items, ContentKind::ArticleLecture, 1),
            Err(AppError::Lookup(_))
        ));
    }

    #[test]
    fn test_restart_budget() {
        let token = RestartToken {
            kind: ContentKind::VideoLecture,
            item_id: 7,
            chapter_context: PathBuf::from("course/01 Intro"),
        };
        assert!(check_restart_budget(&token, 100, None).is_ok());
        assert!(check_restart_budget(&token, 2, Some(2)).is_ok());
        let err = check_restart_budget(&token, 3, Some(2)).unwrap_err();
        assert!(err.is_auth_failure());
    }
}
