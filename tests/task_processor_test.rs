// tests/task_processor_test.rs

use course_dl::{
    client::RobustClient,
    config::AppConfig,
    constants::api::templates,
    downloader::{ContentDownloader, SubtitleOptions, TaskProcessor},
    error::AppError,
    models::{
        Caption, ContentItem, ContentKind, DownloadStatus, ItemPayload, VideoPayload, VideoSource,
    },
};
use reqwest::header::HeaderMap;
use serde_json::json;
use std::{fs, path::Path, sync::Arc};

fn processor(server_url: &str, subtitles: SubtitleOptions) -> TaskProcessor {
    let mut config = AppConfig::default();
    config.url_templates.insert(
        templates::QUIZ_ASSESSMENTS.to_string(),
        format!("{}/quizzes/{{quiz_id}}/assessments", server_url),
    );
    config.url_templates.insert(
        templates::PRACTICE_DETAILS.to_string(),
        format!("{}/practices/{{practice_id}}", server_url),
    );
    let config = Arc::new(config);
    let client = Arc::new(RobustClient::new(config.clone()).expect("Failed to create client"));
    TaskProcessor::new(client, HeaderMap::new(), config, subtitles)
}

fn item(kind: ContentKind, id: u64, position: u32, title: &str, payload: ItemPayload) -> ContentItem {
    ContentItem {
        kind,
        id: Some(id),
        position,
        title: title.to_string(),
        payload,
        supplementary_assets: Vec::new(),
    }
}

fn video_item(server_url: &str, path: &str, captions: Vec<Caption>) -> ContentItem {
    item(
        ContentKind::VideoLecture,
        7,
        3,
        "Ownership",
        ItemPayload::Video(VideoPayload {
            sources: vec![VideoSource {
                label: "720".into(),
                height: 720,
                url: format!("{}{}", server_url, path),
            }],
            hls_url: None,
            captions,
        }),
    )
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_video_with_subtitles_is_downloaded_once() {
    let mut server = mockito::Server::new_async().await;
    let video = server
        .mock("GET", "/media/720.mp4")
        .with_status(200)
        .with_body("fake-mp4-bytes")
        .expect(1)
        .create_async()
        .await;
    let subtitle = server
        .mock("GET", "/subs/en.vtt")
        .match_header("user-agent", "okhttp/3.11.0")
        .with_status(200)
        .with_body("WEBVTT\n\n00:01.000 --> 00:02.000\nHi")
        .expect(1)
        .create_async()
        .await;

    let chapter = tempfile::tempdir().unwrap();
    let captions = vec![
        Caption {
            locale_id: "en_US".into(),
            url: format!("{}/subs/en.vtt", server.url()),
        },
        Caption {
            locale_id: "es_ES".into(),
            url: format!("{}/subs/es.vtt", server.url()),
        },
    ];
    let downloader = processor(
        &server.url(),
        SubtitleOptions {
            skip: false,
            lang: Some("en".into()),
        },
    );
    let lecture = video_item(&server.url(), "/media/720.mp4", captions);

    let status = downloader.download_video(&lecture, chapter.path()).await.unwrap();
    assert_eq!(status, DownloadStatus::Success);
    assert_eq!(
        file_names(chapter.path()),
        vec!["003 Ownership.en_US.srt", "003 Ownership.mp4"]
    );
    assert_eq!(
        fs::read_to_string(chapter.path().join("003 Ownership.mp4")).unwrap(),
        "fake-mp4-bytes"
    );
    assert_eq!(
        fs::read_to_string(chapter.path().join("003 Ownership.en_US.srt")).unwrap(),
        "1\n00:00:01,000 --> 00:00:02,000\nHi\n\n"
    );

    let again = downloader.download_video(&lecture, chapter.path()).await.unwrap();
    assert_eq!(again, DownloadStatus::Skipped);

    video.assert_async().await;
    subtitle.assert_async().await;
}

#[tokio::test]
async fn test_forbidden_video_leaves_no_partial_file() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/media/expired.mp4")
        .with_status(403)
        .create_async()
        .await;

    let chapter = tempfile::tempdir().unwrap();
    let downloader = processor(&server.url(), SubtitleOptions::default());
    let lecture = video_item(&server.url(), "/media/expired.mp4", Vec::new());

    let err = downloader
        .download_video(&lecture, chapter.path())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::AccessForbidden { .. }));
    assert!(file_names(chapter.path()).is_empty());
}

#[tokio::test]
async fn test_video_without_mp4_source_is_unavailable() {
    let chapter = tempfile::tempdir().unwrap();
    let downloader = processor("http://127.0.0.1:9", SubtitleOptions::default());
    let lecture = item(
        ContentKind::VideoLecture,
        1,
        1,
        "Stream only",
        ItemPayload::Video(VideoPayload {
            hls_url: Some("https://cdn.example.com/index.m3u8".into()),
            ..Default::default()
        }),
    );

    let status = downloader.download_video(&lecture, chapter.path()).await.unwrap();
    assert_eq!(status, DownloadStatus::Unavailable);
}

#[tokio::test]
async fn test_article_is_written_as_html() {
    let chapter = tempfile::tempdir().unwrap();
    let downloader = processor("http://127.0.0.1:9", SubtitleOptions::default());
    let article = item(
        ContentKind::ArticleLecture,
        2,
        12,
        "Reading: lifetimes",
        ItemPayload::Article {
            body: "<p>first</p>\n<p>second</p>".into(),
        },
    );

    let status = downloader
        .download_article(&article, chapter.path())
        .await
        .unwrap();
    assert_eq!(status, DownloadStatus::Success);

    let html = fs::read_to_string(chapter.path().join("012 Reading lifetimes.html")).unwrap();
    assert!(html.contains("<p>first</p><br><p>second</p>"));

    let again = downloader
        .download_article(&article, chapter.path())
        .await
        .unwrap();
    assert_eq!(again, DownloadStatus::Skipped);
}

#[tokio::test]
async fn test_coding_exercise_writes_info_and_archives() {
    let mut server = mockito::Server::new_async().await;
    let assessments = server
        .mock("GET", "/quizzes/55/assessments")
        .with_status(200)
        .with_body(
            json!({
                "results": [{
                    "assessment_type": "coding-problem",
                    "prompt": {
                        "instructions": "<p>Implement <code>add</code></p>",
                        "initial_files": [{"file_name": "lib.rs", "content": "fn add() {}"}],
                        "solution_files": [{"file_name": "SOLUTION", "content": "a + b"}]
                    },
                    "correct_response": []
                }],
                "next": null
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let chapter = tempfile::tempdir().unwrap();
    let downloader = processor(&server.url(), SubtitleOptions::default());
    let exercise = item(ContentKind::CodingExercise, 55, 2, "Adder", ItemPayload::Empty);

    let status = downloader
        .download_coding_exercise(&exercise, 9, chapter.path())
        .await
        .unwrap();
    assert_eq!(status, DownloadStatus::Success);
    assert_eq!(
        file_names(chapter.path()),
        vec![
            "009 [exercise] Adder.zip",
            "009 [exercise_info] Adder.html",
            "009 [exercise_solution] Adder.zip",
        ]
    );
    let info = fs::read_to_string(chapter.path().join("009 [exercise_info] Adder.html")).unwrap();
    assert!(info.contains("Implement <code>add</code>"));

    let again = downloader
        .download_coding_exercise(&exercise, 9, chapter.path())
        .await
        .unwrap();
    assert_eq!(again, DownloadStatus::Skipped);
    assessments.assert_async().await;
}

#[tokio::test]
async fn test_simple_quiz_and_assignment_pages() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/quizzes/60/assessments")
        .with_status(200)
        .with_body(
            json!({
                "results": [{
                    "assessment_type": "multiple-choice",
                    "prompt": {"question": "Which is a smart pointer?", "answers": ["u8", "Box"]},
                    "correct_response": ["b"]
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/practices/61")
        .with_status(200)
        .with_body(json!({"title": "Build a CLI", "instructions": "Use clap"}).to_string())
        .create_async()
        .await;

    let chapter = tempfile::tempdir().unwrap();
    let downloader = processor(&server.url(), SubtitleOptions::default());

    let quiz = item(ContentKind::SimpleQuiz, 60, 1, "Pointers", ItemPayload::Empty);
    let status = downloader
        .download_simple_quiz(&quiz, 4, chapter.path())
        .await
        .unwrap();
    assert_eq!(status, DownloadStatus::Success);
    let quiz_html = fs::read_to_string(chapter.path().join("004 [quiz] Pointers.html")).unwrap();
    assert!(quiz_html.contains("<strong>Box</strong> (correct)"));

    let practice = item(ContentKind::PracticeAssignment, 61, 1, "Project", ItemPayload::Empty);
    let status = downloader
        .download_assignment(&practice, 4, chapter.path())
        .await
        .unwrap();
    assert_eq!(status, DownloadStatus::Success);
    let assignment =
        fs::read_to_string(chapter.path().join("004 [assignment] Project.html")).unwrap();
    assert!(assignment.contains("Build a CLI"));
    assert!(assignment.contains("Use clap"));
}

#[tokio::test]
async fn test_forbidden_assessment_request_signals_auth_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/quizzes/70/assessments")
        .with_status(403)
        .create_async()
        .await;

    let chapter = tempfile::tempdir().unwrap();
    let downloader = processor(&server.url(), SubtitleOptions::default());
    let quiz = item(ContentKind::SimpleQuiz, 70, 1, "Locked", ItemPayload::Empty);

    let err = downloader
        .download_simple_quiz(&quiz, 1, chapter.path())
        .await
        .unwrap_err();
    assert!(err.is_auth_failure());
    assert!(file_names(chapter.path()).is_empty());
}

#[tokio::test]
async fn test_retry_after_forbidden_caption_fetches_only_missing_subtitles() {
    let mut server = mockito::Server::new_async().await;
    let english = server
        .mock("GET", "/subs/en.vtt")
        .with_status(200)
        .with_body("WEBVTT\n\n00:01.000 --> 00:02.000\nHi")
        .expect(1)
        .create_async()
        .await;
    let spanish_forbidden = server
        .mock("GET", "/subs/es.vtt")
        .with_status(403)
        .create_async()
        .await;
    let video = server
        .mock("GET", "/media/720.mp4")
        .with_status(200)
        .with_body("fake-mp4-bytes")
        .expect(1)
        .create_async()
        .await;

    let chapter = tempfile::tempdir().unwrap();
    let captions = vec![
        Caption {
            locale_id: "en_US".into(),
            url: format!("{}/subs/en.vtt", server.url()),
        },
        Caption {
            locale_id: "es_ES".into(),
            url: format!("{}/subs/es.vtt", server.url()),
        },
    ];
    let downloader = processor(&server.url(), SubtitleOptions::default());
    let lecture = video_item(&server.url(), "/media/720.mp4", captions);

    let err = downloader
        .download_video(&lecture, chapter.path())
        .await
        .unwrap_err();
    assert!(err.is_auth_failure());
    assert_eq!(file_names(chapter.path()), vec!["003 Ownership.en_US.srt"]);

    spanish_forbidden.remove_async().await;
    let spanish = server
        .mock("GET", "/subs/es.vtt")
        .with_status(200)
        .with_body("WEBVTT\n\n00:03.000 --> 00:04.000\nHola")
        .expect(1)
        .create_async()
        .await;

    let status = downloader.download_video(&lecture, chapter.path()).await.unwrap();
    assert_eq!(status, DownloadStatus::Success);
    assert_eq!(
        file_names(chapter.path()),
        vec![
            "003 Ownership.en_US.srt",
            "003 Ownership.es_ES.srt",
            "003 Ownership.mp4",
        ]
    );
    assert!(
        fs::read_to_string(chapter.path().join("003 Ownership.es_ES.srt"))
            .unwrap()
            .contains("Hola")
    );

    english.assert_async().await;
    spanish.assert_async().await;
    video.assert_async().await;
}
