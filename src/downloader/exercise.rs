// src/downloader/exercise.rs

use super::task_processor::TaskProcessor;
use crate::{
    client::fetch_json,
    constants::api::templates,
    error::*,
    models::{
        ContentItem, DownloadStatus,
        api::{Assessment, ExerciseFile, Page, PracticeDetails},
    },
    utils,
};
use log::{debug, info};
use std::{fs::File, io::Write, path::Path};
use zip::{CompressionMethod, ZipWriter, write::FileOptions};

const PAGE_HEAD: &str = r#"<html><head><meta charset="utf-8"><link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/twitter-bootstrap/3.4.1/css/bootstrap.min.css"><link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/semantic-ui/2.4.1/components/image.min.css">"#;

/// 用统一的页面框架包裹一段 HTML 正文
pub(super) fn render_page(title: &str, body: &str) -> String {
    format!(
        r#"{head}<title>{title}</title></head><body><div class="container"><div class="row"><div class="col-md-10 col-md-offset-1 ui image"><p class="lead">{body}</p></div></div></div></body></html>"#,
        head = PAGE_HEAD,
        title = title,
        body = body
    )
}

fn render_instructions(instructions: &str) -> String {
    format!(
        r#"<div class="alert" role="alert"><h4><strong>Instructions</strong></h4><div class="alert" role="alert" style="background-color: #E9FBE9;border-left: 8px solid #52E052;">{}</div></div>"#,
        instructions
    )
}

/// 选择题答案以 `a`、`b`… 标识正确选项
fn render_assessments(assessments: &[Assessment]) -> String {
    let mut html = String::new();
    for (i, assessment) in assessments.iter().enumerate() {
        let question = assessment.prompt.question.as_deref().unwrap_or_default();
        html.push_str(&format!(
            r#"<div class="question"><h4>{}. {}</h4><ol type="a">"#,
            i + 1,
            question
        ));
        for (j, answer) in assessment.prompt.answers.iter().enumerate() {
            let letter = char::from(b'a' + (j % 26) as u8).to_string();
            if assessment.correct_response.contains(&letter) {
                html.push_str(&format!(
                    r#"<li style="color: #2e7d32;"><strong>{}</strong> (correct)</li>"#,
                    answer
                ));
            } else {
                html.push_str(&format!("<li>{}</li>", answer));
            }
        }
        html.push_str("</ol></div><hr>");
    }
    html
}

/// 把练习文件打包为 zip，没有扩展名的文件补 `.txt`
fn write_zip(target: &Path, files: &[ExerciseFile]) -> AppResult<()> {
    let mut zip = ZipWriter::new(File::create(target)?);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for file in files {
        zip.start_file(utils::with_txt_fallback(&file.file_name), options)?;
        zip.write_all(file.content.as_bytes())?;
    }
    zip.finish()?;
    Ok(())
}

impl TaskProcessor {
    async fn fetch_assessments(&self, quiz_id: u64) -> AppResult<Vec<Assessment>> {
        let url = self.config.render_url(
            templates::QUIZ_ASSESSMENTS,
            &[("quiz_id", quiz_id.to_string().as_str())],
        )?;
        debug!("获取测验内容: {}", url);
        let page: Page<Assessment> =
            fetch_json(self.http_client.as_ref(), &url, &self.auth_headers).await?;
        Ok(page.results)
    }

    pub(super) async fn save_simple_quiz(
        &self,
        item: &ContentItem,
        lecture_index: u32,
        chapter: &Path,
    ) -> AppResult<DownloadStatus> {
        let target = chapter.join(utils::sanitize_filename(&format!(
            "{:03} [quiz] {}.html",
            lecture_index, item.title
        )));
        if target.exists() {
            return Ok(DownloadStatus::Skipped);
        }
        let Some(quiz_id) = item.id else {
            return Ok(DownloadStatus::Unavailable);
        };

        let assessments = self.fetch_assessments(quiz_id).await?;
        if assessments.is_empty() {
            return Ok(DownloadStatus::Unavailable);
        }
        std::fs::write(
            &target,
            render_page(&item.title, &render_assessments(&assessments)),
        )?;
        info!("测验已保存: {:?} ({} 题)", target, assessments.len());
        Ok(DownloadStatus::Success)
    }

    /// 说明页最后写入，作为整个练习已完成的标记
    pub(super) async fn save_coding_exercise(
        &self,
        item: &ContentItem,
        lecture_index: u32,
        chapter: &Path,
    ) -> AppResult<DownloadStatus> {
        let title = utils::sanitize_filename(&item.title);
        let info_path = chapter.join(format!(
            "{:03} [exercise_info] {}.html",
            lecture_index, title
        ));
        if info_path.exists() {
            return Ok(DownloadStatus::Skipped);
        }
        let Some(quiz_id) = item.id else {
            return Ok(DownloadStatus::Unavailable);
        };

        let assessments = self.fetch_assessments(quiz_id).await?;
        let Some(exercise) = assessments.first() else {
            return Ok(DownloadStatus::Unavailable);
        };

        write_zip(
            &chapter.join(format!("{:03} [exercise] {}.zip", lecture_index, title)),
            &exercise.prompt.initial_files,
        )?;
        write_zip(
            &chapter.join(format!(
                "{:03} [exercise_solution] {}.zip",
                lecture_index, title
            )),
            &exercise.prompt.solution_files,
        )?;
        let instructions = exercise.prompt.instructions.as_deref().unwrap_or_default();
        std::fs::write(
            &info_path,
            render_page(&item.title, &render_instructions(instructions)),
        )?;
        Ok(DownloadStatus::Success)
    }

    pub(super) async fn save_assignment(
        &self,
        item: &ContentItem,
        lecture_index: u32,
        chapter: &Path,
    ) -> AppResult<DownloadStatus> {
        let target = chapter.join(utils::sanitize_filename(&format!(
            "{:03} [assignment] {}.html",
            lecture_index, item.title
        )));
        if target.exists() {
            return Ok(DownloadStatus::Skipped);
        }
        let Some(practice_id) = item.id else {
            return Ok(DownloadStatus::Unavailable);
        };

        let url = self.config.render_url(
            templates::PRACTICE_DETAILS,
            &[("practice_id", practice_id.to_string().as_str())],
        )?;
        let details: PracticeDetails =
            fetch_json(self.http_client.as_ref(), &url, &self.auth_headers).await?;
        let title = details.title.as_deref().unwrap_or(&item.title);
        let body = format!(
            "<h2>{}</h2>{}",
            title,
            render_instructions(details.instructions.as_deref().unwrap_or_default())
        );
        std::fs::write(&target, render_page(title, &body))?;
        Ok(DownloadStatus::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::api::AssessmentPrompt;

    #[test]
    fn test_render_assessments_marks_correct_answers() {
        let assessments = vec![Assessment {
            assessment_type: "multiple-choice".into(),
            prompt: AssessmentPrompt {
                question: Some("2 + 2 = ?".into()),
                answers: vec!["3".into(), "4".into()],
                ..Default::default()
            },
            correct_response: vec!["b".into()],
        }];
        let html = render_assessments(&assessments);
        assert!(html.contains("1. 2 + 2 = ?"));
        assert!(html.contains("<li>3</li>"));
        assert!(html.contains("<strong>4</strong> (correct)"));
    }

    #[test]
    fn test_write_zip_adds_txt_to_extensionless_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exercise.zip");
        let files = vec![
            ExerciseFile {
                file_name: "main.py".into(),
                content: "print('hi')".into(),
            },
            ExerciseFile {
                file_name: "README".into(),
                content: "read me".into(),
            },
        ];
        write_zip(&path, &files).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
        let mut names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["README.txt", "main.py"]);
    }
}
