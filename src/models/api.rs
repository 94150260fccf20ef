// src/models/api.rs

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// 接口偶尔会用 `null` 代替空数组/空对象，统一按默认值处理
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// --- 通用结构体 ---

/// 分页列表接口的一页
#[derive(Deserialize, Debug, Clone)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlSetEntry {
    #[serde(rename = "type", default)]
    pub mime: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
}

/// 形如 `{"Video": [...], "E-Book": [...]}` 的下载地址集合
pub type UrlSet = HashMap<String, Vec<UrlSetEntry>>;

// --- 课程目录 (Curriculum) API 响应结构体 ---

#[derive(Deserialize, Debug, Clone)]
pub struct CourseInfo {
    pub id: u64,
    #[serde(default)]
    pub title: String,
}

/// 目录接口返回的一条原始记录，未经过滤
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawRecord {
    #[serde(rename = "_class", default)]
    pub class: String,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub object_index: Option<u32>,
    #[serde(rename = "type", default)]
    pub quiz_type: Option<String>,
    #[serde(default)]
    pub asset: Option<RawAsset>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub supplementary_assets: Vec<SupplementaryAsset>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawAsset {
    #[serde(default, deserialize_with = "null_as_default")]
    pub asset_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url_set: UrlSet,
    #[serde(default)]
    pub hls_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub captions: Vec<Caption>,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub locale_id: String,
    pub url: String,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplementaryAsset {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub asset_type: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub download_urls: UrlSet,
}

// --- 练习 (Quiz / Practice) API 响应结构体 ---

#[derive(Deserialize, Debug, Clone)]
pub struct Assessment {
    #[serde(default)]
    pub assessment_type: String,
    #[serde(default)]
    pub prompt: AssessmentPrompt,
    #[serde(default, deserialize_with = "null_as_default")]
    pub correct_response: Vec<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct AssessmentPrompt {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub answers: Vec<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub initial_files: Vec<ExerciseFile>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub solution_files: Vec<ExerciseFile>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ExerciseFile {
    pub file_name: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PracticeDetails {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
}
