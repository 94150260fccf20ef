// src/config.rs

pub mod token;

use self::token::load_or_create_external_config;
use crate::{
    cli::Cli,
    constants::{self, api::templates},
    error::{AppError, AppResult},
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    /// 因 403 重新拉取目录的最大次数，未设置表示不限
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_restarts: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accesstoken: Option<String>,
    #[serde(default = "default_subdomain")]
    pub subdomain: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub url_templates: HashMap<String, String>,
}

// --- 为上面的 serde default 添加辅助函数 ---
fn default_subdomain() -> String {
    constants::DEFAULT_SUBDOMAIN.to_string()
}

fn default_page_size() -> u32 {
    constants::DEFAULT_PAGE_SIZE
}

pub(crate) fn default_url_templates() -> HashMap<String, String> {
    HashMap::from([
        (
            templates::COURSE_INFO.into(),
            "https://{subdomain}.udemy.com/api-2.0/courses/{course}/?fields[course]=id,title".into(),
        ),
        (
            templates::CURRICULUM.into(),
            "https://{subdomain}.udemy.com/api-2.0/courses/{course_id}/subscriber-curriculum-items/?fields[lecture]=supplementary_assets,title,asset,object_index&fields[chapter]=title,object_index&fields[quiz]=title,object_index,type&fields[practice]=title,object_index&fields[asset]=title,asset_type,url_set,hls_url,captions,body,filename,external_url,download_urls&page=1&locale=en_US&page_size={page_size}".into(),
        ),
        (
            templates::QUIZ_ASSESSMENTS.into(),
            "https://{subdomain}.udemy.com/api-2.0/quizzes/{quiz_id}/assessments/?version=1&page_size=250&fields[assessment]=id,assessment_type,prompt,correct_response".into(),
        ),
        (
            templates::PRACTICE_DETAILS.into(),
            "https://{subdomain}.udemy.com/api-2.0/practices/{practice_id}/?fields[practice]=title,instructions".into(),
        ),
    ])
}

impl ExternalConfig {
    pub(crate) fn default_app_config() -> Self {
        // 为 NetworkConfig 提供一组稳健的默认值
        let network_config = NetworkConfig {
            connect_timeout_secs: Some(10),
            timeout_secs: Some(60),
            max_retries: Some(3),
            max_restarts: None,
        };

        Self {
            accesstoken: None,
            subdomain: default_subdomain(),
            page_size: default_page_size(),
            network: network_config,
            url_templates: default_url_templates(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub subdomain: String,
    pub page_size: u32,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_retries: u32,
    pub max_restarts: Option<u32>,
    pub url_templates: HashMap<String, String>,
}

impl AppConfig {
    pub fn new(args: &Cli) -> AppResult<Self> {
        let external_config = load_or_create_external_config()?;

        // 配置文件里缺失的模板用内置默认值补齐
        let mut url_templates = default_url_templates();
        url_templates.extend(external_config.url_templates);

        Ok(Self {
            subdomain: args
                .subdomain
                .clone()
                .unwrap_or(external_config.subdomain),
            page_size: external_config.page_size.max(1),
            user_agent: constants::USER_AGENT.into(),
            connect_timeout: Duration::from_secs(
                external_config.network.connect_timeout_secs.unwrap_or(10),
            ),
            timeout: Duration::from_secs(external_config.network.timeout_secs.unwrap_or(60)),
            max_retries: external_config.network.max_retries.unwrap_or(3),
            max_restarts: external_config.network.max_restarts,
            url_templates,
        })
    }

    /// 按模板键生成请求地址，`{subdomain}` 与 `{page_size}` 自动填充
    pub fn render_url(&self, template_key: &str, params: &[(&str, &str)]) -> AppResult<String> {
        let template = self.url_templates.get(template_key).ok_or_else(|| {
            AppError::Config(format!("缺少 URL 模板 '{}'", template_key))
        })?;
        let page_size = self.page_size.to_string();
        let mut url = template
            .replace("{subdomain}", &self.subdomain)
            .replace("{page_size}", &page_size);
        for (key, val) in params {
            url = url.replace(&format!("{{{}}}", key), val);
        }
        Ok(url)
    }
}

#[cfg(any(test, feature = "testing"))]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            subdomain: constants::DEFAULT_SUBDOMAIN.to_string(),
            page_size: constants::DEFAULT_PAGE_SIZE,
            user_agent: "test-agent/1.0".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            max_retries: 0,
            max_restarts: None,
            url_templates: default_url_templates(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_url_fills_placeholders() {
        let config = AppConfig::default();
        let url = config
            .render_url(templates::QUIZ_ASSESSMENTS, &[("quiz_id", "42")])
            .unwrap();
        assert!(url.starts_with("https://www.udemy.com/api-2.0/quizzes/42/assessments/"));

        let url = config
            .render_url(templates::CURRICULUM, &[("course_id", "7")])
            .unwrap();
        assert!(url.contains("/courses/7/subscriber-curriculum-items/"));
        assert!(url.contains("page_size=200"));
    }

    #[test]
    fn test_render_url_unknown_template_is_config_error() {
        let config = AppConfig::default();
        let err = config.render_url("NOPE", &[]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_external_config_without_templates_parses() {
        let external: ExternalConfig =
            serde_json::from_str(r#"{"accesstoken": "abc", "network": {"max_restarts": 2}}"#)
                .unwrap();
        assert!(external.url_templates.is_empty());
        assert_eq!(external.subdomain, constants::DEFAULT_SUBDOMAIN);
        assert_eq!(external.network.max_restarts, Some(2));
    }
}
