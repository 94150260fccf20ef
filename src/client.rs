// src/client.rs

use crate::{config::AppConfig, error::*};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{IntoUrl, Response, StatusCode, header::HeaderMap};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// 一次 GET 请求的结果
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: String,
}

/// 目录拉取与练习下载依赖的最小 HTTP 能力。
/// 403 必须映射为 `AppError::AccessForbidden`，其他非 2xx 状态映射为 `AppError::HttpStatus`。
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, headers: &HeaderMap) -> AppResult<TransportResponse>;
}

/// 以 JSON 形式读取并解析一个接口
pub async fn fetch_json<T: DeserializeOwned>(
    transport: &dyn Transport,
    url: &str,
    headers: &HeaderMap,
) -> AppResult<T> {
    let response = transport.get(url, headers).await?;
    serde_json::from_str(&response.body).map_err(|source| AppError::ApiParseFailed {
        url: url.to_string(),
        source,
    })
}

#[derive(Clone)]
pub struct RobustClient {
    pub client: ClientWithMiddleware,
}

impl RobustClient {
    pub fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(
            reqwest::Client::builder()
                .user_agent(config.user_agent.clone())
                .connect_timeout(config.connect_timeout)
                .timeout(config.timeout)
                .build()?,
        )
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

        Ok(Self { client })
    }

    /// 发送 GET 请求并把 403 / 非成功状态转换为对应的错误
    pub async fn get_with_headers<T: IntoUrl>(
        &self,
        url: T,
        headers: &HeaderMap,
    ) -> AppResult<Response> {
        let url = url.into_url()?;
        let res = self.client.get(url).headers(headers.clone()).send().await?;
        check_status(res)
    }
}

fn check_status(res: Response) -> AppResult<Response> {
    let status = res.status();
    if status == StatusCode::FORBIDDEN {
        warn!("请求被拒绝 (403): {}", res.url());
        return Err(AppError::AccessForbidden {
            url: res.url().to_string(),
        });
    }
    if !status.is_success() {
        debug!("请求失败，状态码 {}: {}", status, res.url());
        return Err(AppError::HttpStatus {
            status: status.as_u16(),
            url: res.url().to_string(),
        });
    }
    Ok(res)
}

#[async_trait]
impl Transport for RobustClient {
    async fn get(&self, url: &str, headers: &HeaderMap) -> AppResult<TransportResponse> {
        let res = self.get_with_headers(url, headers).await?;
        let status = res.status();
        let body = res.text().await?;
        Ok(TransportResponse { status, body })
    }
}
