// src/error.rs

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// 服务器以 403 拒绝访问，通常是会话或下载链接过期，可通过重启流程恢复
    #[error("访问被拒绝 (HTTP 403): {url}")]
    AccessForbidden { url: String },
    #[error("未提供 Access Token，无法进行下载")]
    TokenMissing,
    #[error("配置错误: {0}")]
    Config(String),
    #[error("查找失败: {0}")]
    Lookup(String),
    #[error("服务器返回错误状态 {status}: {url}")]
    HttpStatus { status: u16, url: String },
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),
    #[error("网络中间件错误: {0}")]
    NetworkMiddleware(#[from] reqwest_middleware::Error),
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("临时文件持久化失败: {0}")]
    TempFilePersist(#[from] tempfile::PersistError),
    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("无法解析来自 '{url}' 的API响应: {source}")]
    ApiParseFailed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("压缩包写入失败: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("未知错误: {0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// 错误携带的 HTTP 状态码 (如果有)
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AppError::AccessForbidden { .. } => Some(StatusCode::FORBIDDEN.as_u16()),
            AppError::HttpStatus { status, .. } => Some(*status),
            AppError::Network(err)
            | AppError::NetworkMiddleware(reqwest_middleware::Error::Reqwest(err)) => {
                err.status().map(|s| s.as_u16())
            }
            _ => None,
        }
    }

    /// 是否属于可以通过重新拉取课程目录来恢复的认证失败
    pub fn is_auth_failure(&self) -> bool {
        self.status_code() == Some(StatusCode::FORBIDDEN.as_u16())
    }
}

pub type AppResult<T> = Result<T, AppError>;
