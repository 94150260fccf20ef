// src/catalog/fetcher.rs

use crate::{
    client::{Transport, fetch_json},
    error::AppResult,
    models::api::Page,
    ui::FetchProgress,
};
use log::{debug, info};
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

/// 顺着 `next` 游标逐页拉取分页列表接口，按响应顺序拼接每一页的 `results`。
pub struct CatalogFetcher<'a> {
    transport: &'a dyn Transport,
    progress: &'a dyn FetchProgress,
}

impl<'a> CatalogFetcher<'a> {
    pub fn new(transport: &'a dyn Transport, progress: &'a dyn FetchProgress) -> Self {
        Self { transport, progress }
    }

    /// 任意一页失败都会直接返回该错误，不返回部分结果。
    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        first_page_url: &str,
        headers: &HeaderMap,
    ) -> AppResult<Vec<T>> {
        self.progress.begin("正在获取课程目录");
        match self.collect_pages(first_page_url, headers).await {
            Ok(records) => {
                self.progress.finish();
                Ok(records)
            }
            Err(e) => {
                self.progress.fail();
                Err(e)
            }
        }
    }

    async fn collect_pages<T: DeserializeOwned>(
        &self,
        first_page_url: &str,
        headers: &HeaderMap,
    ) -> AppResult<Vec<T>> {
        let mut records = Vec::new();
        let mut next_url = Some(first_page_url.to_string());
        let mut page_count = 0usize;

        // 每一页的地址取决于上一页的响应，只能串行
        while let Some(url) = next_url.take() {
            page_count += 1;
            debug!("拉取目录第 {} 页: {}", page_count, url);
            let page: Page<T> = fetch_json(self.transport, &url, headers).await?;
            records.extend(page.results);
            next_url = page.next.filter(|next| !next.is_empty());
        }

        info!("目录拉取完成，共 {} 页 {} 条记录", page_count, records.len());
        Ok(records)
    }
}
