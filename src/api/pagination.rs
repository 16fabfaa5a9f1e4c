use anyhow::Result;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::ApiClient;

/// List envelope returned by every collection endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
    pub has_more: bool,
}

impl ApiClient {
    /// Drain a paginated endpoint, advancing `skip` until `has_more` goes
    /// false. Pages are concatenated in fetch order.
    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Vec<T>> {
        let limit = self.page_size();
        let mut skip: u64 = 0;
        let mut all = Vec::new();

        loop {
            let mut page_query = query.to_vec();
            page_query.push(("skip".to_string(), skip.to_string()));
            page_query.push(("limit".to_string(), limit.to_string()));

            let page: Page<T> = self
                .request_json(Method::GET, path, &page_query, None)
                .await?;

            let fetched = page.items.len();
            all.extend(page.items);

            tracing::debug!(path, skip, fetched, total = page.total, "Fetched page");

            // An empty page with has_more set would loop forever on a
            // misbehaving server
            if !page.has_more || fetched == 0 {
                break;
            }

            skip += limit;
        }

        Ok(all)
    }
}
