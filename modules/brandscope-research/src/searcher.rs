use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use brandscope_common::BrandScopeError;

// --- WebSearcher trait ---

/// One ranked search hit.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
}

impl SearchHit {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// Link-discovery search provider: free-text query in, ranked URLs out.
#[async_trait]
pub trait WebSearcher: Send + Sync {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>>;
}

// --- SerpAPI adapter ---

pub struct SerpApiSearcher {
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SerpSearchResponse {
    #[serde(default)]
    organic_results: Vec<SerpResult>,
}

#[derive(Debug, Deserialize)]
struct SerpResult {
    link: String,
    #[serde(default)]
    title: String,
}

impl SerpApiSearcher {
    pub fn new(api_key: String, client: reqwest::Client) -> Self {
        Self { api_key, client }
    }
}

#[async_trait]
impl WebSearcher for SerpApiSearcher {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>> {
        debug!(query, "SerpAPI search");

        let response = self
            .client
            .get("https://serpapi.com/search.json")
            .query(&[
                ("q", query),
                ("api_key", &self.api_key),
                ("num", &max_results.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(BrandScopeError::Search(format!("SerpAPI returned {status}")).into());
        }

        let resp: SerpSearchResponse = response.json().await?;

        Ok(resp
            .organic_results
            .into_iter()
            .map(|r| SearchHit::new(r.link, r.title))
            .collect())
    }
}
