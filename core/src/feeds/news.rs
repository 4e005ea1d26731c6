use crate::prelude::{FeedError, FeedResult};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Base endpoint of the news search feed.
pub const NEWS_ENDPOINT: &str = "https://newsapi.org/v2/everything";

/// Sentinel placeholder key; treated the same as unset.
pub const PLACEHOLDER_KEY: &str = "YOUR_NEWSAPI_KEY";

/// Fixed OR-combined disaster keyword query.
pub const DISASTER_QUERY: &str = "earthquake OR fire OR flood OR disaster";

const LANGUAGE: &str = "tr";
const PAGE_SIZE: u32 = 20;

/// One headline mapped out of the news feed. Transient.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsArticle {
    pub title: String,
    pub published_at: Option<DateTime<Utc>>,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    // absence of the collection is a soft failure, not a decode error
    #[serde(default)]
    articles: Option<Vec<RawArticle>>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    #[serde(default)]
    title: String,
    #[serde(rename = "publishedAt", default)]
    published_at: Option<String>,
    #[serde(default)]
    url: String,
}

fn article_from_raw(raw: RawArticle) -> NewsArticle {
    let published_at = raw
        .published_at
        .as_deref()
        .and_then(|stamp| DateTime::parse_from_rfc3339(stamp).ok())
        .map(|stamp| stamp.with_timezone(&Utc));
    NewsArticle {
        title: raw.title,
        published_at,
        url: raw.url,
    }
}

/// HTTP client for the news feed; carries the optional credential.
#[derive(Debug, Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl NewsClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_endpoint(NEWS_ENDPOINT, api_key)
    }

    pub fn with_endpoint(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key,
        }
    }

    /// Reads the credential from the `NEWSAPI_KEY` environment variable.
    pub fn from_env() -> Self {
        Self::new(std::env::var("NEWSAPI_KEY").ok())
    }

    /// Whether a usable credential is present. An empty or placeholder key
    /// counts as unconfigured and must suppress the network call entirely.
    pub fn is_configured(&self) -> bool {
        match self.api_key.as_deref() {
            Some(key) => !key.trim().is_empty() && key != PLACEHOLDER_KEY,
            None => false,
        }
    }

    fn query_params(&self, key: &str) -> Vec<(&'static str, String)> {
        vec![
            ("q", DISASTER_QUERY.to_string()),
            ("language", LANGUAGE.to_string()),
            ("pageSize", PAGE_SIZE.to_string()),
            ("apiKey", key.to_string()),
        ]
    }

    /// Fetches the fixed disaster-keyword search. A response without an
    /// `articles` collection surfaces as [`FeedError::Malformed`].
    pub async fn fetch(&self) -> FeedResult<Vec<NewsArticle>> {
        let key = self
            .api_key
            .as_deref()
            .filter(|_| self.is_configured())
            .ok_or(FeedError::MissingCredential)?;
        let response = self
            .http
            .get(&self.endpoint)
            .query(&self.query_params(key))
            .send()
            .await?;
        let body = response.json::<NewsResponse>().await?;
        let raw = body
            .articles
            .ok_or_else(|| FeedError::Malformed("response has no articles collection".into()))?;
        Ok(raw.into_iter().map(article_from_raw).collect())
    }
}
