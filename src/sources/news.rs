//! Climate news client
//!
//! Accepts both the newsdata.io shape (`results`, `pubDate`, `link`) and the
//! NewsAPI shape (`articles`, `publishedAt`, `url`).

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::{HttpClient, NewsProvider};
use crate::Result;
use crate::config::NewsConfig;
use crate::error::Service;
use crate::models::NewsArticle;

const FALLBACK_TITLE: &str = "Weather Update";
const FALLBACK_DESCRIPTION: &str = "Latest weather information available.";

pub struct NewsClient {
    http: HttpClient,
    config: NewsConfig,
}

impl NewsClient {
    #[must_use]
    pub fn new(http: HttpClient, config: NewsConfig) -> Self {
        Self { http, config }
    }

    fn url(&self, api_key: &str) -> String {
        format!(
            "{}?apikey={}&q={}&language={}&category={}",
            self.config.base_url,
            urlencoding::encode(api_key),
            urlencoding::encode(&self.config.query),
            urlencoding::encode(&self.config.language),
            urlencoding::encode(&self.config.category)
        )
    }
}

#[async_trait]
impl NewsProvider for NewsClient {
    #[instrument(skip(self))]
    async fn latest(&self) -> Result<Vec<NewsArticle>> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            debug!("No news API key configured, skipping news");
            return Ok(Vec::new());
        };

        let response: NewsResponse = self.http.get_json(Service::News, &self.url(api_key)).await?;
        let mut articles = response.into_articles(Utc::now());
        articles.truncate(self.config.max_articles);

        info!("Fetched {} news articles", articles.len());
        Ok(articles)
    }
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    articles: Option<Vec<RawArticle>>,
    results: Option<Vec<RawArticle>>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    url: Option<String>,
    link: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

impl NewsResponse {
    fn into_articles(self, fetched_at: DateTime<Utc>) -> Vec<NewsArticle> {
        self.articles
            .or(self.results)
            .unwrap_or_default()
            .into_iter()
            .map(|raw| raw.into_article(fetched_at))
            .collect()
    }
}

impl RawArticle {
    fn into_article(self, fetched_at: DateTime<Utc>) -> NewsArticle {
        NewsArticle {
            title: non_blank(self.title).unwrap_or_else(|| FALLBACK_TITLE.to_string()),
            description: non_blank(self.description)
                .or_else(|| non_blank(self.content))
                .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string()),
            url: non_blank(self.url).or_else(|| non_blank(self.link)),
            published_at: self
                .published_at
                .or(self.pub_date)
                .as_deref()
                .and_then(parse_published)
                .unwrap_or(fetched_at),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// RFC 3339 (NewsAPI) or "YYYY-MM-DD HH:MM:SS" in UTC (newsdata.io)
fn parse_published(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}
