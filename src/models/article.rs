use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub source_name: Option<String>,
    pub author: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_lenient")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_lenient")]
    pub created_at: Option<DateTime<Utc>>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
}

impl Article {
    /// Whether the backend attached a generated summary.
    pub fn has_summary(&self) -> bool {
        non_blank(&self.summary).is_some()
    }
}

/// The backend stores missing text columns as `""`; treat those like `None`.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub pages: u32,
    pub total: u64,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}

/// One page of the feed as returned by `GET /news`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticlePage {
    pub articles: Vec<Article>,
    pub pagination: Pagination,
}
