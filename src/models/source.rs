use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The form discriminator: which field set of the capture modal is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    #[default]
    NewsApi,
    Rss,
    Scraping,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::NewsApi, SourceKind::Rss, SourceKind::Scraping];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::NewsApi => "newsapi",
            SourceKind::Rss => "rss",
            SourceKind::Scraping => "scraping",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::NewsApi => "NewsAPI",
            SourceKind::Rss => "RSS feed",
            SourceKind::Scraping => "Web scraping",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newsapi" => Ok(SourceKind::NewsApi),
            "rss" => Ok(SourceKind::Rss),
            "scraping" => Ok(SourceKind::Scraping),
            other => Err(format!("unknown source type: {other}")),
        }
    }
}

/// Body of `POST /news/fetch`. Exactly one shape per submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source_type")]
pub enum SourceRequest {
    #[serde(rename = "newsapi")]
    NewsApi {
        api_key: String,
        country: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category: Option<String>,
    },
    #[serde(rename = "rss")]
    Rss { rss_url: String },
    #[serde(rename = "scraping")]
    Scraping {
        #[serde(rename = "url")]
        site_url: String,
        title_selector: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content_selector: Option<String>,
    },
}

impl SourceRequest {
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceRequest::NewsApi { .. } => SourceKind::NewsApi,
            SourceRequest::Rss { .. } => SourceKind::Rss,
            SourceRequest::Scraping { .. } => SourceKind::Scraping,
        }
    }
}
