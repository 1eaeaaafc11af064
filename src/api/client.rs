use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::NewsApi;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{timestamp, Article, ArticlePage, DigestResult, Pagination, SourceRequest};

const USER_AGENT_STRING: &str = concat!("newsdesk/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct NewsBody {
    news: Vec<Article>,
    pagination: Pagination,
}

#[derive(Deserialize)]
struct FetchBody {
    #[serde(default)]
    articles_saved: u32,
}

#[derive(Deserialize)]
struct DigestBody {
    digest: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    generated_at: DateTime<Utc>,
    #[serde(default)]
    articles_count: Option<u32>,
}

#[derive(Clone)]
pub struct HttpNewsApi {
    client: Client,
    base: String,
}

impl HttpNewsApi {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(USER_AGENT_STRING)
            .build()?;

        Ok(Self::with_client(client, &config.api_base))
    }

    pub fn with_client(client: Client, api_base: &str) -> Self {
        Self {
            client,
            base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}/{}", self.base, path))?)
    }

    pub(crate) fn news_url(&self, page: u32, per_page: u32) -> Result<Url> {
        let mut url = self.endpoint("news")?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());
        Ok(url)
    }

    async fn read<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let bytes = response.bytes().await?;
        decode_envelope(status, &bytes)
    }
}

/// Unwrap the backend's `{success, error, ...}` envelope.
///
/// `success: false` wins over the HTTP status, since the backend pairs its
/// error bodies with 400/500 responses.
pub(crate) fn decode_envelope<T: DeserializeOwned>(status: StatusCode, bytes: &[u8]) -> Result<T> {
    let value: Value = match serde_json::from_slice(bytes) {
        Ok(v) => v,
        Err(_) if !status.is_success() => {
            return Err(AppError::Api(format!("HTTP {}", status)));
        }
        Err(e) => return Err(e.into()),
    };

    if value.get("success").and_then(Value::as_bool) == Some(true) {
        return Ok(serde_json::from_value(value)?);
    }

    let message = value
        .get("error")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| {
            if status.is_success() {
                "request failed".to_string()
            } else {
                format!("HTTP {}", status)
            }
        });
    Err(AppError::Api(message))
}

#[async_trait]
impl NewsApi for HttpNewsApi {
    async fn fetch_articles(&self, page: u32, per_page: u32) -> Result<ArticlePage> {
        let url = self.news_url(page, per_page)?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let body: NewsBody = self.read(response).await?;

        Ok(ArticlePage {
            articles: body.news,
            pagination: body.pagination,
        })
    }

    async fn submit_source(&self, request: &SourceRequest) -> Result<u32> {
        let url = self.endpoint("news/fetch")?;
        tracing::debug!("POST {} ({})", url, request.kind());

        let response = self.client.post(url).json(request).send().await?;
        let body: FetchBody = self.read(response).await?;

        Ok(body.articles_saved)
    }

    async fn fetch_digest(&self) -> Result<DigestResult> {
        let url = self.endpoint("news/digest")?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let body: DigestBody = self.read(response).await?;

        Ok(DigestResult {
            text: body.digest,
            generated_at: body.generated_at,
            articles_count: body.articles_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn api(base: &str) -> HttpNewsApi {
        HttpNewsApi::with_client(Client::new(), base)
    }

    fn bytes(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    // ==================== URL building ====================

    #[test]
    fn test_news_url_has_paging_query() {
        let url = api("http://127.0.0.1:5000/api").news_url(2, 9).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/api/news?page=2&per_page=9");
    }

    #[test]
    fn test_trailing_slash_on_base() {
        let url = api("https://example.com/api/").endpoint("news/digest").unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/news/digest");
    }

    #[test]
    fn test_invalid_base_is_url_error() {
        let result = api("not a url").endpoint("news");
        assert!(matches!(result, Err(AppError::Url(_))));
    }

    // ==================== Envelope decoding ====================

    #[test]
    fn test_decode_news_page() {
        let body = bytes(json!({
            "success": true,
            "news": [{ "id": 1, "title": "One" }, { "id": 2, "title": "Two" }],
            "pagination": { "page": 1, "pages": 3, "total": 20, "per_page": 9,
                            "has_next": true, "has_prev": false }
        }));

        let decoded: NewsBody = decode_envelope(StatusCode::OK, &body).unwrap();

        assert_eq!(decoded.news.len(), 2);
        assert_eq!(decoded.news[1].title, "Two");
        assert_eq!(decoded.pagination.pages, 3);
        assert_eq!(decoded.pagination.total, 20);
    }

    #[test]
    fn test_decode_failure_envelope_with_error_status() {
        let body = bytes(json!({ "success": false, "error": "Se requiere api_key para NewsAPI" }));

        let result: Result<FetchBody> = decode_envelope(StatusCode::BAD_REQUEST, &body);

        match result {
            Err(AppError::Api(msg)) => assert_eq!(msg, "Se requiere api_key para NewsAPI"),
            other => panic!("expected Api error, got {:?}", other.map(|b| b.articles_saved)),
        }
    }

    #[test]
    fn test_decode_failure_envelope_with_ok_status() {
        let body = bytes(json!({ "success": false, "error": "boom" }));
        let result: Result<FetchBody> = decode_envelope(StatusCode::OK, &body);
        assert!(matches!(result, Err(AppError::Api(msg)) if msg == "boom"));
    }

    #[test]
    fn test_decode_non_json_error_page() {
        let result: Result<FetchBody> =
            decode_envelope(StatusCode::BAD_GATEWAY, b"<html>Bad Gateway</html>");
        assert!(matches!(result, Err(AppError::Api(msg)) if msg.contains("502")));
    }

    #[test]
    fn test_decode_non_json_success_is_decode_error() {
        let result: Result<FetchBody> = decode_envelope(StatusCode::OK, b"not json");
        assert!(matches!(result, Err(AppError::Decode(_))));
    }

    #[test]
    fn test_decode_missing_success_flag() {
        let body = bytes(json!({ "articles_saved": 3 }));
        let result: Result<FetchBody> = decode_envelope(StatusCode::OK, &body);
        assert!(matches!(result, Err(AppError::Api(msg)) if msg == "request failed"));
    }

    #[test]
    fn test_decode_fetch_count() {
        let body = bytes(json!({
            "success": true,
            "message": "Se capturaron y guardaron 3 noticias",
            "articles_saved": 3
        }));
        let decoded: FetchBody = decode_envelope(StatusCode::OK, &body).unwrap();
        assert_eq!(decoded.articles_saved, 3);
    }

    #[test]
    fn test_decode_digest_with_naive_timestamp() {
        let body = bytes(json!({
            "success": true,
            "digest": "Line1\nLine2",
            "articles_count": 5,
            "generated_at": "2024-06-01T12:00:00.000001"
        }));

        let decoded: DigestBody = decode_envelope(StatusCode::OK, &body).unwrap();

        assert_eq!(decoded.digest, "Line1\nLine2");
        assert_eq!(decoded.articles_count, Some(5));
        assert_eq!(decoded.generated_at.to_rfc3339(), "2024-06-01T12:00:00.000001+00:00");
    }
}
