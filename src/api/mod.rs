//! Boundary to the news backend. Implementations hold no shared state and
//! never retry; every failure goes back to the caller as-is.

mod client;

pub use client::HttpNewsApi;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ArticlePage, DigestResult, SourceRequest};

/// Feed page size.
pub const FEED_PAGE_SIZE: u32 = 9;
/// Page size of the probe used to read the total article count.
pub const TOTAL_PROBE_PAGE_SIZE: u32 = 1;
/// Page size of the probe used to count summarized articles.
pub const SUMMARY_PROBE_PAGE_SIZE: u32 = 50;

#[async_trait]
pub trait NewsApi: Send + Sync {
    /// `GET /news?page=&per_page=`
    async fn fetch_articles(&self, page: u32, per_page: u32) -> Result<ArticlePage>;

    /// `POST /news/fetch`, returning how many new articles were saved.
    async fn submit_source(&self, request: &SourceRequest) -> Result<u32>;

    /// `GET /news/digest`
    async fn fetch_digest(&self) -> Result<DigestResult>;
}
