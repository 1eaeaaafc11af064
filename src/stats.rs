use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

use crate::api::{NewsApi, SUMMARY_PROBE_PAGE_SIZE, TOTAL_PROBE_PAGE_SIZE};
use crate::error::Result;
use crate::lock;
use crate::view::{local_time, StatsView, View};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub total_articles: u64,
    /// Summarized articles among the newest [`SUMMARY_PROBE_PAGE_SIZE`]; not a
    /// global count.
    pub summarized: Option<usize>,
    pub updated_at: DateTime<Utc>,
}

/// Header figures derived from two small feed queries.
pub struct StatsReporter {
    api: Arc<dyn NewsApi>,
    view: Arc<dyn View>,
    date_format: String,
    last: Mutex<Option<StatsSnapshot>>,
}

impl StatsReporter {
    pub fn new(api: Arc<dyn NewsApi>, view: Arc<dyn View>, date_format: impl Into<String>) -> Self {
        Self {
            api,
            view,
            date_format: date_format.into(),
            last: Mutex::new(None),
        }
    }

    /// Re-query and publish the figures, logging failures.
    ///
    /// Used by the automatic refreshes. Without a total nothing is published;
    /// a failed summary probe still publishes the total.
    pub async fn refresh(&self) -> Option<StatsSnapshot> {
        match self.try_refresh().await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!("Failed to refresh stats: {}", e);
                None
            }
        }
    }

    /// Like [`StatsReporter::refresh`], but a failed total probe is returned
    /// to the caller instead of only being logged.
    pub async fn try_refresh(&self) -> Result<StatsSnapshot> {
        let (total, sample) = futures::join!(
            self.api.fetch_articles(1, TOTAL_PROBE_PAGE_SIZE),
            self.api.fetch_articles(1, SUMMARY_PROBE_PAGE_SIZE),
        );

        let total_articles = total?.pagination.total;

        let summarized = match sample {
            Ok(page) => Some(page.articles.iter().filter(|a| a.has_summary()).count()),
            Err(e) => {
                tracing::warn!("Failed to count summaries: {}", e);
                None
            }
        };

        let snapshot = StatsSnapshot {
            total_articles,
            summarized,
            updated_at: Utc::now(),
        };

        self.view.set_stats(&StatsView {
            total_articles,
            summarized,
            last_updated: local_time(&snapshot.updated_at, &self.date_format),
        });
        *lock(&self.last) = Some(snapshot.clone());

        Ok(snapshot)
    }

    pub fn last(&self) -> Option<StatsSnapshot> {
        lock(&self.last).clone()
    }
}
