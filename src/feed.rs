//! Paginated article feed: owns the page state and re-renders it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::api::NewsApi;
use crate::error::Result;
use crate::lock;
use crate::models::{Article, ArticlePage};
use crate::notify::NotificationQueue;
use crate::view::{local_time, ArticleCard, EmptyState, FeedView, PaginationControls, View};

pub const PLACEHOLDER_TITLE: &str = "Untitled";
pub const PLACEHOLDER_SUMMARY: &str = "No summary available";
pub const PLACEHOLDER_SOURCE: &str = "Unknown source";
pub const UNKNOWN_DATE: &str = "unknown date";
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x200?text=No+Image";

pub const EMPTY_FEED: EmptyState = EmptyState {
    title: "No news available",
    hint: "Capture some articles to get started",
};

/// What is currently on screen.
///
/// `current_page` is 0 until the first successful load; afterwards
/// `1 <= current_page <= total_pages` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    pub current_page: u32,
    pub total_pages: u32,
    pub articles: Vec<Article>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 0,
            total_pages: 1,
            articles: Vec::new(),
        }
    }
}

impl PageState {
    /// Build the next state from a server page. An empty feed reports
    /// `pages: 0`, which is clamped to a single page.
    pub fn from_page(page: ArticlePage) -> Self {
        let total_pages = page.pagination.pages.max(1);
        Self {
            current_page: page.pagination.page.clamp(1, total_pages),
            total_pages,
            articles: page.articles,
        }
    }

    /// Whether navigating to `page` should issue a request.
    pub fn accepts(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages && page != self.current_page
    }
}

/// Identifies one issued page request. Only the most recently issued request
/// may apply its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LoadTicket {
    seq: u64,
    page: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Out of range or already showing that page; nothing was requested.
    Skipped,
    Applied,
    /// Request failed; the previous page stays on screen.
    Failed,
    /// A newer request was issued while this one was in flight.
    Superseded,
}

pub struct FeedManager {
    api: Arc<dyn NewsApi>,
    view: Arc<dyn View>,
    notifications: Arc<NotificationQueue>,
    state: Mutex<PageState>,
    issued: AtomicU64,
    per_page: u32,
    date_format: String,
}

impl FeedManager {
    pub fn new(
        api: Arc<dyn NewsApi>,
        view: Arc<dyn View>,
        notifications: Arc<NotificationQueue>,
        per_page: u32,
        date_format: impl Into<String>,
    ) -> Self {
        Self {
            api,
            view,
            notifications,
            state: Mutex::new(PageState::default()),
            issued: AtomicU64::new(0),
            per_page,
            date_format: date_format.into(),
        }
    }

    pub async fn load_page(&self, page: u32) -> LoadOutcome {
        let Some(ticket) = self.begin_load(page) else {
            return LoadOutcome::Skipped;
        };
        let result = self.api.fetch_articles(page, self.per_page).await;
        self.finish_load(ticket, result)
    }

    /// Load page 1 even if it is already showing.
    pub async fn reload(&self) -> LoadOutcome {
        let ticket = self.issue(1);
        let result = self.api.fetch_articles(1, self.per_page).await;
        self.finish_load(ticket, result)
    }

    pub async fn next_page(&self) -> LoadOutcome {
        let current = self.current_page();
        self.load_page(current.saturating_add(1)).await
    }

    pub async fn previous_page(&self) -> LoadOutcome {
        let current = self.current_page();
        self.load_page(current.saturating_sub(1)).await
    }

    pub fn state(&self) -> PageState {
        lock(&self.state).clone()
    }

    pub fn current_page(&self) -> u32 {
        lock(&self.state).current_page
    }

    pub fn total_pages(&self) -> u32 {
        lock(&self.state).total_pages
    }

    /// Link of the card at `index` (0-based) on the current page.
    pub fn article_url(&self, index: usize) -> Option<String> {
        let state = lock(&self.state);
        state
            .articles
            .get(index)
            .and_then(|a| crate::models::non_blank(&a.url).map(str::to_string))
    }

    pub(crate) fn begin_load(&self, page: u32) -> Option<LoadTicket> {
        let accepted = lock(&self.state).accepts(page);
        if !accepted {
            tracing::debug!("Ignoring navigation to page {}", page);
            return None;
        }
        Some(self.issue(page))
    }

    fn issue(&self, page: u32) -> LoadTicket {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        LoadTicket { seq, page }
    }

    pub(crate) fn finish_load(&self, ticket: LoadTicket, result: Result<ArticlePage>) -> LoadOutcome {
        // The sequence check and the swap happen under one lock, so a stale
        // response can never land after a newer one.
        let mut state = lock(&self.state);
        let latest = self.issued.load(Ordering::SeqCst);
        if ticket.seq != latest {
            tracing::debug!(
                "Discarding response for page {} (request {} superseded by {})",
                ticket.page,
                ticket.seq,
                latest
            );
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(page) => {
                let next = PageState::from_page(page);
                let feed = render(&next.articles, &self.date_format);
                let controls = pagination_controls(next.current_page, next.total_pages);
                tracing::debug!(
                    "Showing page {}/{} ({} articles)",
                    next.current_page,
                    next.total_pages,
                    next.articles.len()
                );

                *state = next;
                self.view.render_feed(&feed);
                self.view.set_pagination(&controls);
                LoadOutcome::Applied
            }
            Err(e) => {
                drop(state);
                self.notifications
                    .error(format!("Failed to load news: {}", e.user_message()));
                LoadOutcome::Failed
            }
        }
    }
}

/// Turn a page of articles into what the grid shows.
pub fn render(articles: &[Article], date_format: &str) -> FeedView {
    if articles.is_empty() {
        return FeedView::Empty(EMPTY_FEED);
    }
    FeedView::Grid(articles.iter().map(|a| article_card(a, date_format)).collect())
}

pub fn article_card(article: &Article, date_format: &str) -> ArticleCard {
    use crate::models::non_blank;

    let title = article.title.trim();
    ArticleCard {
        id: article.id,
        title: if title.is_empty() { PLACEHOLDER_TITLE } else { title }.to_string(),
        summary: non_blank(&article.summary)
            .or_else(|| non_blank(&article.description))
            .unwrap_or(PLACEHOLDER_SUMMARY)
            .to_string(),
        source: non_blank(&article.source_name)
            .unwrap_or(PLACEHOLDER_SOURCE)
            .to_string(),
        published: article
            .published_at
            .map(|at| local_time(&at, date_format))
            .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
        image_url: non_blank(&article.url_to_image)
            .unwrap_or(PLACEHOLDER_IMAGE)
            .to_string(),
        fallback_image_url: PLACEHOLDER_IMAGE,
        ai_summary: article.has_summary(),
        link: non_blank(&article.url).map(str::to_string),
    }
}

pub fn pagination_controls(current_page: u32, total_pages: u32) -> PaginationControls {
    if total_pages <= 1 {
        return PaginationControls::Hidden;
    }
    PaginationControls::Shown {
        label: format!("Page {} of {}", current_page, total_pages),
        current: current_page,
        total: total_pages,
        prev_enabled: current_page > 1,
        next_enabled: current_page < total_pages,
    }
}
