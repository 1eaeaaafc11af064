//! Fakes shared by the unit tests: a scripted backend and a view that records
//! every render call.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::api::NewsApi;
use crate::error::{AppError, Result};
use crate::lock;
use crate::models::{
    Article, ArticlePage, DigestResult, Notification, NotificationId, Pagination, Severity,
    SourceKind, SourceRequest,
};
use crate::view::{DigestView, FeedView, NotificationPhase, PaginationControls, StatsView, View};

pub fn article(id: i64, title: &str) -> Article {
    Article {
        id,
        title: title.to_string(),
        summary: None,
        description: None,
        content: None,
        source_name: None,
        author: None,
        published_at: None,
        created_at: None,
        url: None,
        url_to_image: None,
    }
}

pub fn page(articles: Vec<Article>, page: u32, pages: u32, total: u64) -> ArticlePage {
    ArticlePage {
        articles,
        pagination: Pagination {
            page,
            pages,
            total,
            per_page: None,
            has_next: page < pages,
            has_prev: page > 1,
        },
    }
}

pub fn digest(text: &str) -> DigestResult {
    DigestResult {
        text: text.to_string(),
        generated_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        articles_count: Some(5),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchArticles { page: u32, per_page: u32 },
    SubmitSource(SourceRequest),
    FetchDigest,
}

/// Backend fake answering from per-operation queues. An empty queue answers
/// with an API error.
#[derive(Default)]
pub struct ScriptedApi {
    calls: Mutex<Vec<Call>>,
    articles: Mutex<HashMap<u32, VecDeque<Result<ArticlePage>>>>,
    submissions: Mutex<VecDeque<Result<u32>>>,
    digests: Mutex<VecDeque<Result<DigestResult>>>,
}

impl ScriptedApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a response for the next `fetch_articles` with this page size.
    pub fn push_articles(&self, per_page: u32, response: Result<ArticlePage>) {
        lock(&self.articles)
            .entry(per_page)
            .or_default()
            .push_back(response);
    }

    pub fn push_submission(&self, response: Result<u32>) {
        lock(&self.submissions).push_back(response);
    }

    pub fn push_digest(&self, response: Result<DigestResult>) {
        lock(&self.digests).push_back(response);
    }

    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    fn unscripted() -> AppError {
        AppError::Api("no scripted response".to_string())
    }
}

#[async_trait]
impl NewsApi for ScriptedApi {
    async fn fetch_articles(&self, page: u32, per_page: u32) -> Result<ArticlePage> {
        lock(&self.calls).push(Call::FetchArticles { page, per_page });
        lock(&self.articles)
            .get_mut(&per_page)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(Self::unscripted()))
    }

    async fn submit_source(&self, request: &SourceRequest) -> Result<u32> {
        lock(&self.calls).push(Call::SubmitSource(request.clone()));
        lock(&self.submissions)
            .pop_front()
            .unwrap_or_else(|| Err(Self::unscripted()))
    }

    async fn fetch_digest(&self) -> Result<DigestResult> {
        lock(&self.calls).push(Call::FetchDigest);
        lock(&self.digests)
            .pop_front()
            .unwrap_or_else(|| Err(Self::unscripted()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Feed(FeedView),
    Pagination(PaginationControls),
    Overlay(bool),
    ModalShown,
    ModalHidden,
    FieldSet(SourceKind),
    FormReset,
    NotificationInserted(Notification),
    NotificationPhase(NotificationId, NotificationPhase),
    NotificationRemoved(NotificationId),
    Digest(DigestView),
    DigestRevealed,
    DigestScrolled,
    Stats(StatsView),
}

#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        lock(&self.events).clone()
    }

    fn record(&self, event: ViewEvent) {
        lock(&self.events).push(event);
    }

    fn last<T>(&self, pick: impl Fn(&ViewEvent) -> Option<T>) -> Option<T> {
        lock(&self.events).iter().rev().find_map(pick)
    }

    pub fn last_feed(&self) -> Option<FeedView> {
        self.last(|e| match e {
            ViewEvent::Feed(f) => Some(f.clone()),
            _ => None,
        })
    }

    pub fn last_pagination(&self) -> Option<PaginationControls> {
        self.last(|e| match e {
            ViewEvent::Pagination(p) => Some(p.clone()),
            _ => None,
        })
    }

    pub fn last_digest(&self) -> Option<DigestView> {
        self.last(|e| match e {
            ViewEvent::Digest(d) => Some(d.clone()),
            _ => None,
        })
    }

    pub fn last_stats(&self) -> Option<StatsView> {
        self.last(|e| match e {
            ViewEvent::Stats(s) => Some(s.clone()),
            _ => None,
        })
    }

    pub fn last_field_set(&self) -> Option<SourceKind> {
        self.last(|e| match e {
            ViewEvent::FieldSet(k) => Some(*k),
            _ => None,
        })
    }

    pub fn overlay_visible(&self) -> Option<bool> {
        self.last(|e| match e {
            ViewEvent::Overlay(v) => Some(*v),
            _ => None,
        })
    }

    /// Whether the modal is open according to the last show/hide call.
    pub fn modal_open(&self) -> bool {
        self.last(|e| match e {
            ViewEvent::ModalShown => Some(true),
            ViewEvent::ModalHidden => Some(false),
            _ => None,
        })
        .unwrap_or(false)
    }

    pub fn notification_messages(&self) -> Vec<String> {
        lock(&self.events)
            .iter()
            .filter_map(|e| match e {
                ViewEvent::NotificationInserted(n) => Some(n.message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn notifications_with(&self, severity: Severity) -> Vec<String> {
        lock(&self.events)
            .iter()
            .filter_map(|e| match e {
                ViewEvent::NotificationInserted(n) if n.severity == severity => {
                    Some(n.message.clone())
                }
                _ => None,
            })
            .collect()
    }
}

impl View for RecordingView {
    fn render_feed(&self, feed: &FeedView) {
        self.record(ViewEvent::Feed(feed.clone()));
    }

    fn set_pagination(&self, controls: &PaginationControls) {
        self.record(ViewEvent::Pagination(controls.clone()));
    }

    fn toggle_overlay(&self, visible: bool) {
        self.record(ViewEvent::Overlay(visible));
    }

    fn show_modal(&self) {
        self.record(ViewEvent::ModalShown);
    }

    fn hide_modal(&self) {
        self.record(ViewEvent::ModalHidden);
    }

    fn show_field_set(&self, kind: SourceKind) {
        self.record(ViewEvent::FieldSet(kind));
    }

    fn reset_form(&self) {
        self.record(ViewEvent::FormReset);
    }

    fn insert_notification(&self, notification: &Notification) {
        self.record(ViewEvent::NotificationInserted(notification.clone()));
    }

    fn set_notification_phase(&self, id: NotificationId, phase: NotificationPhase) {
        self.record(ViewEvent::NotificationPhase(id, phase));
    }

    fn remove_notification(&self, id: NotificationId) {
        self.record(ViewEvent::NotificationRemoved(id));
    }

    fn render_digest(&self, digest: &DigestView) {
        self.record(ViewEvent::Digest(digest.clone()));
    }

    fn reveal_digest(&self) {
        self.record(ViewEvent::DigestRevealed);
    }

    fn scroll_digest_into_view(&self) {
        self.record(ViewEvent::DigestScrolled);
    }

    fn set_stats(&self, stats: &StatsView) {
        self.record(ViewEvent::Stats(stats.clone()));
    }
}
