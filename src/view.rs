//! Render surface the controllers draw on.
//!
//! Controllers never look up widgets themselves; they build the render models
//! below and hand them to a [`View`]. The terminal binary uses
//! [`crate::console::ConsoleView`], tests use a recording view.

use chrono::{DateTime, Local, Utc};
use std::fmt::Write;

use crate::models::{Notification, NotificationId, SourceKind};

/// Shown instead of a card grid when a page has no articles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub title: &'static str,
    pub hint: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCard {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub source: String,
    pub published: String,
    pub image_url: String,
    /// Swapped in by the view when `image_url` fails to load.
    pub fallback_image_url: &'static str,
    /// The summary was generated by the backend's model.
    pub ai_summary: bool,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedView {
    Empty(EmptyState),
    Grid(Vec<ArticleCard>),
}

impl FeedView {
    pub fn card_count(&self) -> usize {
        match self {
            FeedView::Empty(_) => 0,
            FeedView::Grid(cards) => cards.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationControls {
    Hidden,
    Shown {
        label: String,
        current: u32,
        total: u32,
        prev_enabled: bool,
        next_enabled: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPhase {
    /// Slid in and readable.
    Visible,
    /// Exit transition running; removal follows.
    Leaving,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestView {
    pub lines: Vec<String>,
    pub generated_at: String,
    pub articles_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub total_articles: u64,
    /// `None` leaves the previously shown figure in place.
    pub summarized: Option<usize>,
    pub last_updated: String,
}

pub trait View: Send + Sync {
    fn render_feed(&self, feed: &FeedView);
    fn set_pagination(&self, controls: &PaginationControls);
    fn toggle_overlay(&self, visible: bool);

    fn show_modal(&self);
    fn hide_modal(&self);
    fn show_field_set(&self, kind: SourceKind);
    fn reset_form(&self);

    fn insert_notification(&self, notification: &Notification);
    fn set_notification_phase(&self, id: NotificationId, phase: NotificationPhase);
    fn remove_notification(&self, id: NotificationId);

    fn render_digest(&self, digest: &DigestView);
    fn reveal_digest(&self);
    fn scroll_digest_into_view(&self);

    fn set_stats(&self, stats: &StatsView);
}

/// Format a timestamp in the local time zone.
///
/// Falls back to RFC 3339 when `format` is not a valid strftime pattern.
pub fn local_time(at: &DateTime<Utc>, format: &str) -> String {
    let local = at.with_timezone(&Local);
    let mut out = String::new();
    if write!(out, "{}", local.format(format)).is_err() {
        return local.to_rfc3339();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_local_time_uses_format() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let formatted = local_time(&at, "%Y");
        assert_eq!(formatted, "2024");
    }

    #[test]
    fn test_local_time_bad_format_falls_back() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let formatted = local_time(&at, "%Q");
        assert!(formatted.starts_with("2024-01-1"));
    }

    #[test]
    fn test_card_count() {
        let empty = FeedView::Empty(EmptyState { title: "t", hint: "h" });
        assert_eq!(empty.card_count(), 0);
    }
}
