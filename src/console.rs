//! Terminal rendering of the dashboard, one block of text per update.

use std::io::Write;
use std::sync::Mutex;

use crate::capture::Field;
use crate::lock;
use crate::models::{Notification, NotificationId, Severity, SourceKind};
use crate::view::{
    ArticleCard, DigestView, FeedView, NotificationPhase, PaginationControls, StatsView, View,
};

const DEFAULT_WIDTH: usize = 80;

pub struct ConsoleView {
    width: usize,
    /// Last summary count shown, kept when a refresh cannot recount.
    summarized: Mutex<Option<usize>>,
    out: Mutex<std::io::Stdout>,
}

impl ConsoleView {
    pub fn new() -> Self {
        let width = std::env::var("COLUMNS")
            .ok()
            .and_then(|c| c.parse::<usize>().ok())
            .filter(|w| *w >= 40)
            .unwrap_or(DEFAULT_WIDTH);
        Self {
            width,
            summarized: Mutex::new(None),
            out: Mutex::new(std::io::stdout()),
        }
    }

    fn print(&self, text: &str) {
        let mut out = lock(&self.out);
        // Output errors (closed pipe) are not worth surfacing.
        let _ = writeln!(out, "{}", text);
        let _ = out.flush();
    }

    fn card_text(&self, index: usize, card: &ArticleCard) -> String {
        let mut heading = format!("{:>2}. {}", index + 1, card.title);
        if card.ai_summary {
            heading.push_str("  [AI]");
        }

        let summary = html2text::from_read(card.summary.as_bytes(), self.width)
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|_| card.summary.clone());
        let wrap = textwrap::Options::new(self.width)
            .initial_indent("    ")
            .subsequent_indent("    ");

        let mut text = String::new();
        text.push_str(&heading);
        text.push('\n');
        text.push_str(&format!("    {} · {}\n", card.source, card.published));
        text.push_str(&textwrap::fill(&summary, &wrap));
        if let Some(link) = &card.link {
            text.push_str(&format!("\n    Read more: {}", link));
        }
        text
    }
}

impl Default for ConsoleView {
    fn default() -> Self {
        Self::new()
    }
}

fn field_set(kind: SourceKind) -> Vec<Field> {
    Field::ALL.into_iter().filter(|f| f.kind() == kind).collect()
}

impl View for ConsoleView {
    fn render_feed(&self, feed: &FeedView) {
        match feed {
            FeedView::Empty(empty) => {
                self.print(&format!("\n  {}\n  {}\n", empty.title, empty.hint));
            }
            FeedView::Grid(cards) => {
                let blocks: Vec<String> = cards
                    .iter()
                    .enumerate()
                    .map(|(i, card)| self.card_text(i, card))
                    .collect();
                self.print(&format!("\n{}\n", blocks.join("\n\n")));
            }
        }
    }

    fn set_pagination(&self, controls: &PaginationControls) {
        if let PaginationControls::Shown {
            label,
            prev_enabled,
            next_enabled,
            ..
        } = controls
        {
            let prev = if *prev_enabled { "< prev" } else { "      " };
            let next = if *next_enabled { "next >" } else { "" };
            self.print(&format!("  {}   {}   {}", prev, label, next));
        }
    }

    fn toggle_overlay(&self, visible: bool) {
        if visible {
            self.print("Working…");
        }
    }

    fn show_modal(&self) {
        self.print("Capture news: choose a source with `kind`, fill fields with `set`, then `submit` or `cancel`.");
    }

    fn hide_modal(&self) {
        tracing::debug!("Capture form closed");
    }

    fn show_field_set(&self, kind: SourceKind) {
        let names: Vec<&str> = field_set(kind).iter().map(Field::name).collect();
        self.print(&format!("  [{}] fields: {}", kind.label(), names.join(", ")));
    }

    fn reset_form(&self) {}

    fn insert_notification(&self, notification: &Notification) {
        let tag = match notification.severity {
            Severity::Info => "info",
            Severity::Success => " ok ",
            Severity::Error => "FAIL",
        };
        self.print(&format!(
            "[{}] #{} {}",
            tag, notification.id, notification.message
        ));
    }

    fn set_notification_phase(&self, _id: NotificationId, _phase: NotificationPhase) {}

    fn remove_notification(&self, id: NotificationId) {
        tracing::trace!("Notification {} removed", id);
    }

    fn render_digest(&self, digest: &DigestView) {
        let mut header = format!("=== News digest · {}", digest.generated_at);
        if let Some(count) = digest.articles_count {
            header.push_str(&format!(" · {} articles", count));
        }
        header.push_str(" ===");

        let wrap = textwrap::Options::new(self.width);
        let body: Vec<String> = digest
            .lines
            .iter()
            .map(|line| textwrap::fill(line, &wrap))
            .collect();
        self.print(&format!("\n{}\n{}\n", header, body.join("\n")));
    }

    // Printed output is already in place at the bottom of the terminal.
    fn reveal_digest(&self) {}

    fn scroll_digest_into_view(&self) {}

    fn set_stats(&self, stats: &StatsView) {
        let summarized = {
            let mut last = lock(&self.summarized);
            if stats.summarized.is_some() {
                *last = stats.summarized;
            }
            *last
        };
        let summarized = summarized
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        self.print(&format!(
            "Articles: {} | With AI summary: {} | Updated: {}",
            stats.total_articles, summarized, stats.last_updated
        ));
    }
}
