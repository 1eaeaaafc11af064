use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;

use crate::api::NewsApi;
use crate::capture::CaptureController;
use crate::command::{Command, HELP};
use crate::config::Config;
use crate::digest::DigestController;
use crate::error::Result;
use crate::feed::FeedManager;
use crate::notify::NotificationQueue;
use crate::overlay::Overlay;
use crate::stats::StatsReporter;
use crate::view::View;

/// Wires the controllers to one backend and one view.
pub struct Dashboard {
    feed: Arc<FeedManager>,
    capture: CaptureController,
    digest: DigestController,
    stats: Arc<StatsReporter>,
    notifications: Arc<NotificationQueue>,
    overlay: Arc<Overlay>,
}

impl Dashboard {
    pub fn new(api: Arc<dyn NewsApi>, view: Arc<dyn View>, config: &Config) -> Self {
        let notifications = Arc::new(NotificationQueue::new(
            Arc::clone(&view),
            config.notification_timeout(),
        ));
        let overlay = Overlay::new(Arc::clone(&view));
        let feed = Arc::new(FeedManager::new(
            Arc::clone(&api),
            Arc::clone(&view),
            Arc::clone(&notifications),
            config.per_page,
            config.date_format.clone(),
        ));
        let stats = Arc::new(StatsReporter::new(
            Arc::clone(&api),
            Arc::clone(&view),
            config.date_format.clone(),
        ));
        let capture = CaptureController::new(
            Arc::clone(&api),
            Arc::clone(&view),
            Arc::clone(&overlay),
            Arc::clone(&notifications),
            Arc::clone(&feed),
            Arc::clone(&stats),
        );
        let digest = DigestController::new(
            api,
            view,
            Arc::clone(&overlay),
            Arc::clone(&notifications),
            config.date_format.clone(),
        );

        Self {
            feed,
            capture,
            digest,
            stats,
            notifications,
            overlay,
        }
    }

    /// First paint: page 1 and the header figures.
    pub async fn start(&self) {
        tracing::info!("Loading dashboard");
        tokio::join!(self.feed.reload(), self.stats.refresh());
    }

    /// Run one user action to completion. `Help` and `Quit` are for the
    /// caller's input loop and do nothing here.
    pub async fn dispatch(&self, command: Command) {
        match command {
            Command::NextPage => {
                self.feed.next_page().await;
            }
            Command::PreviousPage => {
                self.feed.previous_page().await;
            }
            Command::Page(n) => {
                self.feed.load_page(n).await;
            }
            Command::Reload => {
                self.feed.reload().await;
            }
            Command::OpenForm => self.capture.open(),
            Command::SelectKind(kind) => self.capture.select_kind(kind),
            Command::SetField(field, value) => {
                if !self.capture.set_field(field, value) {
                    self.notifications.info("Open the capture form first (`add`)");
                }
            }
            Command::Submit => {
                self.capture.submit().await;
            }
            Command::Cancel => self.capture.cancel(),
            Command::Click(target) => self.capture.click(target),
            Command::Digest => {
                self.digest.generate().await;
            }
            Command::Stats => {
                if let Err(e) = self.stats.try_refresh().await {
                    self.notifications
                        .error(format!("Failed to refresh stats: {}", e.user_message()));
                }
            }
            Command::Dismiss(id) => {
                self.notifications.dismiss(id);
            }
            Command::OpenArticle(n) => self.open_article(n),
            Command::Help | Command::Quit => {}
        }
    }

    /// Read commands line by line until `quit` or end of input.
    ///
    /// Each action runs as its own task so input keeps flowing while a
    /// request is in flight. Actions still running when input ends are
    /// awaited before returning.
    pub async fn serve<R>(self: &Arc<Self>, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut actions = JoinSet::new();
        let mut lines = input.lines();

        while let Some(line) = lines.next_line().await? {
            // Reap finished actions so the set does not grow with the session.
            while actions.try_join_next().is_some() {}

            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(Command::Help) => println!("{HELP}"),
                Ok(command) => {
                    let dashboard = Arc::clone(self);
                    actions.spawn(async move { dashboard.dispatch(command).await });
                }
                Err(e) => eprintln!("{e}"),
            }
        }

        if !actions.is_empty() {
            tracing::debug!("Waiting for {} running actions", actions.len());
        }
        while let Some(finished) = actions.join_next().await {
            if let Err(e) = finished {
                tracing::error!("Action task failed: {}", e);
            }
        }
        Ok(())
    }

    fn open_article(&self, n: usize) {
        let Some(url) = n.checked_sub(1).and_then(|i| self.feed.article_url(i)) else {
            self.notifications
                .error(format!("Article {} has no link on this page", n));
            return;
        };
        if let Err(e) = open::that(&url) {
            tracing::warn!("Failed to open {}: {}", url, e);
            self.notifications
                .error(format!("Could not open the browser: {}", e));
        }
    }

    pub fn feed(&self) -> &FeedManager {
        &self.feed
    }

    pub fn capture(&self) -> &CaptureController {
        &self.capture
    }

    pub fn digest(&self) -> &DigestController {
        &self.digest
    }

    pub fn stats(&self) -> &StatsReporter {
        &self.stats
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay.is_visible()
    }
}
