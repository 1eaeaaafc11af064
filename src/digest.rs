use std::sync::{Arc, Mutex};

use crate::api::NewsApi;
use crate::lock;
use crate::models::DigestResult;
use crate::notify::NotificationQueue;
use crate::overlay::Overlay;
use crate::view::{local_time, DigestView, View};

/// On-demand digest of recent news. Holds at most one result; each successful
/// generation replaces it.
pub struct DigestController {
    api: Arc<dyn NewsApi>,
    view: Arc<dyn View>,
    overlay: Arc<Overlay>,
    notifications: Arc<NotificationQueue>,
    current: Mutex<Option<DigestResult>>,
    date_format: String,
}

impl DigestController {
    pub fn new(
        api: Arc<dyn NewsApi>,
        view: Arc<dyn View>,
        overlay: Arc<Overlay>,
        notifications: Arc<NotificationQueue>,
        date_format: impl Into<String>,
    ) -> Self {
        Self {
            api,
            view,
            overlay,
            notifications,
            current: Mutex::new(None),
            date_format: date_format.into(),
        }
    }

    /// Fetch a fresh digest and show it. On failure the previous digest stays
    /// on screen and `None` is returned.
    pub async fn generate(&self) -> Option<DigestResult> {
        let result = {
            let _busy = self.overlay.acquire();
            self.api.fetch_digest().await
        };

        match result {
            Ok(digest) => {
                self.view.render_digest(&DigestView {
                    lines: digest.lines(),
                    generated_at: local_time(&digest.generated_at, &self.date_format),
                    articles_count: digest.articles_count,
                });
                self.view.reveal_digest();
                self.view.scroll_digest_into_view();
                *lock(&self.current) = Some(digest.clone());

                self.notifications.success("Digest generated successfully");
                Some(digest)
            }
            Err(e) => {
                self.notifications
                    .error(format!("Failed to generate digest: {}", e.user_message()));
                None
            }
        }
    }

    pub fn current(&self) -> Option<DigestResult> {
        lock(&self.current).clone()
    }
}
