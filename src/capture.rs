//! The "capture news" modal: one field set per source kind, validated before
//! anything is sent.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use crate::api::NewsApi;
use crate::error::{AppError, Result};
use crate::feed::FeedManager;
use crate::lock;
use crate::models::{SourceKind, SourceRequest};
use crate::notify::NotificationQueue;
use crate::overlay::Overlay;
use crate::stats::StatsReporter;
use crate::view::View;

pub const DEFAULT_COUNTRY: &str = "us";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ApiKey,
    Country,
    Category,
    RssUrl,
    SiteUrl,
    TitleSelector,
    ContentSelector,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::ApiKey,
        Field::Country,
        Field::Category,
        Field::RssUrl,
        Field::SiteUrl,
        Field::TitleSelector,
        Field::ContentSelector,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::ApiKey => "api_key",
            Field::Country => "country",
            Field::Category => "category",
            Field::RssUrl => "rss_url",
            Field::SiteUrl => "site_url",
            Field::TitleSelector => "title_selector",
            Field::ContentSelector => "content_selector",
        }
    }

    /// The field set this input lives in.
    pub fn kind(&self) -> SourceKind {
        match self {
            Field::ApiKey | Field::Country | Field::Category => SourceKind::NewsApi,
            Field::RssUrl => SourceKind::Rss,
            Field::SiteUrl | Field::TitleSelector | Field::ContentSelector => SourceKind::Scraping,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Field::ALL
            .into_iter()
            .find(|f| f.name() == wanted)
            .ok_or_else(|| format!("unknown field: {s}"))
    }
}

/// Raw input values of every field set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFields {
    pub api_key: String,
    pub country: String,
    pub category: String,
    pub rss_url: String,
    pub site_url: String,
    pub title_selector: String,
    pub content_selector: String,
}

impl Default for SourceFields {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
            category: String::new(),
            rss_url: String::new(),
            site_url: String::new(),
            title_selector: String::new(),
            content_selector: String::new(),
        }
    }
}

impl SourceFields {
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::ApiKey => &mut self.api_key,
            Field::Country => &mut self.country,
            Field::Category => &mut self.category,
            Field::RssUrl => &mut self.rss_url,
            Field::SiteUrl => &mut self.site_url,
            Field::TitleSelector => &mut self.title_selector,
            Field::ContentSelector => &mut self.content_selector,
        };
        *slot = value.into();
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::ApiKey => &self.api_key,
            Field::Country => &self.country,
            Field::Category => &self.category,
            Field::RssUrl => &self.rss_url,
            Field::SiteUrl => &self.site_url,
            Field::TitleSelector => &self.title_selector,
            Field::ContentSelector => &self.content_selector,
        }
    }
}

fn required(value: &str, message: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(trimmed.to_string())
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Build the request for `kind`, reading only that kind's fields.
pub fn build_request(kind: SourceKind, fields: &SourceFields) -> Result<SourceRequest> {
    match kind {
        SourceKind::NewsApi => Ok(SourceRequest::NewsApi {
            api_key: required(&fields.api_key, "Please enter your NewsAPI key")?,
            country: required(&fields.country, "Please choose a country for NewsAPI")?,
            category: optional(&fields.category),
        }),
        SourceKind::Rss => Ok(SourceRequest::Rss {
            rss_url: required(&fields.rss_url, "Please enter the RSS feed URL")?,
        }),
        SourceKind::Scraping => {
            let message = "Please fill in the site URL and the title selector for web scraping";
            Ok(SourceRequest::Scraping {
                site_url: required(&fields.site_url, message)?,
                title_selector: required(&fields.title_selector, message)?,
                content_selector: optional(&fields.content_selector),
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Hidden,
    Shown,
}

/// Where a pointer press on the open modal landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Backdrop,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The modal was not open.
    NotOpen,
    /// Rejected client-side; nothing was sent.
    Invalid,
    Saved(u32),
    Failed,
}

#[derive(Debug, Default)]
struct FormState {
    modal: ModalState,
    kind: SourceKind,
    fields: SourceFields,
}

pub struct CaptureController {
    api: Arc<dyn NewsApi>,
    view: Arc<dyn View>,
    overlay: Arc<Overlay>,
    notifications: Arc<NotificationQueue>,
    feed: Arc<FeedManager>,
    stats: Arc<StatsReporter>,
    form: Mutex<FormState>,
}

impl CaptureController {
    pub fn new(
        api: Arc<dyn NewsApi>,
        view: Arc<dyn View>,
        overlay: Arc<Overlay>,
        notifications: Arc<NotificationQueue>,
        feed: Arc<FeedManager>,
        stats: Arc<StatsReporter>,
    ) -> Self {
        Self {
            api,
            view,
            overlay,
            notifications,
            feed,
            stats,
            form: Mutex::new(FormState::default()),
        }
    }

    pub fn open(&self) {
        let mut form = lock(&self.form);
        if form.modal == ModalState::Shown {
            return;
        }
        form.modal = ModalState::Shown;
        self.view.show_modal();
        self.view.show_field_set(form.kind);
    }

    /// Hide the modal and reset every field, whichever set was active.
    pub fn close(&self) {
        let mut form = lock(&self.form);
        *form = FormState::default();
        self.view.hide_modal();
        self.view.reset_form();
    }

    pub fn cancel(&self) {
        self.close();
    }

    /// A press on the backdrop closes the modal; one inside the content does not.
    pub fn click(&self, target: ClickTarget) {
        if target == ClickTarget::Backdrop && self.modal() == ModalState::Shown {
            self.close();
        }
    }

    pub fn select_kind(&self, kind: SourceKind) {
        let mut form = lock(&self.form);
        form.kind = kind;
        if form.modal == ModalState::Shown {
            self.view.show_field_set(kind);
        }
    }

    /// Edit an input. Ignored while the modal is hidden.
    pub fn set_field(&self, field: Field, value: impl Into<String>) -> bool {
        let mut form = lock(&self.form);
        if form.modal != ModalState::Shown {
            tracing::debug!("Ignoring edit of {} while the form is closed", field);
            return false;
        }
        form.fields.set(field, value);
        true
    }

    pub fn modal(&self) -> ModalState {
        lock(&self.form).modal
    }

    pub fn kind(&self) -> SourceKind {
        lock(&self.form).kind
    }

    pub fn fields(&self) -> SourceFields {
        lock(&self.form).fields.clone()
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let built = {
            let form = lock(&self.form);
            if form.modal != ModalState::Shown {
                return SubmitOutcome::NotOpen;
            }
            build_request(form.kind, &form.fields)
        };

        let request = match built {
            Ok(request) => request,
            Err(e) => {
                self.notifications.error(e.user_message());
                return SubmitOutcome::Invalid;
            }
        };

        self.close();
        tracing::info!("Capturing news from {}", request.kind().label());

        let result = {
            let _busy = self.overlay.acquire();
            self.api.submit_source(&request).await
        };

        match result {
            Ok(saved) => {
                self.notifications
                    .success(format!("Captured {} new articles", saved));
                tokio::join!(self.feed.reload(), self.stats.refresh());
                SubmitOutcome::Saved(saved)
            }
            Err(e) => {
                self.notifications
                    .error(format!("Error: {}", e.user_message()));
                SubmitOutcome::Failed
            }
        }
    }
}
