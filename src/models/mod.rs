mod article;
mod digest;
mod notification;
mod source;
pub(crate) mod timestamp;

pub(crate) use article::non_blank;
pub use article::{Article, ArticlePage, Pagination};
pub use digest::DigestResult;
pub use notification::{Notification, NotificationId, Severity};
pub use source::{SourceKind, SourceRequest};
