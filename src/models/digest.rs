use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestResult {
    pub text: String,
    pub generated_at: DateTime<Utc>,
    /// How many articles the backend summarized, when it says so.
    pub articles_count: Option<u32>,
}

impl DigestResult {
    /// Digest text split on line breaks, blank lines kept.
    pub fn lines(&self) -> Vec<String> {
        self.text.lines().map(str::to_string).collect()
    }
}
