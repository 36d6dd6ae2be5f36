//! News article model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A climate news article
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    pub published_at: DateTime<Utc>,
}

impl NewsArticle {
    /// Description cut to `max_chars` characters, with an ellipsis when cut
    #[must_use]
    pub fn summary(&self, max_chars: usize) -> String {
        if self.description.chars().count() <= max_chars {
            return self.description.clone();
        }
        let cut: String = self.description.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}
