use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Why an article's backing file could not be loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadFailure {
    FileMissing,
    ReadFailed,
}

impl LoadFailure {
    /// Text shown in place of the article body
    pub fn placeholder(&self) -> &'static str {
        match self {
            LoadFailure::FileMissing => {
                "⚠️ The article file is missing, please contact the administrator"
            }
            LoadFailure::ReadFailed => "⚠️ The article failed to load, please try again later",
        }
    }
}

/// In-memory state of an article's body.
///
/// `Unloaded` and `Loaded(String::new())` are distinct: an empty file is
/// cached like any other and is not re-read on every access.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CachedContent {
    #[default]
    Unloaded,
    Loaded(String),
    /// Only ever handed out in snapshots; the store keeps such articles `Unloaded`
    /// so the next read retries the file.
    Unavailable(LoadFailure),
}

impl CachedContent {
    pub fn is_loaded(&self) -> bool {
        matches!(self, CachedContent::Loaded(_))
    }

    /// Body text, or the placeholder for a failed load
    pub fn text(&self) -> &str {
        match self {
            CachedContent::Unloaded => "",
            CachedContent::Loaded(text) => text,
            CachedContent::Unavailable(failure) => failure.placeholder(),
        }
    }

    pub fn load_failure(&self) -> Option<LoadFailure> {
        match self {
            CachedContent::Unavailable(failure) => Some(*failure),
            _ => None,
        }
    }
}

/// Article record owned by the archive store
#[derive(Debug, Clone)]
pub struct Article {
    pub id: u64,
    pub title: String,
    pub content: CachedContent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub file_path: Option<PathBuf>,
    pub last_accessed: DateTime<Utc>,
}

impl Article {
    pub fn is_archived(&self) -> bool {
        self.file_path.is_some()
    }
}

/// Lightweight listing entry
#[derive(Debug, Clone, Serialize)]
pub struct ArticleSummary {
    pub id: u64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_archived: bool,
}

impl From<&Article> for ArticleSummary {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id,
            title: article.title.clone(),
            created_at: article.created_at,
            updated_at: article.updated_at,
            is_archived: article.is_archived(),
        }
    }
}

/// Full article as returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct ArticleResponse {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_archived: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<LoadFailure>,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        let is_archived = article.is_archived();
        let load_error = article.content.load_failure();
        let content = match article.content {
            CachedContent::Loaded(text) => text,
            other => other.text().to_string(),
        };
        Self {
            id: article.id,
            title: article.title,
            content,
            created_at: article.created_at,
            updated_at: article.updated_at,
            is_archived,
            load_error,
        }
    }
}

/// Form body for create and update
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleForm {
    pub title: String,
    pub content: String,
}
