pub mod article;

pub use article::{
    Article, ArticleForm, ArticleResponse, ArticleSummary, CachedContent, LoadFailure,
};
