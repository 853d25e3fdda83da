use thiserror::Error;

/// Errors surfaced by the search engine client.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The engine reported that the named index does not exist. Callers
    /// treat this as "nothing to drop" during a rebuild; it is never a
    /// fatal condition on its own.
    #[error("index not found: {0}")]
    IndexNotFound(String),

    #[error("engine error: {0}")]
    Engine(#[from] redis::RedisError),

    #[error("invalid reply to {command}: {details}")]
    Reply { command: &'static str, details: String },

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stopword list {path}: {source}")]
    Stopwords {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("load cancelled")]
    Cancelled,
}

pub type Result<T, E = LoadError> = std::result::Result<T, E>;
