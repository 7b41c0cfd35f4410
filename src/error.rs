use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("playback rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("site catalog is not valid JSON: {0}")]
    Catalog(#[from] serde_json::Error),
    #[error("project `{title}` declares unknown media type `{kind}`")]
    UnknownMediaKind { title: String, kind: String },
}
