use thiserror::Error;

/// Errors emitted while fetching the settings object.
///
/// A load failure blocks the editor: nothing but the error is rendered.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Filesystem operation failed.
    #[error("config IO failed: {0}")]
    Io(#[from] std::io::Error),
    /// Payload was not valid JSON.
    #[error("config JSON failed: {0}")]
    Json(#[from] serde_json::Error),
    /// Payload parsed but is not a settings object.
    #[error("config payload malformed: {message}")]
    Malformed { message: String },
    /// The persistence backend could not be reached.
    #[error("config backend unreachable: {0}")]
    Unreachable(String),
}

/// Errors emitted when the persistence backend refuses a save.
///
/// A save failure is surfaced inline; the draft is left untouched.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Filesystem operation failed.
    #[error("config IO failed: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization of the normalized settings failed.
    #[error("config JSON failed: {0}")]
    Json(#[from] serde_json::Error),
    /// The backend rejected the payload.
    #[error("save rejected: {0}")]
    Rejected(String),
    /// Settings were never loaded, so there is nothing to persist.
    #[error("config not loaded")]
    NotLoaded,
}
