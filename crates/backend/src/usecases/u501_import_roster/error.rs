use thiserror::Error;

/// Failures that abort an upload before or outside the row loop.
/// Row-level problems never surface here; they become row outcomes.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Missing required headers: {}", .0.join(", "))]
    MissingHeaders(Vec<String>),

    #[error("Could not read upload: {0}")]
    UnreadableFile(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<sea_orm::DbErr> for ImportError {
    fn from(err: sea_orm::DbErr) -> Self {
        ImportError::Internal(err.into())
    }
}

impl ImportError {
    /// Caller's fault (400) rather than ours (500)
    pub fn is_validation(&self) -> bool {
        !matches!(self, ImportError::Internal(_))
    }
}
