use thiserror::Error;

/// Failure outcomes of the extraction operations.
///
/// Neither variant is a defect: a filer that never disclosed a value, or an
/// upstream source that is temporarily down, are both normal answers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// No qualifying filing, no matching pattern, or no structured entry
    #[error("not found: {0}")]
    NotFound(String),

    /// A collaborator could not supply the index, a document or the facts
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl ExtractError {
    pub fn not_found(what: impl Into<String>) -> Self {
        ExtractError::NotFound(what.into())
    }

    pub fn upstream(err: impl std::fmt::Display) -> Self {
        ExtractError::UpstreamUnavailable(err.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ExtractError::NotFound(_))
    }
}

pub type ExtractResult<T> = std::result::Result<T, ExtractError>;
