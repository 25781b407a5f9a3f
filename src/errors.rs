use thiserror::Error;

/// Errors that can occur while building or querying a slice.
#[derive(Error, Debug)]
pub enum SliceError {
    #[error("unknown element: {id}")]
    UnknownElement { id: String },

    #[error("attribute '{attribute}' is not applicable to element {id}")]
    AttributeNotApplicable { attribute: String, id: String },

    #[error("conflicting registration for element {id}: {message}")]
    ConflictingRegistration { id: String, message: String },

    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SliceError {
    /// Returns `true` for the expected, caller-local "attribute absent" case.
    pub fn is_not_applicable(&self) -> bool {
        matches!(self, SliceError::AttributeNotApplicable { .. })
    }

    pub(crate) fn unknown_element(id: impl ToString) -> Self {
        SliceError::UnknownElement { id: id.to_string() }
    }
}

/// Convenience alias for results using `SliceError`.
pub type Result<T> = std::result::Result<T, SliceError>;
