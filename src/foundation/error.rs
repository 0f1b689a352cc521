/// Crate-wide result alias.
pub type FxResult<T> = Result<T, FxError>;

/// Errors reported by tree evaluation, program emission and description loading.
///
/// Misuse of the registration protocol is not represented here: those are contract
/// violations and are checked with debug assertions.
#[derive(thiserror::Error, Debug)]
pub enum FxError {
    /// Invalid parameters supplied to a factory or description.
    #[error("validation error: {0}")]
    Validation(String),

    /// A constant evaluation was requested on a node that cannot provide one.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// The program mirror or the backend rejected the tree.
    #[error("codegen error: {0}")]
    Codegen(String),

    /// A description could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FxError {
    /// Build a [`FxError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FxError::Evaluation`].
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`FxError::Codegen`].
    pub fn codegen(msg: impl Into<String>) -> Self {
        Self::Codegen(msg.into())
    }

    /// Build a [`FxError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for FxError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
