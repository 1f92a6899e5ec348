/// Crate-wide result alias.
pub type RouterResult<T> = Result<T, RouterError>;

/// Errors surfaced by navigation, transition construction and playback.
#[derive(thiserror::Error, Debug)]
pub enum RouterError {
    /// An operation was attempted in a state that forbids it.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A transition was cancelled (gesture abort, superseding navigation, explicit abort).
    #[error("aborted: {0}")]
    Abort(String),

    /// Two mounted shared elements in one scene claimed the same id.
    #[error("duplicate shared element id '{id}' in scene '{scene}'")]
    DuplicateSharedElement {
        /// Offending shared element id.
        id: String,
        /// Scene the second insertion targeted.
        scene: String,
    },

    /// Configuration failed validation.
    #[error("config error: {0}")]
    Config(String),

    /// Animation construction or timing failed.
    #[error("animation error: {0}")]
    Animation(String),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RouterError {
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn abort(msg: impl Into<String>) -> Self {
        Self::Abort(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for cancellations, which callers treat as expected rather than fatal.
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Abort(_))
    }
}

impl From<serde_json::Error> for RouterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
