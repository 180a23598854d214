use crate::foundation::stage::Stage;

/// Convenience result type used across codereel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Malformed or incomplete script, configuration or probed media.
    #[error("input error: {0}")]
    Input(String),

    /// Highlight bounds that cannot be mapped onto the code image.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// An external media tool exited non-zero or left no usable artifact behind.
    #[error("media tool error during {stage}: `{command}` ({status}): {stderr}")]
    MediaTool {
        /// Pipeline stage the tool was invoked from.
        stage: Stage,
        /// The invoked command line, for diagnostics only.
        command: String,
        /// Exit status or a short description of the missing artifact.
        status: String,
        /// Trailing part of the tool's stderr.
        stderr: String,
    },

    /// Errors when serializing or deserializing scripts and configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Input`] value.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build a [`ReelError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`ReelError::MediaTool`] value.
    pub fn media_tool(
        stage: Stage,
        command: impl Into<String>,
        status: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::MediaTool {
            stage,
            command: command.into(),
            status: status.into(),
            stderr: stderr.into(),
        }
    }

    /// `true` for errors caused by the caller's script or configuration.
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input(_) | Self::Geometry(_) | Self::Serde(_))
    }

    /// The stage of a failed tool invocation, if this is a [`ReelError::MediaTool`].
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::MediaTool { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
