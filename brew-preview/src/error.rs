//! Error types for preview operations

use std::io;

/// Errors raised by the DOM layer.
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    /// Writing serialized markup failed
    #[error("serialization failed: {0}")]
    Serialize(#[from] io::Error),
    /// Serialized markup was not valid UTF-8
    #[error("serialized markup is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Errors raised while presenting a rendered document.
#[derive(Debug, thiserror::Error)]
pub enum PresentError {
    /// No container has been supplied to mount into
    #[error("presenter is not mounted")]
    NotMounted,
    /// The rendered markup did not parse into any node
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// The live tree is missing nodes it is expected to hold
    #[error("inconsistent tree state: {0}")]
    InconsistentTreeState(String),
    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Errors raised by a [`crate::render::Renderer`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The renderer cannot be used (missing script or runtime)
    #[error("renderer unavailable: {0}")]
    Unavailable(String),
    /// The renderer ran but did not produce output
    #[error("render failed: {0}")]
    Failed(String),
    /// No renderer registered under the requested name
    #[error("renderer '{0}' not found")]
    NotFound(String),
}

/// Errors raised while fetching remote assets.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("HTTP error for {url}: {message}")]
    Http { url: String, message: String },
    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors raised by the render pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Render(#[from] RenderError),
}
