use thiserror::Error;

/// Failure while fetching a path from a content source.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connection reset, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("HTTP error! status: {0}")]
    Status(u16),
    /// Local file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Payload was fetched but is not the JSON we expected.
    #[error("invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    /// The in-memory source has nothing under this path.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Failure while turning a user-provided file into a displayable image.
#[derive(Debug, Error)]
pub enum ImageReadError {
    #[error("could not read image: {0}")]
    Io(#[from] std::io::Error),
    #[error("not an image file: {0}")]
    Unsupported(String),
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Every load the player performs. None of these are fatal: the controller
/// swaps in a fallback page and records `user_message()` in its error slot.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load catalog {path}")]
    Catalog {
        path: String,
        #[source]
        source: FetchError,
    },
    #[error("failed to load manifest {path}")]
    Manifest {
        path: String,
        #[source]
        source: FetchError,
    },
    #[error("failed to load final HTML {path}")]
    TerminalArtifact {
        path: String,
        #[source]
        source: FetchError,
    },
    #[error("failed to load step file {file}")]
    StepFile {
        file: String,
        #[source]
        source: FetchError,
    },
    #[error("failed to read image file")]
    ImageRead(#[from] ImageReadError),
}

impl LoadError {
    /// Message shown to the user in the loading-error slot.
    pub fn user_message(&self) -> String {
        match self {
            LoadError::Catalog { .. } => "Failed to load demo catalog".to_string(),
            LoadError::Manifest { .. } => "Failed to load build steps manifest".to_string(),
            LoadError::TerminalArtifact { .. } => "Failed to load final HTML".to_string(),
            LoadError::StepFile { file, .. } => format!("Failed to load step: {file}"),
            LoadError::ImageRead(_) => "Failed to read image file".to_string(),
        }
    }
}
