use crate::core::MediaKind;
use thiserror::Error;

/// Everything that can go wrong between picking a URL and finishing a download.
///
/// Each variant is shown to the user as a single line at the nearest prompt;
/// none of them are retried.
#[derive(Debug, Error)]
pub enum Error {
    /// yt-dlp could not be spawned or exited non-zero while fetching metadata.
    #[error("{0}")]
    ToolInvocation(String),

    #[error("Error parsing JSON: {0}")]
    MalformedMetadata(#[from] serde_json::Error),

    #[error("No suitable {0} formats available")]
    NoSuitableFormats(MediaKind),

    #[error("{0}")]
    InvalidUserInput(String),

    #[error("Download process failed ({0})")]
    DownloadFailed(String),

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDirectory {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    /// Ctrl-C or end of input while waiting on the user or on yt-dlp.
    #[error("Operation cancelled by user")]
    Interrupted,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
