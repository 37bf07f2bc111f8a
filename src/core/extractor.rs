use crate::core::{Error, RawInfo, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Anything that can describe the formats available for a URL.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<RawInfo>;
}

/// Handle on the external yt-dlp executable.
#[derive(Debug, Clone)]
pub struct YtDlp {
    bin: PathBuf,
}

impl YtDlp {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    /// Resolve `name` on PATH (or as a path) and fail if it is not installed.
    pub fn locate(name: &str) -> Result<Self> {
        let bin = which::which(name).map_err(|e| {
            Error::ToolInvocation(format!("{} not found: {}", name, e))
        })?;
        debug!("Using yt-dlp at {}", bin.display());
        Ok(Self::new(bin))
    }

    pub fn bin(&self) -> &Path {
        &self.bin
    }

    pub(crate) fn command(&self) -> Command {
        let mut command = Command::new(&self.bin);
        // an interrupted fetch or download must not leave yt-dlp running
        command.kill_on_drop(true);
        command
    }
}

#[async_trait]
impl MetadataSource for YtDlp {
    async fn fetch(&self, url: &str) -> Result<RawInfo> {
        debug!("Fetching metadata: {} {} --dump-json", self.bin.display(), url);

        let output = self
            .command()
            .arg(url)
            .arg("--dump-json")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::ToolInvocation(format!("Unexpected error: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::ToolInvocation(format!(
                "yt-dlp error: {}",
                stderr.trim()
            )));
        }

        parse_metadata(&output.stdout)
    }
}

/// Parse the single JSON object yt-dlp prints in `--dump-json` mode.
pub fn parse_metadata(stdout: &[u8]) -> Result<RawInfo> {
    Ok(serde_json::from_slice(stdout)?)
}
