use crate::core::{Error, Result, YtDlp};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

pub const DEFAULT_FILENAME_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Everything yt-dlp needs to fetch one chosen format.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRequest {
    pub url: String,
    pub format_id: String,
    pub output_dir: PathBuf,
    pub filename_template: String,
    pub embed_metadata: bool,
    pub embed_thumbnail: bool,
}

impl DownloadRequest {
    pub fn output_template(&self) -> String {
        self.output_dir
            .join(&self.filename_template)
            .display()
            .to_string()
    }

    /// Arguments passed to yt-dlp, in order.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["-c".to_string()];
        if self.embed_metadata {
            args.push("--embed-metadata".to_string());
        }
        if self.embed_thumbnail {
            args.push("--embed-thumbnail".to_string());
        }
        args.push(self.url.clone());
        args.push("-f".to_string());
        args.push(self.format_id.clone());
        args.push("-o".to_string());
        args.push(self.output_template());
        args
    }
}

#[async_trait]
pub trait MediaDownloader: Send + Sync {
    async fn download(&self, request: &DownloadRequest) -> Result<()>;
}

#[async_trait]
impl MediaDownloader for YtDlp {
    async fn download(&self, request: &DownloadRequest) -> Result<()> {
        tokio::fs::create_dir_all(&request.output_dir)
            .await
            .map_err(|source| Error::CreateDirectory {
                path: request.output_dir.clone(),
                source,
            })?;

        let args = request.args();
        debug!("Running {} {}", self.bin().display(), args.join(" "));

        // inherits the terminal so yt-dlp's own progress output is visible
        let status = self
            .command()
            .args(&args)
            .status()
            .await
            .map_err(|e| Error::ToolInvocation(format!("Unexpected error: {}", e)))?;

        if !status.success() {
            return Err(Error::DownloadFailed(status.to_string()));
        }

        info!("Downloaded {} to {}", request.format_id, request.output_dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> DownloadRequest {
        DownloadRequest {
            url: "https://youtu.be/abc".to_string(),
            format_id: "22".to_string(),
            output_dir: PathBuf::from("/tmp/yt"),
            filename_template: DEFAULT_FILENAME_TEMPLATE.to_string(),
            embed_metadata: true,
            embed_thumbnail: true,
        }
    }

    #[test]
    fn builds_full_argument_list() {
        assert_eq!(
            request().args(),
            vec![
                "-c",
                "--embed-metadata",
                "--embed-thumbnail",
                "https://youtu.be/abc",
                "-f",
                "22",
                "-o",
                "/tmp/yt/%(title)s.%(ext)s",
            ]
        );
    }

    #[test]
    fn embed_flags_are_optional() {
        let mut req = request();
        req.embed_metadata = false;
        req.embed_thumbnail = false;

        let args = req.args();
        assert!(!args.iter().any(|a| a.starts_with("--embed")));
        assert_eq!(args[0], "-c");
        assert_eq!(args[1], "https://youtu.be/abc");
    }

    #[tokio::test]
    async fn missing_binary_fails_without_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let mut req = request();
        req.output_dir = dir.path().join("nested");

        let err = YtDlp::new("/nonexistent/yt-dlp-for-tests")
            .download(&req)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ToolInvocation(_)));
        assert!(req.output_dir.is_dir());
    }

    #[tokio::test]
    async fn unusable_output_dir_is_a_domain_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain-file");
        std::fs::write(&file, b"").unwrap();
        let mut req = request();
        req.output_dir = file.join("sub");

        let err = YtDlp::new("/nonexistent/yt-dlp-for-tests")
            .download(&req)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CreateDirectory { .. }));
        assert!(err.to_string().starts_with("Failed to create directory "));
    }
}
