pub mod session;

use crate::config::{Config, LoadOutcome};
use crate::core::YtDlp;
use crate::ui::console;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::{debug, info};

pub use session::{OutputPolicy, Session, SessionOptions};

pub const DEFAULT_OUTPUT_DIR: &str = "/sdcard/Download/YouTubeDownload/";

/// Exit status when the yt-dlp executable cannot be found.
pub const EXIT_MISSING_DEPENDENCY: i32 = 127;

#[derive(Parser, Debug)]
#[command(name = "yt-grab")]
#[command(about = "Pick a YouTube format interactively and download it with yt-dlp")]
#[command(version)]
pub struct Cli {
    /// yt-dlp executable (name on PATH or a path)
    #[arg(long = "yt-dlp", value_name = "BIN", default_value = "yt-dlp")]
    pub ytdlp: String,

    /// Base download directory
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Configuration file [default: ~/.config/YtDownloader/config.json]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Take download paths, filename templates and embed flags from the configuration file
    #[arg(long)]
    pub use_config: bool,

    /// Do not print the banner on startup
    #[arg(long)]
    pub no_logo: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Run the interactive session and return the process exit status.
    pub async fn run(&self) -> Result<i32> {
        let mut stdout = std::io::stdout();
        let mut stderr = std::io::stderr();

        let ytdlp = match YtDlp::locate(&self.ytdlp) {
            Ok(ytdlp) => ytdlp,
            Err(e) => {
                debug!("{}", e);
                console::error(
                    &mut stderr,
                    "yt-dlp not found, install it first with: pip install yt-dlp",
                );
                return Ok(EXIT_MISSING_DEPENDENCY);
            }
        };

        let config = self.load_config(&mut stderr);
        let output = if self.use_config {
            for (path, e) in config.ensure_download_paths() {
                console::error(
                    &mut stderr,
                    format_args!("Failed to create download directory {}: {}", path.display(), e),
                );
            }
            OutputPolicy::Configured(config)
        } else {
            OutputPolicy::Fixed(self.output.clone())
        };

        if !self.no_logo {
            console::logo(&mut stdout);
        }

        info!("Using {}", ytdlp.bin().display());

        let options = SessionOptions {
            output,
            spinner: true,
        };
        let input = BufReader::new(tokio::io::stdin());
        let mut session = Session::new(ytdlp.clone(), ytdlp, input, stdout, stderr, options);
        session.run().await?;

        Ok(0)
    }

    fn load_config(&self, stderr: &mut std::io::Stderr) -> Config {
        let Some(path) = self.config.clone().or_else(Config::default_path) else {
            console::warning(stderr, "No home directory found. Using default configuration.");
            return Config::default();
        };

        match Config::load(&path) {
            Ok((config, LoadOutcome::Loaded)) => config,
            Ok((config, LoadOutcome::Created)) => {
                console::warning(
                    stderr,
                    format_args!("{} not found. Creating with default values.", path.display()),
                );
                config
            }
            Ok((config, LoadOutcome::Reset(reason))) => {
                console::error(
                    stderr,
                    format_args!(
                        "Error reading {}: {}. Using default configuration.",
                        path.display(),
                        reason
                    ),
                );
                config
            }
            Err(e) => {
                console::error(
                    stderr,
                    format_args!("Error saving {}: {}", path.display(), e),
                );
                Config::default()
            }
        }
    }
}
