use crate::config::Config;
use crate::core::{
    select_formats, DownloadRequest, Error, FormatRecord, MediaDownloader, MediaInfo, MediaKind,
    MetadataSource, Result, DEFAULT_FILENAME_TEMPLATE,
};
use crate::ui::{self, console, LoadingIndicator};
use crate::utils::is_valid_youtube_url;
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

/// Where downloads land and how they are named.
#[derive(Debug, Clone)]
pub enum OutputPolicy {
    /// One base directory for both kinds, `%(title)s.%(ext)s`, all embeds on.
    Fixed(PathBuf),
    /// Per-kind directory, template and embed flags from the config file.
    Configured(Config),
}

impl OutputPolicy {
    pub fn directory(&self, kind: MediaKind) -> &Path {
        match self {
            OutputPolicy::Fixed(dir) => dir,
            OutputPolicy::Configured(config) => &config.section(kind).download_path,
        }
    }

    pub fn request(&self, kind: MediaKind, url: &str, format: &FormatRecord) -> DownloadRequest {
        let (filename_template, embed_metadata, embed_thumbnail) = match self {
            OutputPolicy::Fixed(_) => (DEFAULT_FILENAME_TEMPLATE.to_string(), true, true),
            OutputPolicy::Configured(config) => {
                let section = config.section(kind);
                (
                    section.filename_template.clone(),
                    section.embed_metadata,
                    section.embed_thumbnail,
                )
            }
        };

        DownloadRequest {
            url: url.to_string(),
            format_id: format.format_id.clone(),
            output_dir: self.directory(kind).to_path_buf(),
            filename_template,
            embed_metadata,
            embed_thumbnail,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub output: OutputPolicy,
    /// Animate the "Fetching information" line while yt-dlp runs.
    pub spinner: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Download(MediaKind),
    Exit,
}

/// Parse the answer to "Select download method".
pub fn parse_menu_choice(input: &str) -> Result<MenuChoice> {
    let choice: i64 = input
        .trim()
        .parse()
        .map_err(|_| Error::InvalidUserInput("Invalid Input".to_string()))?;

    match choice {
        1 => Ok(MenuChoice::Download(MediaKind::Video)),
        2 => Ok(MenuChoice::Download(MediaKind::Audio)),
        3 => Ok(MenuChoice::Exit),
        _ => Err(Error::InvalidUserInput("Invalid option".to_string())),
    }
}

/// Parse the answer to "Select format number". `Ok(None)` means the user typed 0.
pub fn parse_format_choice(input: &str, count: usize) -> Result<Option<usize>> {
    let choice: i64 = input
        .trim()
        .parse()
        .map_err(|_| Error::InvalidUserInput("Invalid input. Please enter a number".to_string()))?;

    if choice == 0 {
        return Ok(None);
    }
    match usize::try_from(choice) {
        Ok(n) if (1..=count).contains(&n) => Ok(Some(n - 1)),
        _ => Err(Error::InvalidUserInput(format!(
            "Please enter a number between 1 and {}",
            count
        ))),
    }
}

/// Race `fut` against Ctrl-C.
async fn interruptible<F: Future>(fut: F) -> Result<F::Output> {
    tokio::select! {
        output = fut => Ok(output),
        Ok(()) = tokio::signal::ctrl_c() => Err(Error::Interrupted),
    }
}

/// The menu → URL → format → download loop.
pub struct Session<S, D, R, W, E> {
    source: S,
    downloader: D,
    input: R,
    out: W,
    err: E,
    options: SessionOptions,
}

impl<S, D, R, W, E> Session<S, D, R, W, E>
where
    S: MetadataSource,
    D: MediaDownloader,
    R: AsyncBufRead + Unpin,
    W: Write,
    E: Write,
{
    pub fn new(source: S, downloader: D, input: R, out: W, err: E, options: SessionOptions) -> Self {
        Self {
            source,
            downloader,
            input,
            out,
            err,
            options,
        }
    }

    /// Consume the session, handing back its output streams.
    pub fn into_output(self) -> (W, E) {
        (self.out, self.err)
    }

    /// Run until the user exits, presses Ctrl-C at a menu or URL prompt, or
    /// input ends. Only terminal I/O failures are returned as errors.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            let kind = match self.menu_prompt().await {
                Ok(MenuChoice::Download(kind)) => kind,
                Ok(MenuChoice::Exit) | Err(Error::Interrupted) => break,
                Err(e) => return Err(e),
            };

            match self.url_prompt(kind).await {
                Ok(()) => continue,
                Err(Error::Interrupted) => break,
                Err(e) => return Err(e),
            }
        }

        writeln!(self.out, "Exiting...")?;
        Ok(())
    }

    async fn prompt(&mut self, text: &str) -> Result<String> {
        write!(self.out, "{}", text)?;
        self.out.flush()?;

        let mut line = String::new();
        let read = interruptible(self.input.read_line(&mut line)).await;
        match read {
            Ok(Ok(0)) | Err(Error::Interrupted) => {
                // keep the next message off the prompt line
                writeln!(self.out)?;
                Err(Error::Interrupted)
            }
            Ok(Ok(_)) => Ok(line.trim().to_string()),
            Ok(Err(e)) => Err(e.into()),
            Err(e) => Err(e),
        }
    }

    async fn menu_prompt(&mut self) -> Result<MenuChoice> {
        loop {
            writeln!(self.out, "1. Video")?;
            writeln!(self.out, "2. Audio")?;
            writeln!(self.out, "3. Exit")?;

            let answer = self.prompt("Select download method: ").await?;
            match parse_menu_choice(&answer) {
                Ok(choice) => return Ok(choice),
                Err(e) => console::error(&mut self.err, e),
            }
        }
    }

    /// Returns `Ok(())` when the user types 0 to go back to the menu.
    async fn url_prompt(&mut self, kind: MediaKind) -> Result<()> {
        loop {
            let url = self
                .prompt(&format!("Enter {} url (or 0 to cancel): ", kind))
                .await?;

            if is_valid_youtube_url(&url) {
                self.lookup(kind, &url).await?;
            } else if url == "0" {
                return Ok(());
            } else {
                console::error(&mut self.err, format_args!("'{}' Is invalid youtube url", url));
            }
        }
    }

    /// One fetch/select/display/download cycle. Failures are reported here;
    /// only terminal I/O errors escape.
    async fn lookup(&mut self, kind: MediaKind, url: &str) -> Result<()> {
        match self.try_lookup(kind, url).await {
            Ok(()) => Ok(()),
            Err(Error::Io(e)) => Err(Error::Io(e)),
            Err(Error::Interrupted) => {
                console::red(&mut self.out, "Operation cancelled by user");
                Ok(())
            }
            Err(e) => {
                console::error(&mut self.err, e);
                Ok(())
            }
        }
    }

    async fn try_lookup(&mut self, kind: MediaKind, url: &str) -> Result<()> {
        let spinner = if self.options.spinner {
            LoadingIndicator::start("Fetching information")
        } else {
            LoadingIndicator::hidden()
        };
        let fetched = interruptible(self.source.fetch(url)).await.and_then(|r| r);
        spinner.stop();
        let info = fetched?;

        let formats = select_formats(&info.formats, kind);
        if formats.is_empty() {
            return Err(Error::NoSuitableFormats(kind));
        }

        let rows = MediaInfo::from_raw(&info).rows();
        ui::print_lines(&mut self.out, &ui::render_info_box(&rows, "INFORMATION"));
        ui::print_lines(&mut self.out, &ui::render_format_menu(&formats, kind));

        let Some(index) = self.format_prompt(formats.len()).await? else {
            return Ok(());
        };
        let selected = &formats[index];
        writeln!(self.out, "Selected: {}", selected.summary(kind))?;

        let request = self.options.output.request(kind, url, selected);
        debug!("Download request: {:?}", request);

        match interruptible(self.downloader.download(&request))
            .await
            .and_then(|r| r)
        {
            Ok(()) => console::success(
                &mut self.out,
                format_args!("Downloaded {} to {}", kind.label(), request.output_dir.display()),
            ),
            Err(Error::Interrupted) => console::red(&mut self.out, "Download cancelled by user"),
            Err(e) => return Err(e),
        }
        Ok(())
    }

    async fn format_prompt(&mut self, count: usize) -> Result<Option<usize>> {
        loop {
            let answer = match self.prompt("Select format number (or 0 to cancel): ").await {
                Ok(answer) => answer,
                Err(Error::Interrupted) => {
                    console::red(&mut self.out, "Operation cancelled by user");
                    return Ok(None);
                }
                Err(e) => return Err(e),
            };
            if answer.is_empty() {
                continue;
            }

            match parse_format_choice(&answer, count) {
                Ok(Some(index)) => return Ok(Some(index)),
                Ok(None) => {
                    writeln!(self.out, "Download cancelled")?;
                    return Ok(None);
                }
                Err(e) => console::error(&mut self.err, e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::YtDlp;

    fn unused_tool() -> YtDlp {
        YtDlp::new("/nonexistent/yt-dlp-for-tests")
    }

    #[tokio::test]
    async fn exit_choice_ends_session_without_fetching() {
        let input = tokio::io::BufReader::new(tokio_test::io::Builder::new().read(b"3\n").build());
        let options = SessionOptions {
            output: OutputPolicy::Fixed(PathBuf::from("/tmp")),
            spinner: false,
        };
        let mut session = Session::new(unused_tool(), unused_tool(), input, Vec::new(), Vec::new(), options);
        session.run().await.unwrap();

        let (out, err) = session.into_output();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("1. Video\n2. Audio\n3. Exit\nSelect download method: "));
        assert!(out.ends_with("Exiting...\n"));
        assert!(err.is_empty());
    }

    #[test]
    fn menu_choices() {
        assert_eq!(parse_menu_choice("1").unwrap(), MenuChoice::Download(MediaKind::Video));
        assert_eq!(parse_menu_choice(" 2 ").unwrap(), MenuChoice::Download(MediaKind::Audio));
        assert_eq!(parse_menu_choice("3").unwrap(), MenuChoice::Exit);

        assert_eq!(parse_menu_choice("0").unwrap_err().to_string(), "Invalid option");
        assert_eq!(parse_menu_choice("4").unwrap_err().to_string(), "Invalid option");
        assert_eq!(parse_menu_choice("video").unwrap_err().to_string(), "Invalid Input");
    }

    #[test]
    fn format_choices() {
        assert_eq!(parse_format_choice("1", 3).unwrap(), Some(0));
        assert_eq!(parse_format_choice("3", 3).unwrap(), Some(2));
        assert_eq!(parse_format_choice("0", 3).unwrap(), None);

        let err = parse_format_choice("4", 3).unwrap_err();
        assert!(matches!(err, Error::InvalidUserInput(_)));
        assert_eq!(err.to_string(), "Please enter a number between 1 and 3");
        assert!(parse_format_choice("-1", 3).is_err());
        assert_eq!(
            parse_format_choice("abc", 3).unwrap_err().to_string(),
            "Invalid input. Please enter a number"
        );
    }

    #[test]
    fn fixed_policy_uses_default_template() {
        let policy = OutputPolicy::Fixed(PathBuf::from("/sdcard/Download/YouTubeDownload/"));
        let record = FormatRecord {
            format_id: "22".to_string(),
            ext: "mp4".to_string(),
            codec: "avc1".to_string(),
            filesize: 0,
            quality: 720,
            protocol: "https".to_string(),
            abr: 0.0,
            asr: 0,
            resolution: "1280x720".to_string(),
        };

        let request = policy.request(MediaKind::Audio, "https://youtu.be/abc", &record);
        assert_eq!(request.output_template(), "/sdcard/Download/YouTubeDownload/%(title)s.%(ext)s");
        assert!(request.embed_metadata && request.embed_thumbnail);
    }

    #[test]
    fn configured_policy_follows_section() {
        let mut config = Config::default();
        config.audio.embed_thumbnail = false;
        let policy = OutputPolicy::Configured(config);
        let record = FormatRecord {
            format_id: "251".to_string(),
            ext: "webm".to_string(),
            codec: "opus".to_string(),
            filesize: 0,
            quality: 135,
            protocol: "https".to_string(),
            abr: 135.2,
            asr: 48000,
            resolution: "audio only".to_string(),
        };

        let request = policy.request(MediaKind::Audio, "https://youtu.be/abc", &record);
        assert_eq!(request.output_dir, PathBuf::from("/sdcard/Download/YouTubeDownload/Audio/"));
        assert_eq!(request.filename_template, "%(title)s - %(channel)s.%(ext)s");
        assert!(request.embed_metadata);
        assert!(!request.embed_thumbnail);
    }
}
