use regex::Regex;
use std::sync::OnceLock;

const YOUTUBE_URL_PATTERN: &str = concat!(
    r"^(https?://)?(www\.)?",
    r"(youtube\.com/(watch\?v=|embed/|v/|shorts/",
    r"|playlist\?list=|user/|c/|channel/)|youtu\.be/)",
    r"[A-Za-z0-9_-]+",
    r"([?&][A-Za-z0-9_=-]+)*$",
);

/// Accepts the watch/embed/shorts/playlist/channel URL shapes and youtu.be links,
/// with or without scheme and `www.`.
pub fn is_valid_youtube_url(url: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();

    if url.is_empty() {
        return false;
    }

    PATTERN
        .get_or_init(|| Regex::new(YOUTUBE_URL_PATTERN).expect("YouTube URL pattern is valid"))
        .is_match(url)
}

/// Human-readable size in mebibytes, or "unknown" when yt-dlp gave no size.
pub fn format_filesize(bytes: u64) -> String {
    if bytes == 0 {
        return "unknown".to_string();
    }
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}
