use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level document printed by `yt-dlp --dump-json`.
///
/// Only the keys this tool reads are modelled; everything else is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawInfo {
    pub title: Option<String>,
    pub channel: Option<String>,
    pub uploader: Option<String>,
    pub duration_string: Option<String>,
    pub webpage_url: Option<String>,
    #[serde(rename = "_version")]
    pub version: Option<ToolVersion>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub formats: Vec<RawFormat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolVersion {
    pub version: Option<String>,
}

/// One entry of the `formats` array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFormat {
    pub format_id: Option<String>,
    pub ext: Option<String>,
    pub acodec: Option<String>,
    pub vcodec: Option<String>,
    pub abr: Option<f64>, // audio bitrate, kbps
    pub asr: Option<f64>, // audio sample rate, Hz
    pub height: Option<f64>,
    pub resolution: Option<String>,
    pub filesize: Option<f64>,
    pub filesize_approx: Option<f64>,
    pub protocol: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<RawFormat>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<RawFormat>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Which stream the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Video,
    Audio,
}

const VIDEO_EXTENSIONS: &[&str] = &["webm", "mp4", "mkv", "mov"];
const AUDIO_EXTENSIONS: &[&str] = &["m4a", "mp3", "opus", "webm", "aac"];

impl MediaKind {
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            MediaKind::Video => VIDEO_EXTENSIONS,
            MediaKind::Audio => AUDIO_EXTENSIONS,
        }
    }

    pub fn accepts(self, ext: &str) -> bool {
        self.extensions().contains(&ext)
    }

    /// Capitalized name used in success messages ("Downloaded Video to ...").
    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Video => "Video",
            MediaKind::Audio => "Audio",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Video => f.write_str("video"),
            MediaKind::Audio => f.write_str("audio"),
        }
    }
}

/// Descriptive fields shown in the information box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaInfo {
    pub version: Option<String>,
    pub channel: Option<String>,
    pub title: Option<String>,
    pub duration: Option<String>,
    pub uploader: Option<String>,
    pub url: Option<String>,
}

impl MediaInfo {
    pub fn from_raw(raw: &RawInfo) -> Self {
        // yt-dlp titles often carry hashtags; keep only the part before the first one
        let title = raw.title.as_deref().map(|t| match t.split_once('#') {
            Some((head, _)) => head.trim().to_string(),
            None => t.to_string(),
        });

        Self {
            version: raw.version.as_ref().and_then(|v| v.version.clone()),
            channel: raw.channel.clone(),
            title,
            duration: raw.duration_string.clone(),
            uploader: raw.uploader.clone(),
            url: raw.webpage_url.clone(),
        }
    }

    /// Label/value pairs in display order, "Unknown" for anything missing.
    pub fn rows(&self) -> Vec<(String, String)> {
        let field = |label: &str, value: &Option<String>| {
            (
                label.to_string(),
                value.clone().unwrap_or_else(|| "Unknown".to_string()),
            )
        };

        vec![
            field("Version", &self.version),
            field("Channel", &self.channel),
            field("Title", &self.title),
            field("Duration", &self.duration),
            field("Uploader", &self.uploader),
            field("URL", &self.url),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_document() {
        let raw: RawInfo = serde_json::from_str(r#"{"title": "clip", "id": "abc"}"#).unwrap();
        assert_eq!(raw.title.as_deref(), Some("clip"));
        assert!(raw.formats.is_empty());
    }

    #[test]
    fn null_formats_become_empty() {
        let raw: RawInfo = serde_json::from_str(r#"{"formats": null}"#).unwrap();
        assert!(raw.formats.is_empty());
    }

    #[test]
    fn title_is_cut_at_first_hashtag() {
        let raw = RawInfo {
            title: Some("Great song  #music #live".to_string()),
            ..Default::default()
        };
        let info = MediaInfo::from_raw(&raw);
        assert_eq!(info.title.as_deref(), Some("Great song"));
    }

    #[test]
    fn missing_fields_render_unknown() {
        let raw: RawInfo = serde_json::from_str(
            r#"{"channel": "Chan", "_version": {"version": "2024.08.06"}}"#,
        )
        .unwrap();
        let rows = MediaInfo::from_raw(&raw).rows();

        assert_eq!(rows[0], ("Version".to_string(), "2024.08.06".to_string()));
        assert_eq!(rows[1], ("Channel".to_string(), "Chan".to_string()));
        assert_eq!(rows[2].1, "Unknown");
        assert_eq!(rows[5].1, "Unknown");
    }

    #[test]
    fn webm_is_accepted_for_both_kinds() {
        assert!(MediaKind::Video.accepts("webm"));
        assert!(MediaKind::Audio.accepts("webm"));
        assert!(!MediaKind::Video.accepts("m4a"));
        assert!(!MediaKind::Audio.accepts("mkv"));
    }
}
