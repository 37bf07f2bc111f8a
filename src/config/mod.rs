use crate::core::{Error, MediaKind, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Settings for one media kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    pub download_path: PathBuf,
    pub filename_template: String,
    pub embed_thumbnail: bool,
    pub embed_metadata: bool,
}

impl SectionConfig {
    fn defaults_for(kind: MediaKind) -> Self {
        let download_path = match kind {
            MediaKind::Video => "/sdcard/Download/YouTubeDownload/Video/",
            MediaKind::Audio => "/sdcard/Download/YouTubeDownload/Audio/",
        };
        Self {
            download_path: PathBuf::from(download_path),
            filename_template: "%(title)s - %(channel)s.%(ext)s".to_string(),
            embed_thumbnail: true,
            embed_metadata: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub video: SectionConfig,
    pub audio: SectionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            video: SectionConfig::defaults_for(MediaKind::Video),
            audio: SectionConfig::defaults_for(MediaKind::Audio),
        }
    }
}

/// What happened while loading, so the caller can tell the user.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded,
    /// No file existed; one was written with defaults.
    Created,
    /// The file could not be used and was overwritten with defaults.
    Reset(String),
}

impl Config {
    /// `~/.config/YtDownloader/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("YtDownloader").join("config.json"))
    }

    pub fn section(&self, kind: MediaKind) -> &SectionConfig {
        match kind {
            MediaKind::Video => &self.video,
            MediaKind::Audio => &self.audio,
        }
    }

    /// Load the file at `path`, creating or resetting it to defaults as needed.
    ///
    /// Keys present in the file override the defaults per section; missing keys
    /// keep their default value. Failing to write the defaults back is an error,
    /// a broken file is not.
    pub fn load(path: &Path) -> Result<(Self, LoadOutcome)> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            return Ok((config, LoadOutcome::Created));
        }

        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| Self::from_json(&text));

        match parsed {
            Ok(config) => Ok((config, LoadOutcome::Loaded)),
            Err(reason) => {
                let config = Self::default();
                config.save(path)?;
                Ok((config, LoadOutcome::Reset(reason)))
            }
        }
    }

    fn from_json(text: &str) -> std::result::Result<Self, String> {
        let user: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
        let mut merged =
            serde_json::to_value(Self::default()).map_err(|e| e.to_string())?;

        if let (Some(target), Some(source)) = (merged.as_object_mut(), user.as_object()) {
            for section in ["video", "audio"] {
                let (Some(into), Some(from)) = (
                    target.get_mut(section).and_then(Value::as_object_mut),
                    source.get(section).and_then(Value::as_object),
                ) else {
                    continue;
                };
                for (key, value) in from {
                    into.insert(key.clone(), value.clone());
                }
            }
        } else {
            return Err("top-level value is not an object".to_string());
        }

        serde_json::from_value(merged).map_err(|e| e.to_string())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Create both configured download directories, returning the ones that failed.
    pub fn ensure_download_paths(&self) -> Vec<(PathBuf, std::io::Error)> {
        [&self.video.download_path, &self.audio.download_path]
            .into_iter()
            .filter_map(|path| {
                std::fs::create_dir_all(path)
                    .err()
                    .map(|e| (path.clone(), e))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let (config, outcome) = Config::load(&path).unwrap();
        assert_eq!(outcome, LoadOutcome::Created);
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let (reloaded, outcome) = Config::load(&path).unwrap();
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(reloaded, config);
    }

    #[test]
    fn malformed_file_is_reset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let (config, outcome) = Config::load(&path).unwrap();
        assert!(matches!(outcome, LoadOutcome::Reset(_)));
        assert_eq!(config, Config::default());

        let on_disk: Config = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, Config::default());
    }

    #[test]
    fn wrong_types_are_reset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"video": {"embed_thumbnail": "yes"}}"#).unwrap();

        let (_, outcome) = Config::load(&path).unwrap();
        assert!(matches!(outcome, LoadOutcome::Reset(_)));
    }

    #[test]
    fn partial_sections_merge_over_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"audio": {"download_path": "/music", "embed_thumbnail": false}, "extra": 1}"#,
        )
        .unwrap();

        let (config, outcome) = Config::load(&path).unwrap();
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(config.audio.download_path, PathBuf::from("/music"));
        assert!(!config.audio.embed_thumbnail);
        assert!(config.audio.embed_metadata);
        assert_eq!(config.audio.filename_template, "%(title)s - %(channel)s.%(ext)s");
        assert_eq!(config.video, Config::default().video);
    }

    #[test]
    fn ensure_download_paths_creates_directories() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.video.download_path = dir.path().join("v");
        config.audio.download_path = dir.path().join("a");

        assert!(config.ensure_download_paths().is_empty());
        assert!(dir.path().join("v").is_dir());
        assert!(dir.path().join("a").is_dir());
        assert_eq!(config.section(MediaKind::Audio).download_path, dir.path().join("a"));
    }
}
