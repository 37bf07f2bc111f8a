use crate::core::{MediaKind, RawFormat};
use std::collections::HashMap;
use tracing::debug;

/// A candidate format that survived filtering and deduplication.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatRecord {
    pub format_id: String,
    pub ext: String,
    /// Codec of the stream that matters for the requested kind.
    pub codec: String,
    /// Bytes; 0 when yt-dlp reports neither an exact nor an approximate size.
    pub filesize: u64,
    /// Height in pixels for video, truncated kbps for audio.
    pub quality: u32,
    pub protocol: String,
    pub abr: f64,
    pub asr: u32,
    pub resolution: String,
}

impl FormatRecord {
    /// Short description used by the "Selected: ..." line.
    pub fn summary(&self, kind: MediaKind) -> String {
        match kind {
            MediaKind::Video => format!("{} - {}", self.resolution, self.ext),
            MediaKind::Audio => format!("{} - {}", self.bitrate_label(), self.ext),
        }
    }

    pub fn bitrate_label(&self) -> String {
        if self.abr > 0.0 {
            format!("{}kbps", self.abr as u32)
        } else {
            "unknown".to_string()
        }
    }

    fn prefers_http(&self) -> bool {
        self.protocol.contains("http")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GroupKey {
    quality: u32,
    ext: String,
    codec_prefix: String,
}

impl GroupKey {
    fn of(record: &FormatRecord) -> Self {
        Self {
            quality: record.quality,
            ext: record.ext.clone(),
            codec_prefix: record.codec.chars().take(10).collect(),
        }
    }
}

/// Build the ranked candidate list for one media kind.
///
/// Formats with an unaccepted container or without a stream of the requested
/// kind are dropped. Formats sharing quality, container and codec prefix are
/// collapsed to one, preferring HTTP(S) delivery. The result is ordered by
/// quality, best first; ties keep the order in which groups first appeared.
pub fn select_formats(formats: &[RawFormat], kind: MediaKind) -> Vec<FormatRecord> {
    let mut groups: Vec<Vec<FormatRecord>> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for record in formats.iter().filter_map(|raw| to_record(raw, kind)) {
        let key = GroupKey::of(&record);
        match index.get(&key) {
            Some(&slot) => groups[slot].push(record),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![record]);
            }
        }
    }

    let mut selected: Vec<FormatRecord> = groups
        .into_iter()
        .filter_map(|mut group| {
            // stable: first http(s) entry wins, otherwise the first seen
            group.sort_by_key(|r| !r.prefers_http());
            group.into_iter().next()
        })
        .collect();

    selected.sort_by(|a, b| b.quality.cmp(&a.quality));

    debug!(
        "Selected {} of {} {} formats",
        selected.len(),
        formats.len(),
        kind
    );

    selected
}

fn to_record(raw: &RawFormat, kind: MediaKind) -> Option<FormatRecord> {
    let ext = raw.ext.as_deref().filter(|e| kind.accepts(e))?;

    let codec = match kind {
        MediaKind::Audio => raw.acodec.as_deref(),
        MediaKind::Video => raw.vcodec.as_deref(),
    }
    .filter(|c| !c.is_empty() && *c != "none")?;

    let abr = raw.abr.unwrap_or(0.0).max(0.0);
    let quality = match kind {
        MediaKind::Audio => abr as u32,
        MediaKind::Video => raw.height.unwrap_or(0.0).max(0.0) as u32,
    };

    let filesize = raw
        .filesize
        .filter(|s| *s > 0.0)
        .or(raw.filesize_approx)
        .unwrap_or(0.0)
        .max(0.0) as u64;

    Some(FormatRecord {
        format_id: raw.format_id.clone().unwrap_or_default(),
        ext: ext.to_string(),
        codec: codec.to_string(),
        filesize,
        quality,
        protocol: raw.protocol.clone().unwrap_or_default(),
        abr,
        asr: raw.asr.unwrap_or(0.0).max(0.0) as u32,
        resolution: raw
            .resolution
            .clone()
            .unwrap_or_else(|| "unknown".to_string()),
    })
}
