pub mod cli;
pub mod config;
pub mod core;
pub mod ui;
pub mod utils;

pub use crate::core::{
    select_formats, DownloadRequest, Error, FormatRecord, MediaDownloader, MediaInfo, MediaKind,
    MetadataSource, RawFormat, RawInfo, YtDlp,
};
