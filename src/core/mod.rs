pub mod downloader;
pub mod error;
pub mod extractor;
pub mod metadata;
pub mod selector;

pub use downloader::{DownloadRequest, MediaDownloader, DEFAULT_FILENAME_TEMPLATE};
pub use error::{Error, Result};
pub use extractor::{parse_metadata, MetadataSource, YtDlp};
pub use metadata::{MediaInfo, MediaKind, RawFormat, RawInfo};
pub use selector::{select_formats, FormatRecord};
