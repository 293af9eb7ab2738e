//! Remote wheel fetching.
//!
//! Each wheel URL is downloaded into a private staging directory and unpacked
//! straight into the output root. Download and unpack together form one
//! attempt; a [`RetryPolicy`] decides how many attempts a URL gets.
//!
//! # Architecture
//!
//! - [`WheelDownloader`] - fetches an archive to a local file ([`HttpWheelDownloader`])
//! - [`ArchiveExtractor`] - lists and unpacks archives ([`ShellExtractor`])
//! - [`WheelFetcher`] - fans out over URLs and does conflict bookkeeping

mod downloader;
mod error;
mod extractor;
mod fetcher;
mod retry;

pub use downloader::{HttpWheelDownloader, WheelDownloader};
pub use error::WheelError;
pub use extractor::{ArchiveExtractor, ShellExtractor};
pub use fetcher::WheelFetcher;
pub use retry::{RetryExhausted, RetryPolicy};
