//! Concurrent wheel fetching with conflict bookkeeping.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::log::Logger;
use crate::paths::relative_to;
use crate::phase::fan_out;
use crate::report::DiagnosticSet;
use crate::{log_debug, log_info, log_warn};

use super::{ArchiveExtractor, RetryPolicy, WheelDownloader, WheelError};

/// Which wheel first committed an output-relative path in this run.
type Claims = DashMap<String, String>;

/// Downloads and unpacks wheels into the output root.
///
/// A wheel entry is conflicting when its destination already existed before
/// the wheel first unpacked (a linked source, generated code, another
/// wheel's file), or when another wheel of the same run committed it first.
/// Claims are committed only after a successful unpack, so an abandoned
/// wheel never causes a conflict. Existing files are never overwritten.
pub struct WheelFetcher<D: WheelDownloader, X: ArchiveExtractor> {
    downloader: Arc<D>,
    extractor: Arc<X>,
    retry: RetryPolicy,
    logger: Arc<dyn Logger>,
    conflicts: DiagnosticSet,
    max_concurrency: usize,
}

impl<D: WheelDownloader, X: ArchiveExtractor> WheelFetcher<D, X> {
    pub fn new(
        downloader: Arc<D>,
        extractor: Arc<X>,
        retry: RetryPolicy,
        logger: Arc<dyn Logger>,
        conflicts: DiagnosticSet,
        max_concurrency: usize,
    ) -> Self {
        Self {
            downloader,
            extractor,
            retry,
            logger,
            conflicts,
            max_concurrency,
        }
    }

    /// Fetch every URL concurrently into `output_root`.
    ///
    /// A URL whose attempts are all exhausted is logged and skipped; its
    /// files are simply absent and it claims nothing.
    pub async fn fetch_all(&self, urls: HashSet<String>, output_root: &Path) {
        log_info!(self.logger, "Building {} python wheels...", urls.len());
        let claims: Arc<Claims> = Arc::new(DashMap::new());

        let elapsed = fan_out(
            "wheel",
            urls,
            self.max_concurrency,
            &self.logger,
            |url| {
                let downloader = Arc::clone(&self.downloader);
                let extractor = Arc::clone(&self.extractor);
                let logger = Arc::clone(&self.logger);
                let conflicts = self.conflicts.clone();
                let claims = Arc::clone(&claims);
                let retry = self.retry;
                let output_root = output_root.to_path_buf();
                async move {
                    // Kept across attempts: a retry must judge each entry by
                    // what was on disk before this wheel's first unpack.
                    let seen = FirstSight::new();
                    let outcome = retry
                        .run(|attempt| {
                            if attempt > 1 {
                                log_debug!(logger, "Retrying wheel {} (attempt {})", url, attempt);
                            }
                            fetch_once(&*downloader, &*extractor, &url, &output_root, &seen)
                        })
                        .await;

                    match outcome {
                        Ok(entries) => {
                            log_debug!(logger, "Unpacked {} files from {}", entries.len(), url);
                            for relative in entries {
                                if commit_claim(&claims, &seen, &url, &relative) {
                                    conflicts.insert(relative);
                                }
                            }
                        }
                        Err(exhausted) => {
                            log_warn!(
                                logger,
                                "Cannot fetch and unzip remote python dependency at `{}` after {} attempts.",
                                url,
                                exhausted.errors.len()
                            );
                            for (index, error) in exhausted.errors.iter().enumerate() {
                                log_warn!(logger, "Attempt {} failed: {}", index + 1, error);
                            }
                        }
                    }
                }
            },
        )
        .await;

        log_info!(self.logger, "Built python wheels in {}ms.", elapsed);
    }
}

/// Per-URL record of whether each entry's destination existed when the
/// wheel first listed it.
type FirstSight = DashMap<String, bool>;

/// Claim `relative` for `url` after a successful unpack.
///
/// Returns true when the entry conflicts: another wheel committed it first,
/// or it was already on disk before this wheel first touched it.
fn commit_claim(claims: &Claims, seen: &FirstSight, url: &str, relative: &str) -> bool {
    let preexisting = seen.get(relative).map(|e| *e).unwrap_or(false);
    match claims.entry(relative.to_string()) {
        Entry::Occupied(owner) => owner.get() != url || preexisting,
        Entry::Vacant(slot) => {
            slot.insert(url.to_string());
            preexisting
        }
    }
}

/// One download+unpack attempt for `url`.
///
/// Returns the output-relative paths of the unpacked entries.
async fn fetch_once<D: WheelDownloader, X: ArchiveExtractor>(
    downloader: &D,
    extractor: &X,
    url: &str,
    output_root: &Path,
    seen: &FirstSight,
) -> Result<Vec<String>, WheelError> {
    let staging = tempfile::Builder::new()
        .prefix("pyassembler-wheel")
        .tempdir()
        .map_err(|e| WheelError::io(std::env::temp_dir(), e))?;
    let archive = staging.path().join(archive_file_name(url));

    downloader.download(url, &archive).await?;

    let mut entries = Vec::new();
    for entry in extractor.list_contents(&archive).await? {
        let destination = output_root.join(&entry);
        let relative = relative_to(output_root, &destination);
        if relative.is_empty() || relative.starts_with("..") {
            continue;
        }
        if !seen.contains_key(&relative) {
            let exists = tokio::fs::symlink_metadata(&destination).await.is_ok();
            seen.entry(relative.clone()).or_insert(exists);
        }
        entries.push(relative);
    }

    tokio::fs::create_dir_all(output_root)
        .await
        .map_err(|e| WheelError::io(output_root, e))?;
    extractor.extract(&archive, output_root).await?;
    Ok(entries)
}

/// File name for the staged archive: the URL's last path segment.
fn archive_file_name(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .filter(|segment| !segment.contains(':'))
        .unwrap_or("wheel.whl")
        .to_string()
}
