//! Acquisition of the cricsheet JSON archives.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;
use tracing::info;
use zip::ZipArchive;

use crate::format::MatchFormat;
use crate::loader::format_dir;

/// Downloads `url`, failing on any non-success status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Bytes> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?)
}

/// Unpacks a zip archive held in memory into `dest` and returns the number of
/// entries it contained.
pub fn extract_archive(bytes: &[u8], dest: &Path) -> Result<usize> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).context("not a zip archive")?;
    let entries = archive.len();
    archive
        .extract(dest)
        .with_context(|| format!("failed to extract into {}", dest.display()))?;
    Ok(entries)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The format's folder already existed; nothing was downloaded.
    AlreadyPresent,
    Downloaded { entries: usize },
}

/// Downloads and unpacks `format` into `<data_dir>/<format>` unless that folder
/// already exists.
///
/// The archive is unpacked into a sibling `.partial` folder first and renamed
/// into place, so an interrupted run never leaves a folder that a later run
/// would mistake for a complete download.
#[tracing::instrument(skip_all, fields(format = %format))]
pub async fn fetch_format<C: HttpClient>(
    client: &C,
    data_dir: &Path,
    format: MatchFormat,
) -> Result<FetchOutcome> {
    let target = format_dir(data_dir, format);
    if target.exists() {
        info!(folder = %target.display(), "Data already downloaded");
        return Ok(FetchOutcome::AlreadyPresent);
    }

    info!(url = format.archive_url(), "Downloading archive");
    let bytes = fetch_bytes(client, format.archive_url())
        .await
        .with_context(|| format!("failed to download {format} archive"))?;

    let staging = data_dir.join(format!("{}.partial", format.as_str()));
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }
    fs::create_dir_all(&staging)?;

    info!(bytes = bytes.len(), "Extracting archive");
    let entries = extract_archive(&bytes, &staging)?;
    fs::rename(&staging, &target)
        .with_context(|| format!("failed to move archive into {}", target.display()))?;

    info!(entries, folder = %target.display(), "Archive extracted");
    Ok(FetchOutcome::Downloaded { entries })
}
