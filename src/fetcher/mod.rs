//! Audio and thumbnail fetching via the `yt-dlp` command-line tool.
//!
//! This module shells out to `yt-dlp` rather than using library
//! bindings; the tool's internal behavior is an opaque collaborator.
//! The invocation is wrapped behind the narrow [`Downloader`] trait so
//! the pipeline can be driven by a mock in tests.
//!
//! Install yt-dlp:
//! - Windows: `winget install yt-dlp`
//! - macOS: `brew install yt-dlp`
//! - Linux: `apt install yt-dlp` or `pip install yt-dlp`

mod time_range;

pub use time_range::TimeRange;

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};
use crate::sanitize::track_stem;

/// Thumbnail extensions yt-dlp may produce, in preference order.
const THUMB_EXTS: &[&str] = &["jpg", "webp", "png"];

/// Fixed stem the external tool writes under before the fetcher
/// renames the artifacts.
const DOWNLOAD_STEM: &str = "source";

/// Common installation paths for yt-dlp on Windows
#[cfg(windows)]
const YTDLP_PATHS: &[&str] = &[
    "yt-dlp", // In PATH
    r"C:\Program Files\yt-dlp\yt-dlp.exe",
    r"C:\Program Files (x86)\yt-dlp\yt-dlp.exe",
];

#[cfg(not(windows))]
const YTDLP_PATHS: &[&str] = &[
    "yt-dlp", // In PATH
    "/usr/bin/yt-dlp",
    "/usr/local/bin/yt-dlp",
    "/opt/homebrew/bin/yt-dlp",
];

/// What to fetch and where to put it.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Directory the artifacts land in (the scratch directory)
    pub dest_dir: PathBuf,
    /// Normalized labels used for the sanitized output stem
    pub artist: String,
    pub album: String,
    pub title: String,
    /// Optional section restriction
    pub time_range: Option<TimeRange>,
}

/// The two artifacts a successful fetch produces, correlated by a
/// shared sanitized base filename inside the scratch directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPair {
    pub audio: PathBuf,
    pub thumbnail: PathBuf,
}

/// Narrow interface over the external download tool.
pub trait Downloader {
    /// Fetch one audio stream plus thumbnail for a source URL.
    ///
    /// Post-condition: both paths in the returned pair exist on disk.
    /// No cleanup happens on failure; the driver's scratch-clear step
    /// removes stale files before the next row.
    fn fetch(&self, url: &str, options: &FetchOptions) -> Result<FetchedPair>;
}

/// The real yt-dlp invocation.
pub struct YtDlp;

impl YtDlp {
    /// Find the yt-dlp executable, checking common installation paths
    fn find() -> Option<&'static str> {
        YTDLP_PATHS
            .iter()
            .find(|&path| {
                Command::new(path)
                    .arg("--version")
                    .output()
                    .map(|o| o.status.success())
                    .unwrap_or(false)
            })
            .map(|v| v as _)
    }

    /// Check if yt-dlp is available on the system
    pub fn is_available() -> bool {
        Self::find().is_some()
    }

    /// Get the yt-dlp version string (for diagnostics)
    pub fn version() -> Option<String> {
        let ytdlp = Self::find()?;
        Command::new(ytdlp)
            .arg("--version")
            .output()
            .ok()
            .filter(|o| o.status.success())
            .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
    }
}

impl Downloader for YtDlp {
    fn fetch(&self, url: &str, options: &FetchOptions) -> Result<FetchedPair> {
        let ytdlp = Self::find().ok_or_else(|| {
            Error::external_tool(
                "yt-dlp not found. Install it from https://github.com/yt-dlp/yt-dlp",
            )
        })?;

        std::fs::create_dir_all(&options.dest_dir)?;
        let template = options.dest_dir.join(format!("{DOWNLOAD_STEM}.%(ext)s"));

        let mut command = Command::new(ytdlp);
        command
            .arg("-f")
            .arg("bestaudio")
            .arg("--write-thumbnail")
            .arg("--write-info-json")
            .arg("--extract-audio")
            .arg("--audio-format")
            .arg("mp3")
            .arg("--audio-quality")
            .arg("0")
            .arg("-o")
            .arg(&template);

        if let Some(range) = &options.time_range {
            command.arg("--download-sections").arg(range.section_arg());
        }
        command.arg(url);

        tracing::debug!(url, range = ?options.time_range, "Invoking yt-dlp");

        // Inherit stdio so the tool's own progress output reaches the
        // console; there is no timeout, the tool's behavior governs.
        let status = command
            .status()
            .map_err(|e| Error::external_tool(format!("failed to run yt-dlp: {e}")))?;

        if !status.success() {
            return Err(Error::external_tool(format!(
                "yt-dlp exited with status: {status}"
            )));
        }

        if let Some(title) = read_sidecar_title(&options.dest_dir) {
            tracing::info!(title, "Downloaded");
        }

        rename_artifacts(options)
    }
}

/// Rename the deterministic tool outputs to the sanitized
/// `"artist - album - title"` stem and verify both artifacts exist.
fn rename_artifacts(options: &FetchOptions) -> Result<FetchedPair> {
    let stem = track_stem(&options.artist, &options.album, &options.title);

    let audio_src = options.dest_dir.join(format!("{DOWNLOAD_STEM}.mp3"));
    let audio = options.dest_dir.join(format!("{stem}.mp3"));
    if !audio_src.exists() {
        return Err(Error::missing_artifact(audio_src));
    }
    std::fs::rename(&audio_src, &audio)?;

    let mut thumbnail = None;
    for ext in THUMB_EXTS {
        let candidate = options.dest_dir.join(format!("{DOWNLOAD_STEM}.{ext}"));
        if candidate.exists() {
            let dest = options.dest_dir.join(format!("{stem}.{ext}"));
            std::fs::rename(&candidate, &dest)?;
            thumbnail = Some(dest);
            break;
        }
    }

    let thumbnail = thumbnail.ok_or_else(|| {
        Error::missing_artifact(options.dest_dir.join(format!("{DOWNLOAD_STEM}.jpg")))
    })?;

    Ok(FetchedPair { audio, thumbnail })
}

/// Pull the source title out of the info-JSON sidecar, if present.
/// Used for logging only, so every failure collapses to `None`.
fn read_sidecar_title(dest_dir: &Path) -> Option<String> {
    let sidecar = dest_dir.join(format!("{DOWNLOAD_STEM}.info.json"));
    let contents = std::fs::read_to_string(sidecar).ok()?;
    let info: serde_json::Value = serde_json::from_str(&contents).ok()?;
    info.get("title")?.as_str().map(String::from)
}
