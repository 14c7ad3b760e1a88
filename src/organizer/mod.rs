//! File organization: canonical store, artist tree and links.
//!
//! Every processed audio file lands once in a flat canonical store.
//! The per-artist/per-album directory gets the artwork plus a relative
//! link back to the store entry, so the audio bytes exist exactly once
//! no matter how many places reference them.
//!
//! # Idempotence
//!
//! Link creation is skipped when the link already exists, so re-runs
//! against a populated tree do not fail on that step. The move steps
//! are not idempotent: each row's artifacts are fresh per iteration,
//! so their source paths only exist once.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::config::{Layout, LinkMode};
use crate::error::{Error, Result, ResultExt};
use crate::sanitize::directory_segment;

/// Final locations of one row's artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizedPaths {
    pub audio: PathBuf,
    pub cover: PathBuf,
}

/// File the finished artifacts into the library layout.
///
/// Moves the audio into the canonical store (filename preserved),
/// moves the cover into `<artists>/<artist>/<album>/`, and creates a
/// relative link from that directory back to the stored audio file.
pub fn organize(
    album_label: &str,
    artist_label: &str,
    audio_path: &Path,
    cover_path: &Path,
    layout: &Layout,
    link_mode: LinkMode,
) -> Result<OrganizedPaths> {
    fs::create_dir_all(&layout.store)
        .with_context(format!("creating store directory {}", layout.store.display()))?;

    let audio_name = audio_path
        .file_name()
        .ok_or_else(|| Error::organization(format!("no filename in {}", audio_path.display())))?;
    let stored_audio = layout.store.join(audio_name);
    move_file(audio_path, &stored_audio)?;

    let song_dir = layout
        .artists
        .join(directory_segment(artist_label))
        .join(directory_segment(album_label));
    fs::create_dir_all(&song_dir)
        .with_context(format!("creating song directory {}", song_dir.display()))?;

    let cover_name = cover_path
        .file_name()
        .ok_or_else(|| Error::organization(format!("no filename in {}", cover_path.display())))?;
    let final_cover = song_dir.join(cover_name);
    move_file(cover_path, &final_cover)?;

    link_audio(&stored_audio, &song_dir.join(audio_name), link_mode)?;

    Ok(OrganizedPaths {
        audio: stored_audio,
        cover: final_cover,
    })
}

/// Move a file, falling back to copy + delete when rename fails
/// (cross-device moves).
fn move_file(source: &Path, dest: &Path) -> Result<()> {
    if fs::rename(source, dest).is_err() {
        fs::copy(source, dest)
            .with_context(format!("copying file to {}", dest.display()))?;
        fs::remove_file(source)
            .with_context(format!("removing source file {}", source.display()))?;
    }
    Ok(())
}

/// Create the reference from the song directory to the stored audio.
///
/// No-op when something already exists at `link_path` (idempotent
/// re-run). `Copy` mode duplicates the bytes for filesystems without
/// link support.
fn link_audio(stored_audio: &Path, link_path: &Path, mode: LinkMode) -> Result<()> {
    // symlink_metadata also catches dangling links
    if fs::symlink_metadata(link_path).is_ok() {
        tracing::debug!(link = %link_path.display(), "Link already present, skipping");
        return Ok(());
    }

    match mode {
        LinkMode::Symlink => {
            let link_dir = link_path
                .parent()
                .ok_or_else(|| Error::organization("link path has no parent"))?;
            let target = relative_path(link_dir, stored_audio)?;
            create_symlink(&target, link_path).with_context(format!(
                "linking {} -> {}",
                link_path.display(),
                target.display()
            ))?;
        }
        LinkMode::Copy => {
            fs::copy(stored_audio, link_path)
                .with_context(format!("copying audio to {}", link_path.display()))?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

/// Express `target` relative to `base` (both are canonicalized first,
/// so both must exist).
fn relative_path(base: &Path, target: &Path) -> Result<PathBuf> {
    let base = fs::canonicalize(base)
        .with_context(format!("resolving {}", base.display()))?;
    let target = fs::canonicalize(target)
        .with_context(format!("resolving {}", target.display()))?;

    let base_parts: Vec<Component> = base.components().collect();
    let target_parts: Vec<Component> = target.components().collect();

    let common = base_parts
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..base_parts.len() {
        rel.push("..");
    }
    for part in &target_parts[common..] {
        rel.push(part);
    }
    Ok(rel)
}
