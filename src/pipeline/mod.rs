//! The batch driver.
//!
//! Processes manifest rows strictly one at a time: clear the scratch
//! directory, fetch, crop, tag, organize. A row's artifacts are never
//! cleaned up mid-row on failure; the next row's scratch-clear step
//! removes whatever was left behind.

use std::fs;
use std::path::Path;

use crate::config::{BatchConfig, Layout, RowErrorPolicy};
use crate::cropper;
use crate::error::{Result, ResultExt};
use crate::fetcher::{Downloader, FetchOptions, TimeRange};
use crate::manifest::Row;
use crate::organizer::{self, OrganizedPaths};
use crate::tags::{self, TrackTags};

/// Counts for a completed batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Sequences one manifest's rows through the pipeline stages.
pub struct Pipeline<D> {
    downloader: D,
    layout: Layout,
    batch: BatchConfig,
}

impl<D: Downloader> Pipeline<D> {
    pub fn new(downloader: D, layout: Layout, batch: BatchConfig) -> Self {
        Self {
            downloader,
            layout,
            batch,
        }
    }

    /// Process every row in order.
    ///
    /// With [`RowErrorPolicy::Abort`] the first failing row halts the
    /// whole batch; with [`RowErrorPolicy::Skip`] the failure is
    /// reported and the next row starts fresh.
    pub fn run(&self, rows: &[Row]) -> Result<BatchSummary> {
        let mut summary = BatchSummary::default();

        for row in rows {
            println!("Processing: {}", row.link);

            match self.process_row(row) {
                Ok(paths) => {
                    summary.processed += 1;
                    let folder = paths.cover.parent().unwrap_or(Path::new(""));
                    println!("Stored in folder: {}\n", folder.display());
                }
                Err(e) => match self.batch.on_row_error {
                    RowErrorPolicy::Abort => {
                        return Err(e.context(format!("processing {}", row.link)));
                    }
                    RowErrorPolicy::Skip => {
                        tracing::error!(link = %row.link, error = %e, "Row failed, continuing");
                        eprintln!("Error processing {}: {}\n", row.link, e);
                        summary.failed += 1;
                    }
                },
            }
        }

        tracing::info!(
            processed = summary.processed,
            failed = summary.failed,
            "Batch complete"
        );
        Ok(summary)
    }

    /// One full row: scratch clear → fetch → crop → tag → organize.
    fn process_row(&self, row: &Row) -> Result<OrganizedPaths> {
        clear_scratch(&self.layout.scratch)?;

        let time_range = row
            .time_range
            .as_deref()
            .map(TimeRange::parse)
            .transpose()?;

        let options = FetchOptions {
            dest_dir: self.layout.scratch.clone(),
            artist: row.artist.clone(),
            album: row.album.clone(),
            title: row.title.clone(),
            time_range,
        };
        let pair = self.downloader.fetch(&row.link, &options)?;

        let cover = cropper::crop_to_square(&pair.thumbnail)?;

        tags::write_tags(
            &pair.audio,
            &TrackTags {
                artist: row.artist.clone(),
                title: row.title.clone(),
                album: row.album.clone(),
            },
        )?;
        tags::embed_cover(&pair.audio, &cover)?;

        organizer::organize(
            &row.album,
            &row.artist,
            &pair.audio,
            &cover,
            &self.layout,
            self.batch.link_mode,
        )
    }
}

/// Empty the scratch directory, creating it if absent.
///
/// Best-effort: entries that cannot be removed are silently skipped
/// and will be retried before the next row.
fn clear_scratch(scratch: &Path) -> Result<()> {
    if scratch.exists() {
        let entries = fs::read_dir(scratch)
            .with_context(format!("reading scratch directory {}", scratch.display()))?;
        for entry in entries.flatten() {
            let _ = fs::remove_file(entry.path());
        }
    } else {
        fs::create_dir_all(scratch)
            .with_context(format!("creating scratch directory {}", scratch.display()))?;
    }
    Ok(())
}
