//! CLI command definitions and handlers.
//!
//! Each subcommand is implemented as a function that takes the parsed
//! arguments and returns an `anyhow::Result<()>`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{self, Layout, LinkMode, RowErrorPolicy};
use crate::cropper;
use crate::fetcher::YtDlp;
use crate::manifest;
use crate::pipeline::Pipeline;
use crate::sanitize::track_stem;
use crate::tags::{self, TrackTags};

/// Songvault CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Download and file every track in a CSV manifest
    Run {
        /// Path to the manifest file
        manifest: PathBuf,
        /// Library root directory (default: from config, else cwd)
        #[arg(short, long)]
        root: Option<PathBuf>,
        /// Skip failing rows instead of halting the batch
        #[arg(long)]
        continue_on_error: bool,
        /// Copy audio into artist directories instead of symlinking
        #[arg(long)]
        copy_links: bool,
        /// Show what would be processed without downloading anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Check if the download tool is installed
    CheckTools,
    /// Write a default config file for editing
    InitConfig,
    /// Center-crop one image to square cover art
    Crop {
        /// Path to the image file
        path: PathBuf,
    },
    /// Write metadata to one audio file
    Tag {
        /// Path to the audio file
        path: PathBuf,
        /// Artist name
        #[arg(long)]
        artist: String,
        /// Track title
        #[arg(long)]
        title: String,
        /// Album name
        #[arg(long)]
        album: String,
        /// Image to embed as the front cover
        #[arg(long)]
        cover: Option<PathBuf>,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Run {
            manifest,
            root,
            continue_on_error,
            copy_links,
            dry_run,
        } => cmd_run(
            manifest,
            root.as_deref(),
            *continue_on_error,
            *copy_links,
            *dry_run,
        ),
        Commands::CheckTools => cmd_check_tools(),
        Commands::InitConfig => cmd_init_config(),
        Commands::Crop { path } => cmd_crop(path),
        Commands::Tag {
            path,
            artist,
            title,
            album,
            cover,
        } => cmd_tag(path, artist, title, album, cover.as_deref()),
    }
}

// ============================================================================
// Individual command implementations
// ============================================================================

fn cmd_run(
    manifest_path: &std::path::Path,
    root: Option<&std::path::Path>,
    continue_on_error: bool,
    copy_links: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let mut config = config::load();
    if let Some(root) = root {
        config.root = root.to_path_buf();
    }
    if continue_on_error {
        config.batch.on_row_error = RowErrorPolicy::Skip;
    }
    if copy_links {
        config.batch.link_mode = LinkMode::Copy;
    }

    let rows = manifest::load(manifest_path)?;
    if rows.is_empty() {
        println!("Manifest is empty, nothing to do.");
        return Ok(());
    }

    if dry_run {
        println!("[DRY RUN - nothing will be downloaded]\n");
        for row in &rows {
            let stem = track_stem(&row.artist, &row.album, &row.title);
            match &row.time_range {
                Some(range) => println!("WOULD FETCH: {} ({}) -> {}.mp3", row.link, range, stem),
                None => println!("WOULD FETCH: {} -> {}.mp3", row.link, stem),
            }
        }
        return Ok(());
    }

    if !YtDlp::is_available() {
        print_ytdlp_install_instructions();
        std::process::exit(1);
    }

    let layout = Layout::new(&config.root, &config.layout);
    let pipeline = Pipeline::new(YtDlp, layout, config.batch.clone());

    let summary = pipeline.run(&rows)?;
    println!(
        "Done! {} processed, {} failed",
        summary.processed, summary.failed
    );
    Ok(())
}

fn cmd_check_tools() -> anyhow::Result<()> {
    println!("Checking download tools...\n");

    if let Some(version) = YtDlp::version() {
        println!("✓ yt-dlp: {}", version);
    } else {
        println!("✗ yt-dlp: NOT FOUND");
        print_ytdlp_install_instructions();
    }

    Ok(())
}

fn cmd_init_config() -> anyhow::Result<()> {
    let config = config::load();
    config::save(&config)?;
    match config::config_path() {
        Some(path) => println!("✓ Wrote {}", path.display()),
        None => println!("✓ Config saved"),
    }
    Ok(())
}

fn cmd_crop(path: &std::path::Path) -> anyhow::Result<()> {
    let out = cropper::crop_to_square(path)?;
    println!("✓ Wrote {}", out.display());
    Ok(())
}

fn cmd_tag(
    path: &std::path::Path,
    artist: &str,
    title: &str,
    album: &str,
    cover: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    tags::write_tags(
        path,
        &TrackTags {
            artist: artist.to_string(),
            title: title.to_string(),
            album: album.to_string(),
        },
    )?;
    println!("✓ Tags written to {}", path.display());

    if let Some(cover) = cover {
        tags::embed_cover(path, cover)?;
        println!("✓ Cover embedded from {}", cover.display());
    }
    Ok(())
}

// ============================================================================
// Helper functions
// ============================================================================

/// Print installation instructions for yt-dlp
fn print_ytdlp_install_instructions() {
    eprintln!("Error: yt-dlp not found.");
    eprintln!("Install yt-dlp:");
    eprintln!("  Windows: winget install yt-dlp");
    eprintln!("  macOS:   brew install yt-dlp");
    eprintln!("  Linux:   apt install yt-dlp (or pip install yt-dlp)");
}
