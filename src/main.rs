//! Songvault - batch audio archiver.
//!
//! Downloads audio tracks from URLs listed in a CSV manifest, derives
//! square cover art from each video thumbnail, embeds metadata and
//! artwork, and files the result into an artist/album tree backed by a
//! single flat store of audio files.

pub mod cli;
pub mod config;
pub mod cropper;
pub mod error;
pub mod fetcher;
pub mod manifest;
pub mod organizer;
pub mod pipeline;
pub mod sanitize;
pub mod tags;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("songvault=info".parse().unwrap()))
        .init();

    cli::run_command(&args)
}
