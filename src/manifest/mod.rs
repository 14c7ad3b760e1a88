//! Manifest parsing and row normalization.
//!
//! The input is a CSV file with a header row. Recognized columns:
//! `link`, `artist_name`, `album_title`, `song_title` and an optional
//! `time_range` (legacy files may call it `time`). Fields may be blank;
//! normalization fills them with fallback rules before the row reaches
//! the pipeline.

use serde::Deserialize;
use std::path::Path;

use crate::error::{Error, Result, ResultExt};

/// Sentinel used for fields the manifest left blank.
pub const UNKNOWN: &str = "Unknown";

/// A manifest row as it appears in the CSV file.
#[derive(Debug, Clone, Deserialize)]
struct RawRow {
    link: String,
    artist_name: String,
    album_title: String,
    song_title: String,
    #[serde(default, alias = "time")]
    time_range: Option<String>,
}

/// A normalized row ready for processing.
///
/// After normalization `artist`, `album` and `title` are all non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub link: String,
    pub artist: String,
    pub album: String,
    pub title: String,
    pub time_range: Option<String>,
}

impl RawRow {
    /// Apply the fallback rules:
    /// - blank artist becomes [`UNKNOWN`]
    /// - blank album and title both become [`UNKNOWN`]
    /// - if exactly one of album/title is blank, it is cross-filled
    ///   from the other
    fn normalize(self) -> Result<Row> {
        let link = self.link.trim().to_string();
        if link.is_empty() {
            return Err(Error::invalid_row("blank link"));
        }

        let artist = match self.artist_name.trim() {
            "" => UNKNOWN.to_string(),
            s => s.to_string(),
        };

        let album = self.album_title.trim().to_string();
        let title = self.song_title.trim().to_string();
        let (album, title) = match (album.is_empty(), title.is_empty()) {
            (true, true) => (UNKNOWN.to_string(), UNKNOWN.to_string()),
            (true, false) => (title.clone(), title),
            (false, true) => (album.clone(), album),
            (false, false) => (album, title),
        };

        let time_range = self
            .time_range
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Row {
            link,
            artist,
            album,
            title,
            time_range,
        })
    }
}

/// Read and normalize every row of a manifest file.
pub fn load(path: &Path) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .quote(b'"')
        .from_path(path)
        .with_context(format!("opening manifest {}", path.display()))?;

    let mut rows = Vec::new();
    for record in reader.deserialize::<RawRow>() {
        let raw = record.with_context("reading manifest row")?;
        rows.push(raw.normalize()?);
    }

    tracing::info!(rows = rows.len(), manifest = %path.display(), "Loaded manifest");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn raw(link: &str, artist: &str, album: &str, title: &str, range: Option<&str>) -> RawRow {
        RawRow {
            link: link.to_string(),
            artist_name: artist.to_string(),
            album_title: album.to_string(),
            song_title: title.to_string(),
            time_range: range.map(String::from),
        }
    }

    #[test]
    fn test_blank_artist_becomes_unknown() {
        let row = raw("https://example/v", "", "Album", "Title", None)
            .normalize()
            .unwrap();
        assert_eq!(row.artist, UNKNOWN);
        assert_eq!(row.album, "Album");
        assert_eq!(row.title, "Title");
    }

    #[test]
    fn test_blank_album_and_title_both_become_unknown() {
        let row = raw("https://example/v", "Artist", "", "", None)
            .normalize()
            .unwrap();
        assert_eq!(row.album, UNKNOWN);
        assert_eq!(row.title, UNKNOWN);
    }

    #[test]
    fn test_blank_album_cross_fills_from_title() {
        let row = raw("https://example/v", "Artist", "", "Song", None)
            .normalize()
            .unwrap();
        assert_eq!(row.album, "Song");
        assert_eq!(row.title, "Song");
    }

    #[test]
    fn test_blank_title_cross_fills_from_album() {
        let row = raw("https://example/v", "Artist", "Songs", "", None)
            .normalize()
            .unwrap();
        assert_eq!(row.album, "Songs");
        assert_eq!(row.title, "Songs");
    }

    #[test]
    fn test_blank_link_is_rejected() {
        let result = raw("  ", "Artist", "Album", "Title", None).normalize();
        assert!(result.is_err());
    }

    #[test]
    fn test_fields_are_trimmed() {
        let row = raw("  https://example/v ", " A ", " B ", " C ", Some(" 10-40 "))
            .normalize()
            .unwrap();
        assert_eq!(row.link, "https://example/v");
        assert_eq!(row.artist, "A");
        assert_eq!(row.album, "B");
        assert_eq!(row.title, "C");
        assert_eq!(row.time_range.as_deref(), Some("10-40"));
    }

    #[test]
    fn test_blank_time_range_becomes_none() {
        let row = raw("https://example/v", "A", "B", "C", Some("  "))
            .normalize()
            .unwrap();
        assert_eq!(row.time_range, None);
    }

    #[test]
    fn test_load_csv_with_header() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "link,artist_name,album_title,song_title,time_range").unwrap();
        writeln!(file, "https://example/video,,Songs,,10-40").unwrap();
        writeln!(file, "https://example/other,\"Band, The\",Album,Track,").unwrap();

        let rows = load(file.path()).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].artist, UNKNOWN);
        assert_eq!(rows[0].album, "Songs");
        assert_eq!(rows[0].title, "Songs");
        assert_eq!(rows[0].time_range.as_deref(), Some("10-40"));

        assert_eq!(rows[1].artist, "Band, The");
        assert_eq!(rows[1].time_range, None);
    }

    #[test]
    fn test_load_csv_with_legacy_time_column() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "link,artist_name,album_title,song_title,time").unwrap();
        writeln!(file, "https://example/video,A,B,C,5-25").unwrap();

        let rows = load(file.path()).unwrap();
        assert_eq!(rows[0].time_range.as_deref(), Some("5-25"));
    }

    #[test]
    fn test_load_csv_without_time_column() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "link,artist_name,album_title,song_title").unwrap();
        writeln!(file, "https://example/video,A,B,C").unwrap();

        let rows = load(file.path()).unwrap();
        assert_eq!(rows[0].time_range, None);
    }

    #[test]
    fn test_load_missing_file_returns_error() {
        let result = load(Path::new("/nonexistent/manifest.csv"));
        assert!(result.is_err());
    }
}
