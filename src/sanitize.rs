//! Filename sanitization shared by the fetcher and the organizer.
//!
//! Labels coming from the manifest (artist, album, title) are used as
//! path segments, so anything outside a conservative whitelist is
//! dropped before the label touches the filesystem.

/// Sanitize a label for use as a file or directory name.
///
/// Keeps ASCII alphanumerics, spaces, `-` and `_`; everything else is
/// removed. Trailing whitespace is trimmed so a stripped label never
/// ends in a space.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Sanitize a label for use as a directory segment.
///
/// A label made entirely of stripped characters would sanitize to `""`,
/// and joining an empty segment silently drops a path level. Such
/// labels fall back to [`crate::manifest::UNKNOWN`] instead.
pub fn directory_segment(name: &str) -> String {
    let sanitized = sanitize_filename(name);
    if sanitized.is_empty() {
        crate::manifest::UNKNOWN.to_string()
    } else {
        sanitized
    }
}

/// Build the shared `"artist - album - title"` stem used for both the
/// audio file and its artwork.
pub fn track_stem(artist: &str, album: &str, title: &str) -> String {
    sanitize_filename(&format!("{artist} - {album} - {title}"))
}
