//! Audio file metadata writing.
//!
//! Uses the lofty crate for format-independent tag access. The writer
//! sets the textual artist/title/album fields and separately embeds
//! the cropped cover image as a front-cover picture frame, replacing
//! any picture that was already there.
//!
//! Files are probed by content rather than extension; transcoded
//! downloads occasionally carry a container that does not match their
//! filename.

use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::probe::Probe;
use lofty::tag::{Accessor, Tag, TagExt};
use std::path::Path;

use crate::error::{Error, Result};

/// The textual fields written to every processed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackTags {
    pub artist: String,
    pub title: String,
    pub album: String,
}

/// Write/overwrite the artist, title and album fields.
pub fn write_tags(path: &Path, tags: &TrackTags) -> Result<()> {
    let mut tagged_file = open(path)?;

    let tag_type = tagged_file.primary_tag_type();
    let tag = if let Some(tag) = tagged_file.tag_mut(tag_type) {
        tag
    } else {
        tagged_file.insert_tag(Tag::new(tag_type));
        tagged_file
            .tag_mut(tag_type)
            .ok_or_else(|| Error::metadata_write(path, "file does not support tags"))?
    };

    tag.set_artist(tags.artist.clone());
    tag.set_title(tags.title.clone());
    tag.set_album(tags.album.clone());

    tag.save_to_path(path, WriteOptions::default())
        .map_err(|e| Error::metadata_write(path, e.to_string()))?;

    tracing::debug!(path = %path.display(), artist = %tags.artist, "Wrote tags");
    Ok(())
}

/// Embed an image as the front cover, replacing any prior picture.
///
/// The MIME type is fixed to the cropper's JPEG output.
pub fn embed_cover(path: &Path, cover: &Path) -> Result<()> {
    let data = std::fs::read(cover)?;
    let picture = Picture::new_unchecked(
        PictureType::CoverFront,
        Some(MimeType::Jpeg),
        Some("Cover".to_string()),
        data,
    );

    let mut tagged_file = open(path)?;
    let tag_type = tagged_file.primary_tag_type();
    let tag = if let Some(tag) = tagged_file.tag_mut(tag_type) {
        tag
    } else {
        tagged_file.insert_tag(Tag::new(tag_type));
        tagged_file
            .tag_mut(tag_type)
            .ok_or_else(|| Error::metadata_write(path, "file does not support tags"))?
    };

    tag.remove_picture_type(PictureType::CoverFront);
    tag.push_picture(picture);

    tag.save_to_path(path, WriteOptions::default())
        .map_err(|e| Error::metadata_write(path, e.to_string()))?;

    tracing::debug!(path = %path.display(), cover = %cover.display(), "Embedded cover");
    Ok(())
}

/// Read back the textual fields. Missing fields come back empty.
pub fn read_tags(path: &Path) -> Result<TrackTags> {
    let tagged_file = open(path)?;
    let tag = tagged_file.primary_tag().or_else(|| tagged_file.first_tag());

    Ok(TrackTags {
        artist: tag
            .and_then(|t| t.artist().map(|s| s.to_string()))
            .unwrap_or_default(),
        title: tag
            .and_then(|t| t.title().map(|s| s.to_string()))
            .unwrap_or_default(),
        album: tag
            .and_then(|t| t.album().map(|s| s.to_string()))
            .unwrap_or_default(),
    })
}

/// Read back the embedded front cover bytes, if any.
pub fn read_cover(path: &Path) -> Option<Vec<u8>> {
    let tagged_file = open(path).ok()?;
    let tag = tagged_file.primary_tag().or_else(|| tagged_file.first_tag())?;

    tag.pictures()
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| tag.pictures().first())
        .map(|p| p.data().to_vec())
}

// Probe/parse failures are access errors, not write failures; the
// readers surface them too.
fn open(path: &Path) -> Result<lofty::file::TaggedFile> {
    Probe::open(path)
        .map_err(|e| Error::metadata(path, e.to_string()))?
        .guess_file_type()
        .map_err(|e| Error::metadata(path, e.to_string()))?
        .read()
        .map_err(|e| Error::metadata(path, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::minimal_wav;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    #[test]
    fn test_tags_round_trip() {
        let temp = tempdir().unwrap();
        let audio = temp.path().join("track.wav");
        std::fs::write(&audio, minimal_wav()).unwrap();

        let tags = TrackTags {
            artist: "Unknown".to_string(),
            title: "Songs".to_string(),
            album: "Songs".to_string(),
        };
        write_tags(&audio, &tags).unwrap();

        let read_back = read_tags(&audio).unwrap();
        assert_eq!(read_back, tags);
    }

    #[test]
    fn test_tags_overwrite_previous_values() {
        let temp = tempdir().unwrap();
        let audio = temp.path().join("track.wav");
        std::fs::write(&audio, minimal_wav()).unwrap();

        let first = TrackTags {
            artist: "First".to_string(),
            title: "First".to_string(),
            album: "First".to_string(),
        };
        write_tags(&audio, &first).unwrap();

        let second = TrackTags {
            artist: "Second".to_string(),
            title: "Second".to_string(),
            album: "Second".to_string(),
        };
        write_tags(&audio, &second).unwrap();

        assert_eq!(read_tags(&audio).unwrap(), second);
    }

    #[test]
    fn test_cover_round_trip_is_byte_identical() {
        let temp = tempdir().unwrap();
        let audio = temp.path().join("track.wav");
        std::fs::write(&audio, minimal_wav()).unwrap();

        let cover = temp.path().join("cover.jpg");
        let img = image::RgbImage::from_pixel(8, 8, image::Rgb([200, 100, 50]));
        img.save(&cover).unwrap();
        let cover_bytes = std::fs::read(&cover).unwrap();

        embed_cover(&audio, &cover).unwrap();

        let embedded = read_cover(&audio).expect("cover should be embedded");
        assert_eq!(embedded, cover_bytes);
    }

    #[test]
    fn test_embed_replaces_prior_cover() {
        let temp = tempdir().unwrap();
        let audio = temp.path().join("track.wav");
        std::fs::write(&audio, minimal_wav()).unwrap();

        let first = temp.path().join("first.jpg");
        image::RgbImage::from_pixel(8, 8, image::Rgb([255, 0, 0]))
            .save(&first)
            .unwrap();
        embed_cover(&audio, &first).unwrap();

        let second = temp.path().join("second.jpg");
        image::RgbImage::from_pixel(8, 8, image::Rgb([0, 0, 255]))
            .save(&second)
            .unwrap();
        embed_cover(&audio, &second).unwrap();

        let tagged = open(&audio).unwrap();
        let tag = tagged.primary_tag().or_else(|| tagged.first_tag()).unwrap();
        assert_eq!(tag.pictures().len(), 1);

        let second_bytes = std::fs::read(&second).unwrap();
        assert_eq!(read_cover(&audio).unwrap(), second_bytes);
    }

    #[test]
    fn test_write_to_non_audio_file_fails() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "This is just some text, not music.").unwrap();

        let tags = TrackTags {
            artist: "A".to_string(),
            title: "T".to_string(),
            album: "B".to_string(),
        };
        let result = write_tags(file.path(), &tags);
        assert!(matches!(result, Err(Error::Metadata { .. })));
    }

    #[test]
    fn test_read_failure_is_not_reported_as_write() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "This is just some text, not music.").unwrap();

        let err = read_tags(file.path()).unwrap_err();
        assert!(matches!(err, Error::Metadata { .. }));
        assert!(!err.to_string().contains("write failed"));
    }

    #[test]
    fn test_read_cover_on_untagged_file_is_none() {
        let temp = tempdir().unwrap();
        let audio = temp.path().join("track.wav");
        std::fs::write(&audio, minimal_wav()).unwrap();

        assert_eq!(read_cover(&audio), None);
    }
}
