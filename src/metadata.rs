use std::path::Path;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::{Accessor, ItemKey};
use log::trace;

use crate::error::{Error, Result};
use crate::track::{AudioFormat, TrackRecord};

/// Reads the tags and audio properties of one file.
///
/// The primary tag is preferred, any other tag is used when it is missing.
/// A file without tags still yields a record, it will simply fail validation.
pub fn read_track(path: &Path) -> Result<TrackRecord> {
    let format =
        AudioFormat::from_path(path).ok_or_else(|| Error::UnsupportedFormat(path.to_path_buf()))?;
    let size = std::fs::metadata(path)?.len();

    let tagged_file = lofty::read_from_path(path).map_err(|source| Error::Tag {
        path: path.to_path_buf(),
        source,
    })?;

    let mut track = TrackRecord {
        path: path.to_path_buf(),
        duration: tagged_file.properties().duration().as_secs_f64(),
        size,
        format,
        ..Default::default()
    };

    if let Some(tag) = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag())
    {
        track.title = tag.title().map(|s| s.to_string()).unwrap_or_default();
        track.artist = tag.artist().map(|s| s.to_string()).unwrap_or_default();
        track.album = tag.album().map(|s| s.to_string());
        track.album_artist = tag
            .get_string(&ItemKey::AlbumArtist)
            .map(|s| s.to_string())
            .unwrap_or_default();
    }

    trace!("Read {:?}: {:?}", path, track);
    Ok(track)
}
