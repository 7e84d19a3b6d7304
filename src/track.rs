use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::RecordError;

/// The audio containers the scanner picks up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Flac,
    Mp3,
    Wav,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 3] = [AudioFormat::Flac, AudioFormat::Mp3, AudioFormat::Wav];

    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Flac => "flac",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
        }
    }

    /// Case-insensitive lookup by file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?;
        Self::ALL
            .into_iter()
            .find(|format| ext.eq_ignore_ascii_case(format.extension()))
    }

    pub fn is_lossless(self) -> bool {
        matches!(self, AudioFormat::Flac | AudioFormat::Wav)
    }
}

/// Tags and file properties of one audio file, as handed over by the extractor.
/// The path is only carried along, never interpreted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackRecord {
    pub path: PathBuf,
    pub artist: String,
    pub album_artist: String,
    pub title: String,
    pub album: Option<String>,

    /// Seconds.
    pub duration: f64,
    /// Bytes.
    pub size: u64,
    pub format: AudioFormat,
}

impl Default for TrackRecord {
    fn default() -> Self {
        TrackRecord {
            path: PathBuf::new(),
            artist: String::new(),
            album_artist: String::new(),
            title: String::new(),
            album: None,
            duration: 0.0,
            size: 0,
            format: AudioFormat::default(),
        }
    }
}

impl TrackRecord {
    pub fn new(
        path: impl Into<PathBuf>,
        title: impl Into<String>,
        artist: impl Into<String>,
        duration: f64,
        size: u64,
    ) -> Self {
        let path = path.into();
        let format = AudioFormat::from_path(&path).unwrap_or_default();
        TrackRecord {
            path,
            title: title.into(),
            artist: artist.into(),
            duration,
            size,
            format,
            ..Default::default()
        }
    }

    pub fn with_album_artist(mut self, album_artist: impl Into<String>) -> Self {
        self.album_artist = album_artist.into();
        self
    }

    /// The artist credit used for matching: the track artist, or the album
    /// artist when the former is blank.
    pub fn artist_credit(&self) -> Option<&str> {
        [self.artist.trim(), self.album_artist.trim()]
            .into_iter()
            .find(|credit| !credit.is_empty())
    }

    /// Records without a title or any artist credit, or with an unusable
    /// duration, must not take part in grouping.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.title.trim().is_empty() {
            return Err(RecordError::MissingTitle);
        }
        if self.artist_credit().is_none() {
            return Err(RecordError::MissingArtist);
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(RecordError::MalformedDuration(self.duration));
        }
        Ok(())
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }

    /// Duration as `m:ss`, empty when unknown.
    pub fn duration_formatted(&self) -> String {
        if self.duration <= 0.0 || !self.duration.is_finite() {
            return String::new();
        }
        let secs = self.duration as u64;
        format!("{}:{:02}", secs / 60, secs % 60)
    }

    /// Size in whole megabytes.
    pub fn size_mb(&self) -> u64 {
        (self.size as f64 / (1024.0 * 1024.0)).round() as u64
    }
}

impl From<&TrackRecord> for String {
    fn from(value: &TrackRecord) -> Self {
        let artist = value.artist_credit().unwrap_or("Unknown Artist");
        format!("{} - {}", artist, value.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_is_detected_case_insensitively() {
        assert_eq!(
            AudioFormat::from_path(Path::new("a/b/Track.FLAC")),
            Some(AudioFormat::Flac)
        );
        assert_eq!(
            AudioFormat::from_path(Path::new("track.mp3")),
            Some(AudioFormat::Mp3)
        );
        assert_eq!(AudioFormat::from_path(Path::new("track.ogg")), None);
        assert_eq!(AudioFormat::from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn album_artist_is_the_fallback_credit() {
        let track = TrackRecord::new("a.flac", "Song", "  ", 200.0, 10).with_album_artist("B");
        assert_eq!(track.artist_credit(), Some("B"));

        let track = TrackRecord::new("a.flac", "Song", "A", 200.0, 10).with_album_artist("B");
        assert_eq!(track.artist_credit(), Some("A"));
    }

    #[test]
    fn validation_rejects_incomplete_records() {
        let ok = TrackRecord::new("a.flac", "Song", "A", 200.0, 10);
        assert_eq!(ok.validate(), Ok(()));

        let no_title = TrackRecord::new("a.flac", " ", "A", 200.0, 10);
        assert_eq!(no_title.validate(), Err(RecordError::MissingTitle));

        let no_artist = TrackRecord::new("a.flac", "Song", "", 200.0, 10);
        assert_eq!(no_artist.validate(), Err(RecordError::MissingArtist));

        let negative = TrackRecord::new("a.flac", "Song", "A", -1.0, 10);
        assert_eq!(
            negative.validate(),
            Err(RecordError::MalformedDuration(-1.0))
        );

        let nan = TrackRecord::new("a.flac", "Song", "A", f64::NAN, 10);
        assert!(matches!(
            nan.validate(),
            Err(RecordError::MalformedDuration(_))
        ));
    }

    #[test]
    fn display_helpers() {
        let track = TrackRecord::new("dir/Song.mp3", "Song", "A", 367.9, 8 * 1024 * 1024);
        assert_eq!(track.duration_formatted(), "6:07");
        assert_eq!(track.size_mb(), 8);
        assert_eq!(track.file_name(), "Song.mp3");
        assert_eq!(track.format, AudioFormat::Mp3);
        assert_eq!(String::from(&track), "A - Song");
    }
}
