//! Finds releases of the same track in a music library by their tags.
//!
//! Original mixes, extended mixes, radio edits and remixes of one song end up
//! in the same [`DuplicateGroup`], and [`quality::select`] decides which copy
//! to keep.

pub mod artist;
pub mod dedup;
pub mod error;
pub mod fs;
pub mod library;
pub mod metadata;
pub mod quality;
pub mod report;
pub mod title;
pub mod track;

pub use artist::{ArtistSet, normalize_artists};
pub use dedup::{DuplicateGroup, Grouping, find_duplicates};
pub use error::{Error, RecordError, Result};
pub use library::Library;
pub use quality::{ReviewedGroup, Verdict, marked_for_deletion, review, select};
pub use title::normalize_title;
pub use track::{AudioFormat, TrackRecord};
