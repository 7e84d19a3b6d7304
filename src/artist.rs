//! Artist credit normalization.
//!
//! A raw credit such as `"Armin van Buuren feat. Trevor Guthrie & Ferry Corsten"`
//! becomes the set `{"armin van buuren", "trevor guthrie", "ferry corsten"}`.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use log::trace;
use regex::Regex;
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Separators between individual artists of a credit. Word separators only
/// match as whole words, so "Andy" or "Softcore" stay intact.
static ARTIST_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[;,&/]|\b(?:featuring|feat|ft|versus|vs|and)\b\.?")
        .expect("artist separator pattern is valid")
});

/// Closed `(...)` or `[...]` groups inside a single name, e.g. "Nadia Ali (US)".
static NAME_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\([^()]*\)|\[[^\[\]]*\]").expect("name annotation pattern is valid")
});

/// The distinct, folded artist names of one credit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ArtistSet(BTreeSet<String>);

impl ArtistSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Whether two credits can belong to the same track: they share an artist
    /// or one credit is contained in the other.
    ///
    /// An empty set never matches, not even another empty set, otherwise it
    /// would be a subset of every credit.
    pub fn overlaps(&self, other: &ArtistSet) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        !self.0.is_disjoint(&other.0) || self.0.is_subset(&other.0) || other.0.is_subset(&self.0)
    }
}

impl FromIterator<String> for ArtistSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        ArtistSet(iter.into_iter().filter(|name| !name.is_empty()).collect())
    }
}

impl fmt::Display for ArtistSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().collect();
        write!(f, "{}", names.join(", "))
    }
}

/// Normalizes the artist credit of a track, falling back to the album artist
/// when the track artist is blank.
pub fn normalize_artists(artist: &str, album_artist: &str) -> ArtistSet {
    let credit = if artist.trim().is_empty() {
        album_artist
    } else {
        artist
    };
    split_artists(credit)
}

/// Splits one raw credit on the multi-artist separators and folds every part.
pub fn split_artists(credit: &str) -> ArtistSet {
    let artists: ArtistSet = ARTIST_SEPARATOR.split(credit).map(fold_name).collect();
    trace!("Artists of {:?}: {:?}", credit, artists);
    artists
}

/// Folds a single artist name: annotations dropped, accents stripped,
/// punctuation removed, lowercased, whitespace collapsed.
pub fn fold_name(name: &str) -> String {
    let name = NAME_ANNOTATION.replace_all(name, " ");

    let folded: String = name
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(|c| {
            let c = if c == '-' || c == '_' { ' ' } else { c };
            c.to_lowercase()
        })
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
