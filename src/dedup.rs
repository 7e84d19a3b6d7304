use crate::artist::{ArtistSet, normalize_artists};
use crate::error::{Error, Result};
use crate::title::normalize_title;
use crate::track::TrackRecord;
use log::{debug, info};
use serde::Serialize;
use std::collections::HashMap;

/// Tracks judged to be releases of the same song.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup<'a> {
    /// Base title shared by every member.
    pub title: String,
    /// Every artist credited on any member.
    pub artists: ArtistSet,
    /// Members in input order, always two or more.
    pub tracks: Vec<&'a TrackRecord>,
}

impl DuplicateGroup<'_> {
    /// "Base Title - artist a, artist b"
    pub fn label(&self) -> String {
        format!("{} - {}", title_case(&self.title), self.artists)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Result of grouping one batch of tracks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grouping<'a> {
    pub groups: Vec<DuplicateGroup<'a>>,
    /// Records left out for missing or malformed metadata.
    pub skipped: usize,
}

/// The matching keys of one valid record.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchKey {
    pub title: String,
    pub artists: ArtistSet,
}

impl MatchKey {
    pub fn of(track: &TrackRecord) -> Self {
        MatchKey {
            title: normalize_title(&track.title),
            artists: normalize_artists(&track.artist, &track.album_artist),
        }
    }

    /// Same base title and overlapping artist credits.
    pub fn matches(&self, other: &MatchKey) -> bool {
        self.title == other.title && self.artists.overlaps(&other.artists)
    }
}

/// Partitions `tracks` into duplicate groups.
///
/// Only records sharing a base title are compared. Matching pairs are merged
/// by connectivity, so the partition does not depend on input order. Invalid
/// records are skipped and counted, single tracks are dropped.
pub fn find_duplicates(tracks: &[TrackRecord]) -> Result<Grouping<'_>> {
    if tracks.is_empty() {
        return Err(Error::EmptyInput);
    }

    // 1. Keep records with proper metadata and compute their keys
    let mut skipped = 0;
    let mut candidates: Vec<(&TrackRecord, MatchKey)> = Vec::with_capacity(tracks.len());
    for track in tracks {
        if let Err(e) = track.validate() {
            debug!("Skipping {:?}: {}", track.path, e);
            skipped += 1;
            continue;
        }
        let key = MatchKey::of(track);
        debug!(
            "{:?}: base title '{}', artists [{}]",
            track.path, key.title, key.artists
        );
        candidates.push((track, key));
    }

    // 2. Bucket by base title
    let mut title_buckets: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, (_, key)) in candidates.iter().enumerate() {
        title_buckets.entry(key.title.as_str()).or_default().push(i);
    }

    // 3. Union every matching pair inside a bucket
    let mut sets = DisjointSet::new(candidates.len());
    for bucket in title_buckets.values().filter(|b| b.len() > 1) {
        for (n, &a) in bucket.iter().enumerate() {
            for &b in &bucket[n + 1..] {
                let (track_a, key_a) = &candidates[a];
                let (track_b, key_b) = &candidates[b];
                if key_a.matches(key_b) {
                    debug!(
                        "Match on '{}': {:?} <-> {:?}",
                        key_a.title, track_a.path, track_b.path
                    );
                    sets.union(a, b);
                }
            }
        }
    }

    // 4. Collect components with more than one member
    let mut components: HashMap<usize, Vec<usize>> = HashMap::new();
    for i in 0..candidates.len() {
        components.entry(sets.find(i)).or_default().push(i);
    }

    let mut members: Vec<Vec<usize>> = components
        .into_values()
        .filter(|component| component.len() > 1)
        .collect();
    members.sort_unstable_by_key(|component| component[0]);

    let groups: Vec<DuplicateGroup> = members
        .into_iter()
        .map(|component| {
            let title = candidates[component[0]].1.title.clone();
            let artists = component
                .iter()
                .flat_map(|&i| candidates[i].1.artists.iter().map(str::to_string))
                .collect();
            let tracks = component.iter().map(|&i| candidates[i].0).collect();
            DuplicateGroup {
                title,
                artists,
                tracks,
            }
        })
        .collect();

    info!(
        "Grouped {} tracks into {} duplicate groups ({} skipped)",
        tracks.len(),
        groups.len(),
        skipped
    );

    Ok(Grouping { groups, skipped })
}

/// Disjoint-set forest over record indices, with union by rank and path halving.
#[derive(Debug, Clone)]
pub(crate) struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub(crate) fn new(len: usize) -> Self {
        DisjointSet {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    pub(crate) fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    pub(crate) fn union(&mut self, a: usize, b: usize) {
        let (root_a, root_b) = (self.find(a), self.find(b));
        if root_a == root_b {
            return;
        }
        match self.rank[root_a].cmp(&self.rank[root_b]) {
            std::cmp::Ordering::Less => self.parent[root_a] = root_b,
            std::cmp::Ordering::Greater => self.parent[root_b] = root_a,
            std::cmp::Ordering::Equal => {
                self.parent[root_b] = root_a;
                self.rank[root_a] += 1;
            }
        }
    }
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn track(path: &str, title: &str, artist: &str) -> TrackRecord {
        TrackRecord::new(path, title, artist, 300.0, 8_000_000)
    }

    /// Groups as sorted sets of paths, independent of any ordering.
    fn partition(grouping: &Grouping) -> BTreeSet<BTreeSet<PathBuf>> {
        grouping
            .groups
            .iter()
            .map(|g| g.tracks.iter().map(|t| t.path.clone()).collect())
            .collect()
    }

    fn paths<'a>(group: &'a DuplicateGroup<'a>) -> Vec<&'a str> {
        group
            .tracks
            .iter()
            .map(|t| t.path.to_str().unwrap())
            .collect()
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(find_duplicates(&[]), Err(Error::EmptyInput)));
    }

    #[test]
    fn versions_with_shared_artists_are_grouped() {
        let tracks = vec![
            track("1.flac", "Song (Original Mix)", "A, B"),
            track("2.flac", "Song - Club Mix", "A vs B"),
            track("3.flac", "Other Song", "C"),
        ];
        let grouping = find_duplicates(&tracks).unwrap();

        assert_eq!(grouping.groups.len(), 1);
        assert_eq!(paths(&grouping.groups[0]), vec!["1.flac", "2.flac"]);
        assert_eq!(grouping.groups[0].title, "song");
        assert_eq!(grouping.groups[0].label(), "Song - a, b");
        assert_eq!(grouping.skipped, 0);
    }

    #[test]
    fn same_title_different_artists_is_not_a_duplicate() {
        let tracks = vec![
            track("1.flac", "Home", "Artist A"),
            track("2.flac", "Home", "Artist B"),
        ];
        assert!(find_duplicates(&tracks).unwrap().groups.is_empty());
    }

    #[test]
    fn partial_credit_overlap_is_enough() {
        let tracks = vec![
            track("1.flac", "Song", "A feat. B"),
            track("2.flac", "Song (Extended Mix)", "B"),
        ];
        let grouping = find_duplicates(&tracks).unwrap();
        assert_eq!(grouping.groups.len(), 1);
        assert_eq!(grouping.groups[0].artists.to_string(), "a, b");
    }

    #[test]
    fn matches_are_merged_transitively() {
        // 1 and 3 share no artist but both match 2.
        let tracks = vec![
            track("1.flac", "Song", "A"),
            track("2.flac", "Song (Radio Edit)", "A & B"),
            track("3.flac", "Song - Extended Mix", "B"),
        ];
        let grouping = find_duplicates(&tracks).unwrap();
        assert_eq!(grouping.groups.len(), 1);
        assert_eq!(paths(&grouping.groups[0]), vec!["1.flac", "2.flac", "3.flac"]);
    }

    #[test]
    fn empty_artist_sets_never_match() {
        // Both credits are nothing but separators.
        let tracks = vec![
            track("1.flac", "Song", " & "),
            track("2.flac", "Song", "/"),
            track("3.flac", "Song", "A"),
        ];
        let grouping = find_duplicates(&tracks).unwrap();
        assert!(grouping.groups.is_empty());
        assert_eq!(grouping.skipped, 0);
    }

    #[test]
    fn invalid_records_are_skipped_and_counted() {
        let tracks = vec![
            track("1.flac", "Song", "A"),
            track("2.flac", "Song", "A"),
            track("3.flac", "", "A"),
            track("4.flac", "Song", ""),
            TrackRecord::new("5.flac", "Song", "A", -3.0, 1),
            TrackRecord::new("6.flac", "Song", "A", f64::NAN, 1),
        ];
        let grouping = find_duplicates(&tracks).unwrap();
        assert_eq!(grouping.skipped, 4);
        assert_eq!(grouping.groups.len(), 1);
        assert_eq!(paths(&grouping.groups[0]), vec!["1.flac", "2.flac"]);
    }

    #[test]
    fn album_artist_stands_in_for_a_missing_artist() {
        let tracks = vec![
            track("1.flac", "Song", "").with_album_artist("A"),
            track("2.flac", "Song", "A"),
        ];
        assert_eq!(find_duplicates(&tracks).unwrap().groups.len(), 1);
    }

    #[test]
    fn groups_are_returned_in_input_order() {
        let tracks = vec![
            track("1.flac", "Beta", "B"),
            track("2.flac", "Alpha", "A"),
            track("3.flac", "Alpha", "A"),
            track("4.flac", "Beta", "B"),
        ];
        let grouping = find_duplicates(&tracks).unwrap();
        assert_eq!(paths(&grouping.groups[0]), vec!["1.flac", "4.flac"]);
        assert_eq!(paths(&grouping.groups[1]), vec!["2.flac", "3.flac"]);
    }

    #[test]
    fn disjoint_set_connects_unions() {
        let mut sets = DisjointSet::new(5);
        sets.union(0, 1);
        sets.union(3, 4);
        sets.union(1, 4);
        assert_eq!(sets.find(0), sets.find(3));
        assert_ne!(sets.find(0), sets.find(2));
    }

    #[test]
    fn title_case_label() {
        assert_eq!(title_case("the  song"), "The  Song");
    }

    fn library() -> Vec<TrackRecord> {
        vec![
            track("a1.flac", "Song (Original Mix)", "A, B"),
            track("a2.flac", "Song - Club Mix", "A vs B"),
            track("a3.flac", "Song", "B"),
            track("b1.flac", "Other", "C"),
            track("b2.flac", "Other [Remastered]", "C feat. D"),
            track("c1.flac", "Other", "E"),
            track("d1.flac", "Lonely", " & "),
            track("d2.flac", "Lonely", " & "),
            track("e1.flac", "", "A"),
        ]
    }

    proptest! {
        #[test]
        fn partition_does_not_depend_on_order(
            order in Just((0..library().len()).collect::<Vec<usize>>()).prop_shuffle()
        ) {
            let original = library();
            let shuffled: Vec<TrackRecord> = order.iter().map(|&i| original[i].clone()).collect();

            let expected = find_duplicates(&original).unwrap();
            let actual = find_duplicates(&shuffled).unwrap();

            prop_assert_eq!(partition(&actual), partition(&expected));
            prop_assert_eq!(actual.skipped, expected.skipped);
            prop_assert!(actual.groups.iter().all(|g| g.len() > 1));
        }
    }
}
