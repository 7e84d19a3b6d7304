use std::cmp::Ordering;

use serde::Serialize;

use crate::dedup::DuplicateGroup;
use crate::track::TrackRecord;

/// Whether one member of a duplicate group is kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verdict<'a> {
    pub track: &'a TrackRecord,
    pub keep: bool,
}

/// A duplicate group together with the keep/delete decision for each member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewedGroup<'a> {
    pub label: String,
    pub verdicts: Vec<Verdict<'a>>,
}

impl<'a> ReviewedGroup<'a> {
    pub fn keeper(&self) -> Option<&'a TrackRecord> {
        self.verdicts.iter().find(|v| v.keep).map(|v| v.track)
    }

    pub fn discarded(&self) -> impl Iterator<Item = &'a TrackRecord> + '_ {
        self.verdicts.iter().filter(|v| !v.keep).map(|v| v.track)
    }
}

/// Longer wins, then larger. `-0.0` and `0.0` count as the same duration.
fn compare_quality(a: &TrackRecord, b: &TrackRecord) -> Ordering {
    (a.duration + 0.0)
        .total_cmp(&(b.duration + 0.0))
        .then_with(|| a.size.cmp(&b.size))
}

/// Index of the track to keep: greatest `(duration, size)`, and on a tie the
/// one that comes first.
pub fn keeper_index(tracks: &[&TrackRecord]) -> Option<usize> {
    let mut best = 0;
    for (i, track) in tracks.iter().enumerate().skip(1) {
        if compare_quality(track, tracks.get(best)?) == Ordering::Greater {
            best = i;
        }
    }
    (!tracks.is_empty()).then_some(best)
}

/// Marks every member of `group` but the best one for deletion.
pub fn select<'a>(group: &DuplicateGroup<'a>) -> Vec<Verdict<'a>> {
    let keeper = keeper_index(&group.tracks);
    group
        .tracks
        .iter()
        .enumerate()
        .map(|(i, &track)| Verdict {
            track,
            keep: Some(i) == keeper,
        })
        .collect()
}

/// Runs [`select`] over every group.
pub fn review<'a>(groups: &[DuplicateGroup<'a>]) -> Vec<ReviewedGroup<'a>> {
    groups
        .iter()
        .map(|group| ReviewedGroup {
            label: group.label(),
            verdicts: select(group),
        })
        .collect()
}

/// Every track marked for deletion across all groups.
pub fn marked_for_deletion<'a>(reviewed: &[ReviewedGroup<'a>]) -> Vec<&'a TrackRecord> {
    reviewed.iter().flat_map(|group| group.discarded()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artist::ArtistSet;
    use proptest::prelude::*;

    fn group<'a>(tracks: &'a [TrackRecord]) -> DuplicateGroup<'a> {
        DuplicateGroup {
            title: "song".to_string(),
            artists: ArtistSet::default(),
            tracks: tracks.iter().collect(),
        }
    }

    fn kept(verdicts: &[Verdict]) -> Vec<String> {
        verdicts
            .iter()
            .filter(|v| v.keep)
            .map(|v| v.track.path.to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn longest_track_is_kept() {
        let tracks = vec![
            TrackRecord::new("short.flac", "Song", "A", 300.0, 8_000_000),
            TrackRecord::new("long.flac", "Song", "A", 360.0, 7_500_000),
        ];
        let verdicts = select(&group(&tracks));
        assert_eq!(kept(&verdicts), vec!["long.flac"]);
        assert!(!verdicts[0].keep);
    }

    #[test]
    fn size_breaks_equal_durations() {
        let tracks = vec![
            TrackRecord::new("small.mp3", "Song", "A", 300.0, 5_000_000),
            TrackRecord::new("big.flac", "Song", "A", 300.0, 30_000_000),
        ];
        assert_eq!(kept(&select(&group(&tracks))), vec!["big.flac"]);
    }

    #[test]
    fn first_track_wins_a_full_tie() {
        let tracks = vec![
            TrackRecord::new("first.flac", "Song", "A", 300.0, 5_000_000),
            TrackRecord::new("second.flac", "Song", "A", 300.0, 5_000_000),
            TrackRecord::new("third.flac", "Song", "A", 300.0, 5_000_000),
        ];
        assert_eq!(kept(&select(&group(&tracks))), vec!["first.flac"]);
    }

    #[test]
    fn review_collects_discarded_tracks() {
        let tracks = vec![
            TrackRecord::new("a.flac", "Song", "A", 200.0, 1),
            TrackRecord::new("b.flac", "Song", "A", 400.0, 1),
            TrackRecord::new("c.flac", "Song", "A", 300.0, 1),
        ];
        let groups = vec![group(&tracks)];
        let reviewed = review(&groups);

        assert_eq!(reviewed[0].keeper().map(|t| t.file_name()), Some("b.flac".to_string()));
        let doomed: Vec<String> = marked_for_deletion(&reviewed)
            .iter()
            .map(|t| t.file_name())
            .collect();
        assert_eq!(doomed, vec!["a.flac", "c.flac"]);
    }

    #[test]
    fn signed_zero_durations_are_equal() {
        let tracks = vec![
            TrackRecord::new("small.wav", "Song", "A", 0.0, 100),
            TrackRecord::new("big.wav", "Song", "A", -0.0, 200),
        ];
        assert_eq!(kept(&select(&group(&tracks))), vec!["big.wav"]);

        let tracks = vec![
            TrackRecord::new("first.wav", "Song", "A", -0.0, 100),
            TrackRecord::new("second.wav", "Song", "A", 0.0, 100),
        ];
        assert_eq!(kept(&select(&group(&tracks))), vec!["first.wav"]);
    }

    #[test]
    fn keeper_of_nothing() {
        assert_eq!(keeper_index(&[]), None);
    }

    proptest! {
        #[test]
        fn exactly_one_keeper_with_the_best_quality(
            specs in prop::collection::vec((0u32..600, 0u64..50), 2..12)
        ) {
            let tracks: Vec<TrackRecord> = specs
                .iter()
                .enumerate()
                .map(|(i, &(duration, size))| {
                    TrackRecord::new(format!("{i}.flac"), "Song", "A", f64::from(duration), size)
                })
                .collect();
            let verdicts = select(&group(&tracks));

            let keepers: Vec<&Verdict> = verdicts.iter().filter(|v| v.keep).collect();
            prop_assert_eq!(keepers.len(), 1);

            let keeper = keepers[0].track;
            for track in &tracks {
                prop_assert!(compare_quality(keeper, track) != Ordering::Less);
            }

            // Among equally good tracks the earliest is kept.
            let first_best = tracks
                .iter()
                .position(|t| compare_quality(t, keeper) == Ordering::Equal);
            prop_assert_eq!(first_best.map(|i| tracks[i].path.clone()), Some(keeper.path.clone()));
        }
    }
}
