use std::io::Write;

use serde::Serialize;

use crate::artist::normalize_artists;
use crate::error::Result;
use crate::quality::ReviewedGroup;
use crate::track::TrackRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human readable tree
    #[default]
    Text,
    Json,
    Csv,
}

/// One track of one group, flattened for JSON and CSV output.
#[derive(Debug, Serialize)]
struct Row<'a> {
    group: usize,
    label: &'a str,
    keep: bool,
    path: String,
    title: &'a str,
    artist: &'a str,
    album_artist: &'a str,
    duration: f64,
    size: u64,
    format: &'static str,
}

/// A tag or file property that is not the same for every member of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDiff {
    pub field: &'static str,
    /// One value per member, in group order. Blank when the member has none.
    pub values: Vec<String>,
}

type Extractor = fn(&TrackRecord) -> String;

const COMPARED_FIELDS: [(&str, Extractor); 8] = [
    ("title", |t: &TrackRecord| t.title.trim().to_string()),
    ("artist", |t: &TrackRecord| t.artist.trim().to_string()),
    ("album artist", |t: &TrackRecord| t.album_artist.trim().to_string()),
    ("artists", |t: &TrackRecord| normalize_artists(&t.artist, &t.album_artist).to_string()),
    ("album", |t: &TrackRecord| t.album.as_deref().unwrap_or_default().trim().to_string()),
    ("format", |t: &TrackRecord| {
        let kind = if t.format.is_lossless() { "lossless" } else { "lossy" };
        format!("{} ({})", t.format.extension(), kind)
    }),
    ("duration", TrackRecord::duration_formatted),
    ("size", |t: &TrackRecord| t.size.to_string()),
];

/// Fields whose values differ between the members of `group`, so a reader
/// can tell the copies apart.
pub fn differences(group: &ReviewedGroup<'_>) -> Vec<FieldDiff> {
    COMPARED_FIELDS
        .iter()
        .filter_map(|&(field, extract)| {
            let values: Vec<String> = group.verdicts.iter().map(|v| extract(v.track)).collect();
            let first = values.first()?;
            values
                .iter()
                .any(|value| value != first)
                .then_some(FieldDiff { field, values })
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct JsonGroup<'a> {
    #[serde(flatten)]
    group: &'a ReviewedGroup<'a>,
    differences: Vec<FieldDiff>,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    groups: Vec<JsonGroup<'a>>,
    skipped: usize,
    marked_for_deletion: usize,
}

fn rows<'a>(reviewed: &'a [ReviewedGroup<'a>]) -> impl Iterator<Item = Row<'a>> {
    reviewed.iter().enumerate().flat_map(|(n, group)| {
        group.verdicts.iter().map(move |verdict| {
            let track = verdict.track;
            Row {
                group: n + 1,
                label: &group.label,
                keep: verdict.keep,
                path: track.path.display().to_string(),
                title: &track.title,
                artist: &track.artist,
                album_artist: &track.album_artist,
                duration: track.duration,
                size: track.size,
                format: track.format.extension(),
            }
        })
    })
}

/// Writes the reviewed groups in the requested format.
pub fn render(
    reviewed: &[ReviewedGroup<'_>],
    skipped: usize,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Text => render_text(reviewed, skipped, out),
        OutputFormat::Json => {
            let marked_for_deletion = reviewed.iter().map(|g| g.discarded().count()).sum();
            let groups = reviewed
                .iter()
                .map(|group| JsonGroup {
                    group,
                    differences: differences(group),
                })
                .collect();
            let report = JsonReport {
                groups,
                skipped,
                marked_for_deletion,
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
            Ok(())
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            for row in rows(reviewed) {
                writer.serialize(row)?;
            }
            writer.flush()?;
            Ok(())
        }
    }
}

fn render_text(reviewed: &[ReviewedGroup<'_>], skipped: usize, out: &mut dyn Write) -> Result<()> {
    if reviewed.is_empty() {
        writeln!(out, "No duplicates found!")?;
    }

    for group in reviewed {
        writeln!(out, "{}", group.label)?;
        for verdict in &group.verdicts {
            let track = verdict.track;
            writeln!(
                out,
                "  {} {} | {} | {} | {} | {} MB | {}",
                if verdict.keep { "[ ]" } else { "[X]" },
                track.file_name(),
                track.title,
                track.artist_credit().unwrap_or_default(),
                track.duration_formatted(),
                track.size_mb(),
                if track.format.is_lossless() {
                    "Lossless"
                } else {
                    "Lossy"
                },
            )?;
        }

        let diffs = differences(group);
        if !diffs.is_empty() {
            writeln!(out, "  Differences:")?;
            for diff in diffs {
                writeln!(out, "    {}: {}", diff.field, diff.values.join(" | "))?;
            }
        }
        writeln!(out)?;
    }

    let files: usize = reviewed.iter().map(|g| g.verdicts.len()).sum();
    let marked: usize = reviewed.iter().map(|g| g.discarded().count()).sum();
    writeln!(
        out,
        "Found {} duplicate groups with {} files total",
        reviewed.len(),
        files
    )?;
    writeln!(out, "Auto-selected {} shorter/smaller files for deletion", marked)?;
    if skipped > 0 {
        writeln!(out, "Skipped {} files without proper metadata", skipped)?;
    }
    Ok(())
}
