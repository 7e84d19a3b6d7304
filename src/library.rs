use crate::error::{Error, Result};
use crate::fs::find_audio_files;
use crate::metadata::read_track;
use crate::track::TrackRecord;
use log::{info, warn};
use rayon::prelude::*;
use std::path::PathBuf;

/// Every readable track found under a set of music directories.
pub struct Library {
    tracks: Vec<TrackRecord>,
    failed: usize,
}

impl Library {
    /// Discovers audio files under `dirs` and extracts them in parallel.
    ///
    /// `jobs` caps the number of worker threads. Files that cannot be read are
    /// logged and left out, and it is an error if that leaves nothing. Tracks
    /// are sorted by path.
    pub fn load(dirs: &[PathBuf], recursive: bool, jobs: Option<usize>) -> Result<Self> {
        let mut files = Vec::new();
        for dir in dirs {
            files.extend(find_audio_files(dir, recursive));
        }
        files.sort();
        files.dedup();

        if files.is_empty() {
            return Err(Error::NoAudioFiles(dirs.to_vec()));
        }
        info!("Processing {} files...", files.len());

        let extract = || -> Vec<Result<TrackRecord>> {
            files.par_iter().map(|path| read_track(path)).collect()
        };
        let results = match jobs {
            Some(n) => rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()?
                .install(extract),
            None => extract(),
        };

        let library = Self::from_results(results);
        if library.tracks.is_empty() {
            return Err(Error::NoReadableTracks(library.failed));
        }
        Ok(library)
    }

    fn from_results(results: Vec<Result<TrackRecord>>) -> Self {
        let mut tracks = Vec::with_capacity(results.len());
        let mut failed = 0;
        for result in results {
            match result {
                Ok(track) => tracks.push(track),
                Err(e) => {
                    warn!("Skipping file: {}", e);
                    failed += 1;
                }
            }
        }
        tracks.sort_by(|a, b| a.path.cmp(&b.path));

        info!(
            "Library loaded with {} tracks ({} unreadable).",
            tracks.len(),
            failed
        );

        Library { tracks, failed }
    }

    pub fn tracks(&self) -> &[TrackRecord] {
        &self.tracks
    }

    /// Files that were found but could not be read.
    pub fn failed(&self) -> usize {
        self.failed
    }
}
