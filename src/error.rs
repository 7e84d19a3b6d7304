use std::path::PathBuf;

use thiserror::Error;

/// Reasons a single record is left out of grouping. None of these is fatal,
/// the grouper counts and logs them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("no title")]
    MissingTitle,

    #[error("neither artist nor album artist is set")]
    MissingArtist,

    #[error("malformed duration: {0}")]
    MalformedDuration(f64),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot group an empty batch of tracks")]
    EmptyInput,

    #[error("no audio files found in {0:?}")]
    NoAudioFiles(Vec<PathBuf>),

    #[error("none of the {0} audio files could be read")]
    NoReadableTracks(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("tag error for {path:?}: {source}")]
    Tag {
        path: PathBuf,
        #[source]
        source: lofty::error::LoftyError,
    },

    #[error("unsupported file format: {0:?}")]
    UnsupportedFormat(PathBuf),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
