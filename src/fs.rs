use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::{debug, warn};

use crate::error::Result;
use crate::track::AudioFormat;

/// Walks `root` and collects every file with a supported audio extension.
/// Directories that cannot be read are logged and skipped.
pub fn find_audio_files(root: &Path, recursive: bool) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let mut dirs_to_visit = Vec::with_capacity(16);
    dirs_to_visit.push(root.to_path_buf());

    while let Some(current_dir) = dirs_to_visit.pop() {
        let entries = match fs::read_dir(&current_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot read directory {:?}: {}", current_dir, e);
                continue;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();

            if path.is_dir() {
                if recursive {
                    dirs_to_visit.push(path);
                }
            } else if path.is_file() && AudioFormat::from_path(&path).is_some() {
                files.push(path);
            }
        }
    }

    debug!("Found {} audio files under {:?}", files.len(), root);
    files
}

/// Writes the list of files about to be deleted into `dir` and returns its path.
pub fn write_backup_list(files: &[&Path], dir: &Path) -> Result<PathBuf> {
    let now = Local::now();
    let backup_path = dir.join(format!(
        "deleted_files_backup_{}.txt",
        now.format("%Y%m%d_%H%M%S")
    ));

    let mut sorted: Vec<&Path> = files.to_vec();
    sorted.sort();

    let mut file = fs::File::create(&backup_path)?;
    writeln!(file, "Music Duplicate Finder - Deleted Files Backup")?;
    writeln!(file, "Date: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file, "Directory: {}", dir.display())?;
    writeln!(file, "{}", "=".repeat(60))?;
    writeln!(file)?;
    for path in sorted {
        writeln!(file, "{}", path.display())?;
    }

    Ok(backup_path)
}

/// Outcome of [`delete_files`].
#[derive(Debug, Default)]
pub struct Deletion {
    pub deleted: usize,
    /// One "file name: reason" line per failure.
    pub failed: Vec<String>,
}

/// Removes every file, carrying on past failures.
pub fn delete_files(files: &[&Path]) -> Deletion {
    let mut outcome = Deletion::default();

    for path in files {
        match fs::remove_file(path) {
            Ok(()) => outcome.deleted += 1,
            Err(e) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                let reason = match e.kind() {
                    std::io::ErrorKind::NotFound => "File not found".to_string(),
                    std::io::ErrorKind::PermissionDenied => "Permission denied".to_string(),
                    _ => e.to_string(),
                };
                warn!("Failed to remove file {:?}: {}", path, e);
                outcome.failed.push(format!("{}: {}", name, reason));
            }
        }
    }

    outcome
}
