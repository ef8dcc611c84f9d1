//! Input file discovery.
//!
//! The session looks for the training and test files in four fixed
//! candidate directories, in this order:
//!
//! 1. the working directory
//! 2. the program's own directory
//! 3. `<working directory>/data`
//! 4. `<program directory>/data`
//!
//! Every candidate is checked for every file. When a file exists in more than
//! one candidate, the last one in the order above wins.

use crate::error::{EdaError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolved locations of both input files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetPaths {
    pub train: PathBuf,
    pub test: PathBuf,
}

/// Build the ordered candidate list from the two base directories.
///
/// The list is not deduplicated: if both bases are the same directory it is
/// searched twice, which cannot change the outcome.
pub fn candidate_dirs(working_dir: &Path, program_dir: &Path, data_dir_name: &str) -> Vec<PathBuf> {
    vec![
        working_dir.to_path_buf(),
        program_dir.to_path_buf(),
        working_dir.join(data_dir_name),
        program_dir.join(data_dir_name),
    ]
}

/// Directory containing the running executable.
pub fn program_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

/// Return the path of `file_name` in the last candidate that contains it.
pub fn find_last(candidates: &[PathBuf], file_name: &str) -> Option<PathBuf> {
    let mut resolved = None;

    for dir in candidates {
        let path = dir.join(file_name);
        if path.is_file() {
            debug!("Found {} in {}", file_name, dir.display());
            resolved = Some(path);
        }
    }

    resolved
}

/// Resolve both input files or fail with the full list of searched candidates.
pub fn locate_files(
    candidates: &[PathBuf],
    train_file: &str,
    test_file: &str,
) -> Result<DatasetPaths> {
    let train = find_last(candidates, train_file);
    let test = find_last(candidates, test_file);

    match (train, test) {
        (Some(train), Some(test)) => Ok(DatasetPaths { train, test }),
        (train, test) => Err(EdaError::MissingInputFiles {
            train,
            test,
            searched: candidates.to_vec(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Layout {
        _root: TempDir,
        candidates: Vec<PathBuf>,
    }

    /// Two base dirs with `data` subdirectories, all created and empty.
    fn layout() -> Layout {
        let root = TempDir::new().unwrap();
        let work = root.path().join("work");
        let program = root.path().join("bin");
        let candidates = candidate_dirs(&work, &program, "data");
        for dir in &candidates {
            fs::create_dir_all(dir).unwrap();
        }
        Layout {
            _root: root,
            candidates,
        }
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "PassengerId\n1\n").unwrap();
    }

    #[test]
    fn test_candidate_order() {
        let dirs = candidate_dirs(Path::new("/w"), Path::new("/p"), "data");
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/w"),
                PathBuf::from("/p"),
                PathBuf::from("/w/data"),
                PathBuf::from("/p/data"),
            ]
        );
    }

    #[test]
    fn test_single_match() {
        let layout = layout();
        touch(&layout.candidates[2], "train.csv");

        let found = find_last(&layout.candidates, "train.csv");
        assert_eq!(found, Some(layout.candidates[2].join("train.csv")));
    }

    #[test]
    fn test_last_match_wins() {
        let layout = layout();
        for dir in &layout.candidates {
            touch(dir, "train.csv");
        }

        let found = find_last(&layout.candidates, "train.csv");
        assert_eq!(found, Some(layout.candidates[3].join("train.csv")));
    }

    #[test]
    fn test_last_match_wins_for_every_subset() {
        let layout = layout();
        // Each bit of `mask` decides whether candidate i holds the file.
        for mask in 1u8..16 {
            for (i, dir) in layout.candidates.iter().enumerate() {
                let path = dir.join("test.csv");
                if mask & (1 << i) != 0 {
                    touch(dir, "test.csv");
                } else if path.exists() {
                    fs::remove_file(path).unwrap();
                }
            }

            let expected_idx = (0..4).rev().find(|i| mask & (1 << i) != 0).unwrap();
            let found = find_last(&layout.candidates, "test.csv");
            assert_eq!(
                found,
                Some(layout.candidates[expected_idx].join("test.csv")),
                "mask {:04b}",
                mask
            );
        }
    }

    #[test]
    fn test_directory_named_like_file_is_ignored() {
        let layout = layout();
        fs::create_dir_all(layout.candidates[3].join("train.csv")).unwrap();
        touch(&layout.candidates[0], "train.csv");

        let found = find_last(&layout.candidates, "train.csv");
        assert_eq!(found, Some(layout.candidates[0].join("train.csv")));
    }

    #[test]
    fn test_locate_files_in_different_candidates() {
        let layout = layout();
        touch(&layout.candidates[0], "train.csv");
        touch(&layout.candidates[3], "test.csv");

        let paths = locate_files(&layout.candidates, "train.csv", "test.csv").unwrap();
        assert_eq!(paths.train, layout.candidates[0].join("train.csv"));
        assert_eq!(paths.test, layout.candidates[3].join("test.csv"));
    }

    #[test]
    fn test_locate_files_missing_test() {
        let layout = layout();
        touch(&layout.candidates[1], "train.csv");

        let err = locate_files(&layout.candidates, "train.csv", "test.csv").unwrap_err();
        match err {
            EdaError::MissingInputFiles {
                train,
                test,
                searched,
            } => {
                assert_eq!(train, Some(layout.candidates[1].join("train.csv")));
                assert!(test.is_none());
                assert_eq!(searched, layout.candidates);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_locate_files_nothing_found() {
        let layout = layout();
        let err = locate_files(&layout.candidates, "train.csv", "test.csv").unwrap_err();
        assert!(err.is_missing_input());
    }
}
