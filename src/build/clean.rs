//! Build directory removal (`-clean`).
//!
//! Cleaning never reads the descriptor: it removes the build directory and
//! the run ends there.

use crate::error::BuildError;
use colored::*;

use std::fs;
use std::io;
use std::path::Path;

/// Recursively remove `build_dir`. Returns whether anything was removed;
/// a directory that does not exist is already clean. A file or symlink at
/// that path is removed itself.
pub fn clean(build_dir: &Path) -> Result<bool, BuildError> {
    let removed = match fs::symlink_metadata(build_dir) {
        Ok(meta) if !meta.is_dir() => fs::remove_file(build_dir),
        _ => fs::remove_dir_all(build_dir),
    };
    match removed {
        Ok(()) => {
            println!(
                "{} Cleaned build folder {}",
                "✓".green(),
                build_dir.display()
            );
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            println!("{} Nothing to clean", "!".yellow());
            Ok(false)
        }
        Err(source) => Err(BuildError::CleanFailure {
            path: build_dir.to_path_buf(),
            source,
        }),
    }
}
