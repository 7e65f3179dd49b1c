use crate::error::BuildError;
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Copy a linked binary into `destination`, keeping its file name.
///
/// The destination directory is created if missing. Permissions travel with
/// the copy, so the installed binary stays executable.
pub fn install_binary(binary: &Path, destination: &Path) -> Result<PathBuf, BuildError> {
    let fail = |source| BuildError::InstallCopyFailure {
        binary: binary.to_path_buf(),
        destination: destination.to_path_buf(),
        source,
    };

    let file_name = binary.file_name().ok_or_else(|| {
        fail(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "binary path has no file name",
        ))
    })?;

    fs::create_dir_all(destination).map_err(fail)?;
    let target = destination.join(file_name);
    fs::copy(binary, &target).map_err(fail)?;

    println!(
        "{} Installed {} to {}",
        "✓".green(),
        binary.display(),
        destination.display()
    );
    Ok(target)
}
