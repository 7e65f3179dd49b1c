//! Fatal build errors.
//!
//! Every variant aborts the run. There is no partial success and no retry:
//! the binary reports the error and exits non-zero.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Why an external tool invocation did not succeed.
#[derive(Debug)]
pub enum ToolFailure {
    /// The tool ran and exited unsuccessfully (`None` when killed by a signal).
    Exit(Option<i32>),
    /// The tool could not be started at all.
    Spawn(io::Error),
}

impl fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolFailure::Exit(Some(code)) => write!(f, "exited with status {}", code),
            ToolFailure::Exit(None) => write!(f, "terminated by signal"),
            ToolFailure::Spawn(e) => write!(f, "could not be started: {}", e),
        }
    }
}

/// Error type for a build run
#[derive(Debug)]
pub enum BuildError {
    /// The descriptor file could not be opened or read
    ConfigNotFound { path: PathBuf, source: io::Error },
    /// One or more sources in a chunk failed to compile
    CompileFailure {
        target: String,
        failed: Vec<(PathBuf, ToolFailure)>,
    },
    /// The archiver failed for a library
    ArchiveFailure { library: String, cause: ToolFailure },
    /// The linker failed for an executable
    LinkFailure { executable: String, cause: ToolFailure },
    /// A linked binary could not be copied to the install destination
    InstallCopyFailure {
        binary: PathBuf,
        destination: PathBuf,
        source: io::Error,
    },
    /// The build directory could not be created
    OutputDir { path: PathBuf, source: io::Error },
    /// The build directory exists but could not be removed
    CleanFailure { path: PathBuf, source: io::Error },
    /// The compile worker pool could not be started
    WorkerPool(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::ConfigNotFound { path, .. } => {
                write!(f, "Failed to find descriptor '{}'", path.display())
            }
            BuildError::CompileFailure { target, failed } => {
                write!(f, "Failed to compile target '{}':", target)?;
                for (src, cause) in failed {
                    write!(f, "\n  {} ({})", src.display(), cause)?;
                }
                Ok(())
            }
            BuildError::ArchiveFailure { library, cause } => {
                write!(f, "Library creation failed for '{}': archiver {}", library, cause)
            }
            BuildError::LinkFailure { executable, cause } => {
                write!(f, "Linking failed for '{}': linker {}", executable, cause)
            }
            BuildError::InstallCopyFailure {
                binary,
                destination,
                ..
            } => write!(
                f,
                "Install failed: could not copy {} to {}",
                binary.display(),
                destination.display()
            ),
            BuildError::OutputDir { path, .. } => {
                write!(f, "Failed to create build directory '{}'", path.display())
            }
            BuildError::CleanFailure { path, .. } => {
                write!(f, "Failed to remove '{}'", path.display())
            }
            BuildError::WorkerPool(msg) => write!(f, "Failed to start compile workers: {}", msg),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::ConfigNotFound { source, .. }
            | BuildError::InstallCopyFailure { source, .. }
            | BuildError::OutputDir { source, .. }
            | BuildError::CleanFailure { source, .. } => Some(source),
            _ => None,
        }
    }
}
