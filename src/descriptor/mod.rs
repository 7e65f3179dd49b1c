//! Build descriptor model.
//!
//! A descriptor is the project's build declaration: one set of project
//! metadata, then any number of libraries and executables, each owning an
//! ordered list of source files. It is built once by [`parse_descriptor`] and only
//! read afterwards.

mod parse;

pub use parse::{load_descriptor, parse_descriptor};

use std::path::PathBuf;

/// Placeholder for metadata keys the descriptor leaves out.
pub const NOT_PROVIDED: &str = "Not Provided";
pub const DEFAULT_VERSION: &str = "0.0.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMetadata {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl Default for ProjectMetadata {
    fn default() -> Self {
        Self {
            name: NOT_PROVIDED.to_string(),
            version: DEFAULT_VERSION.to_string(),
            description: NOT_PROVIDED.to_string(),
        }
    }
}

/// A static library: its sources are compiled and bundled into one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryTarget {
    pub name: String,
    pub files: Vec<PathBuf>,
}

/// An executable: its sources are compiled and linked against every library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableTarget {
    pub name: String,
    pub files: Vec<PathBuf>,
}

impl Default for LibraryTarget {
    fn default() -> Self {
        Self {
            name: NOT_PROVIDED.to_string(),
            files: Vec::new(),
        }
    }
}

impl Default for ExecutableTarget {
    fn default() -> Self {
        Self {
            name: NOT_PROVIDED.to_string(),
            files: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildDescriptor {
    pub project: ProjectMetadata,
    pub libraries: Vec<LibraryTarget>,
    pub executables: Vec<ExecutableTarget>,
}
