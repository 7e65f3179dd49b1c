//! Parser for the section-based descriptor format.
//!
//! ```text
//! [project]
//! name = demo
//! version = 1.0.0
//!
//! [library]
//! name = util
//! files = src/util.c src/str.c
//!
//! [executable]
//! name = demo
//! files = src/main.c
//! ```
//!
//! Blank lines and `#` comments are skipped. Each header opens a section that
//! runs until the next header. Unknown keys and unknown sections are ignored.

use super::{BuildDescriptor, ExecutableTarget, LibraryTarget, ProjectMetadata};
use crate::error::BuildError;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Project,
    Library,
    Executable,
    Unknown,
}

/// Read and parse the descriptor at `path`.
pub fn load_descriptor(path: &Path) -> Result<BuildDescriptor, BuildError> {
    let content = fs::read_to_string(path).map_err(|source| BuildError::ConfigNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_descriptor(&content))
}

/// Parse descriptor text. Parsing itself cannot fail: malformed lines are skipped.
pub fn parse_descriptor(content: &str) -> BuildDescriptor {
    let mut descriptor = BuildDescriptor::default();
    let mut section = Section::None;

    for (lineno, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = match line {
                "[project]" => {
                    // A repeated [project] section replaces the previous one entirely.
                    descriptor.project = ProjectMetadata::default();
                    Section::Project
                }
                "[library]" => {
                    descriptor.libraries.push(LibraryTarget::default());
                    Section::Library
                }
                "[executable]" => {
                    descriptor.executables.push(ExecutableTarget::default());
                    Section::Executable
                }
                other => {
                    log::debug!("line {}: ignoring unknown section {}", lineno + 1, other);
                    Section::Unknown
                }
            };
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            log::debug!("line {}: no '=' in '{}', skipped", lineno + 1, line);
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        match section {
            Section::Project => {
                let project = &mut descriptor.project;
                match key {
                    "name" => project.name = value.to_string(),
                    "version" => project.version = value.to_string(),
                    "description" => project.description = value.to_string(),
                    _ => log::debug!("line {}: unknown project key '{}'", lineno + 1, key),
                }
            }
            Section::Library => {
                if let Some(lib) = descriptor.libraries.last_mut() {
                    apply_target_key(&mut lib.name, &mut lib.files, key, value);
                }
            }
            Section::Executable => {
                if let Some(exe) = descriptor.executables.last_mut() {
                    apply_target_key(&mut exe.name, &mut exe.files, key, value);
                }
            }
            Section::None | Section::Unknown => {}
        }
    }

    descriptor
}

fn apply_target_key(name: &mut String, files: &mut Vec<PathBuf>, key: &str, value: &str) {
    match key {
        "name" => *name = value.to_string(),
        "files" => *files = value.split_whitespace().map(PathBuf::from).collect(),
        _ => log::debug!("unknown target key '{}'", key),
    }
}
