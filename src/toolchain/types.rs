use std::fmt;
use std::path::{Path, PathBuf};

/// One external tool call: a program and an explicit argument vector.
///
/// Arguments are never joined into a shell string, so paths containing
/// spaces or shell metacharacters are passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().to_string())
    }

    /// Program followed by its arguments, as recorded in `compile_commands.json`.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(self.program.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Exit status plus buffered stderr of a finished tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// The programs used to compile, archive and link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// C compiler driver, also used as the linker.
    pub cc: String,
    /// Static archiver.
    pub ar: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            cc: "gcc".to_string(),
            ar: "ar".to_string(),
        }
    }
}

impl Toolchain {
    pub const OBJECT_EXT: &'static str = "o";
    pub const ARCHIVE_EXT: &'static str = "a";

    /// Object file for `source`: the source's file stem with the object
    /// extension, placed directly in `build_dir`. The source's directory is
    /// dropped, so `src/a/x.c` and `src/b/x.c` map to the same object.
    pub fn object_path(build_dir: &Path, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| source.to_string_lossy().to_string());
        build_dir.join(format!("{}.{}", stem, Self::OBJECT_EXT))
    }

    pub fn archive_path(build_dir: &Path, library: &str) -> PathBuf {
        build_dir.join(format!("{}.{}", library, Self::ARCHIVE_EXT))
    }

    pub fn binary_path(build_dir: &Path, name: &str) -> PathBuf {
        if cfg!(target_os = "windows") {
            build_dir.join(format!("{}.exe", name))
        } else {
            build_dir.join(name)
        }
    }
}
