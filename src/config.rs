use std::path::PathBuf;

/// Default descriptor file name, looked up in the current directory.
pub const DEFAULT_DESCRIPTOR: &str = "diddy";
pub const DEFAULT_BUILD_DIR: &str = "build";
/// Upper bound on concurrently running compiler processes.
pub const DEFAULT_JOBS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    #[default]
    Debug,
    Release,
}

impl Profile {
    /// Extra compiler flags implied by the profile.
    pub fn cflags(&self) -> &'static [&'static str] {
        match self {
            Profile::Debug => &["-g", "-Wall"],
            Profile::Release => &["-O2"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Profile::Debug => "Debug",
            Profile::Release => "Release",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BuildSettings {
    pub profile: Profile,
    pub build_dir: PathBuf,
    pub clean: bool,
    pub verbose: bool,
    /// Overrides the output name of every executable.
    pub output: Option<String>,
    /// Directory linked binaries are copied into after a successful build.
    pub install: Option<PathBuf>,
    pub jobs: usize,
    pub descriptor: PathBuf,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
            clean: false,
            verbose: false,
            output: None,
            install: None,
            jobs: DEFAULT_JOBS,
            descriptor: PathBuf::from(DEFAULT_DESCRIPTOR),
        }
    }
}

impl BuildSettings {
    /// Worker count actually used by the compile scheduler.
    pub fn pool_width(&self) -> usize {
        self.jobs.max(1)
    }
}
