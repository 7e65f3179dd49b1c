use super::archive::archive_library;
use super::clean::clean;
use super::install::install_binary;
use super::link::link_executable;
use super::scheduler::{CompileCommand, CompileScheduler};
use super::utils::ensure_dir;
use crate::config::{BuildSettings, Profile};
use crate::descriptor::{self, BuildDescriptor, ProjectMetadata};
use crate::error::BuildError;
use crate::toolchain::{self, SystemRunner, ToolRunner, Toolchain};
use colored::*;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Where a run currently is.
///
/// `Clean` and `Done` end a successful run, `Aborted` ends a failed one.
/// There is no resumption: a new run starts from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Init,
    ParseDescriptor,
    BuildLibraries,
    BuildExecutables,
    Install,
    Clean,
    Done,
    Aborted,
}

#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub project: ProjectMetadata,
    pub profile: Profile,
    pub archives: Vec<PathBuf>,
    pub binaries: Vec<PathBuf>,
    pub installed: Vec<PathBuf>,
    pub compiled: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub enum BuildOutcome {
    Cleaned { path: PathBuf, removed: bool },
    Built(BuildSummary),
}

pub struct Orchestrator<'a, R: ToolRunner + ?Sized> {
    settings: BuildSettings,
    toolchain: Toolchain,
    runner: &'a R,
    history: Vec<BuildState>,
}

impl<'a, R: ToolRunner + ?Sized> Orchestrator<'a, R> {
    pub fn new(settings: BuildSettings, toolchain: Toolchain, runner: &'a R) -> Self {
        Self {
            settings,
            toolchain,
            runner,
            history: vec![BuildState::Init],
        }
    }

    pub fn state(&self) -> BuildState {
        self.history.last().copied().unwrap_or(BuildState::Init)
    }

    /// Every state visited so far, starting with `Init`.
    pub fn history(&self) -> &[BuildState] {
        &self.history
    }

    fn enter(&mut self, state: BuildState) {
        log::debug!("{:?} -> {:?}", self.state(), state);
        self.history.push(state);
    }

    /// Run the whole pipeline: clean, or parse the descriptor and build it.
    pub fn run(&mut self) -> Result<BuildOutcome, BuildError> {
        if self.settings.clean {
            self.enter(BuildState::Clean);
            let path = self.settings.build_dir.clone();
            return match clean(&path) {
                Ok(removed) => Ok(BuildOutcome::Cleaned { path, removed }),
                Err(e) => {
                    self.enter(BuildState::Aborted);
                    Err(e)
                }
            };
        }

        println!(
            "{} {} build",
            "⚙".blue(),
            self.settings.profile.label().bold()
        );

        self.enter(BuildState::ParseDescriptor);
        let descriptor = match descriptor::load_descriptor(&self.settings.descriptor) {
            Ok(d) => d,
            Err(e) => {
                self.enter(BuildState::Aborted);
                return Err(e);
            }
        };
        self.build(descriptor).map(BuildOutcome::Built)
    }

    /// Build an already parsed descriptor, taking ownership of it.
    pub fn build(&mut self, descriptor: BuildDescriptor) -> Result<BuildSummary, BuildError> {
        let result = self.build_stages(descriptor);
        match &result {
            Ok(_) => self.enter(BuildState::Done),
            Err(_) => self.enter(BuildState::Aborted),
        }
        result
    }

    fn build_stages(&mut self, descriptor: BuildDescriptor) -> Result<BuildSummary, BuildError> {
        let start_time = Instant::now();
        let BuildDescriptor {
            project,
            libraries,
            executables,
        } = descriptor;

        println!(
            "{} Project: {} | Version: {} | Description: {}",
            "🚀".blue(),
            project.name.bold(),
            project.version,
            project.description
        );

        ensure_dir(&self.settings.build_dir)?;

        if self.settings.output.is_some() && executables.len() > 1 {
            println!(
                "{} -output names all {} executables the same; each link overwrites the last",
                "!".yellow(),
                executables.len()
            );
        }

        let mut compiled = 0;
        let mut commands: Vec<CompileCommand> = Vec::new();

        // Every library is compiled and archived before any executable links.
        self.enter(BuildState::BuildLibraries);
        println!("{} Compiling libraries...", "⚙".blue());
        let mut archives = Vec::with_capacity(libraries.len());
        for library in &libraries {
            let report = CompileScheduler::new(self.runner, &self.toolchain, &self.settings)
                .compile_target(&library.name, &library.files)?;
            compiled += report.dispatched;
            commands.extend(report.commands);
            archives.push(archive_library(
                self.runner,
                &self.toolchain,
                &self.settings,
                library,
                &report.objects,
            )?);
        }

        self.enter(BuildState::BuildExecutables);
        println!("{} Compiling executables...", "⚙".blue());
        let mut binaries = Vec::with_capacity(executables.len());
        for executable in &executables {
            let report = CompileScheduler::new(self.runner, &self.toolchain, &self.settings)
                .compile_target(&executable.name, &executable.files)?;
            compiled += report.dispatched;
            commands.extend(report.commands);
            binaries.push(link_executable(
                self.runner,
                &self.toolchain,
                &self.settings,
                executable,
                &report.objects,
                &archives,
            )?);
        }

        self.write_compile_commands(&commands);

        let mut installed = Vec::new();
        if let Some(dest) = self.settings.install.clone() {
            self.enter(BuildState::Install);
            for binary in &binaries {
                installed.push(install_binary(binary, &dest)?);
            }
        }

        println!(
            "{} Build finished in {:.2?}",
            "✓".green(),
            start_time.elapsed()
        );

        Ok(BuildSummary {
            project,
            profile: self.settings.profile,
            archives,
            binaries,
            installed,
            compiled,
            elapsed: start_time.elapsed(),
        })
    }

    // compile_commands.json is a convenience for editors; failing to write it
    // does not fail the build.
    fn write_compile_commands(&self, commands: &[CompileCommand]) {
        let path = self.settings.build_dir.join("compile_commands.json");
        let written = serde_json::to_string_pretty(commands)
            .map_err(std::io::Error::other)
            .and_then(|json| fs::write(&path, json));
        if let Err(e) = written {
            log::warn!("could not write {}: {}", path.display(), e);
            println!(
                "{} Could not write {}: {}",
                "!".yellow(),
                path.display(),
                e
            );
        }
    }
}

// --- CORE: Build Project with real tools ---
pub fn build_project(settings: BuildSettings) -> Result<BuildOutcome, BuildError> {
    let runner = SystemRunner;
    Orchestrator::new(settings, toolchain::detect_toolchain(), &runner).run()
}
