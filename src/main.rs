//! # diddy CLI Entry Point
//!
//! `dd` keeps the single-dash flag style of classic build scripts
//! (`-build out -release`). Flags are rewritten to their double-dash form
//! before clap sees them, so `--build out` works too.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::ffi::OsString;
use std::path::PathBuf;

use diddy::build::{self, BuildOutcome};
use diddy::config::{BuildSettings, DEFAULT_BUILD_DIR, DEFAULT_DESCRIPTOR, DEFAULT_JOBS, Profile};
use diddy::ui;

/// Flags accepted with a single leading dash.
const LONG_FLAGS: &[&str] = &[
    "debug", "release", "nodebug", "build", "clean", "verbose", "output", "install", "jobs",
    "file", "help", "version",
];

#[derive(Parser, Debug)]
#[command(name = "dd")]
#[command(about = "Build C libraries and executables from a diddy descriptor", version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
struct Cli {
    /// Enable debug build (default)
    #[arg(long, overrides_with = "release")]
    debug: bool,
    /// Enable release build
    #[arg(long, visible_alias = "nodebug", overrides_with = "debug")]
    release: bool,
    /// Specify build folder
    #[arg(long = "build", value_name = "DIR", default_value = DEFAULT_BUILD_DIR)]
    build_dir: PathBuf,
    /// Remove the build folder and exit
    #[arg(long)]
    clean: bool,
    /// Show every external command before running it
    #[arg(long)]
    verbose: bool,
    /// Override executable name
    #[arg(long, value_name = "NAME")]
    output: Option<String>,
    /// Copy linked executables into PATH
    #[arg(long, value_name = "PATH")]
    install: Option<PathBuf>,
    /// Maximum number of concurrent compiler processes
    #[arg(long, value_name = "N", default_value_t = DEFAULT_JOBS)]
    jobs: usize,
    /// Descriptor file to read
    #[arg(long = "file", value_name = "PATH", default_value = DEFAULT_DESCRIPTOR)]
    descriptor: PathBuf,
}

impl Cli {
    fn into_settings(self) -> BuildSettings {
        BuildSettings {
            profile: if self.release {
                Profile::Release
            } else {
                Profile::Debug
            },
            build_dir: self.build_dir,
            clean: self.clean,
            verbose: self.verbose,
            output: self.output,
            install: self.install,
            jobs: self.jobs,
            descriptor: self.descriptor,
        }
    }
}

/// Rewrite `-build` to `--build` for every known flag; everything else passes through.
fn normalize_args<I: IntoIterator<Item = OsString>>(args: I) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| {
            if arg.to_str().is_some_and(is_single_dash_flag) {
                let mut long = OsString::from("-");
                long.push(&arg);
                long
            } else {
                arg
            }
        })
        .collect()
}

fn is_single_dash_flag(arg: &str) -> bool {
    match arg.strip_prefix('-') {
        Some(name) if !name.starts_with('-') => LONG_FLAGS.contains(&name),
        _ => false,
    }
}

/// Prefix for a failed run. Cleaning never reads the descriptor, so it gets none.
fn failure_context(settings: &BuildSettings) -> Option<String> {
    (!settings.clean).then(|| format!("Build of '{}' aborted", settings.descriptor.display()))
}

fn run(settings: BuildSettings) -> Result<()> {
    let context = failure_context(&settings);
    let result = build::build_project(settings);
    let outcome = match context {
        Some(context) => result.context(context)?,
        None => result?,
    };

    if let BuildOutcome::Built(summary) = outcome {
        let table = ui::summary_table(&summary);
        if !table.is_empty() {
            table.print();
        }
        println!(
            "{} {} files compiled ({} build)",
            "✓".green(),
            summary.compiled,
            summary.profile.label()
        );
        println!("{}", "BUILD COMPLETE!".green().bold());
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    if let Err(e) = run(cli.into_settings()) {
        eprintln!("{} {:#}", "x".red(), e);
        std::process::exit(1);
    }
    Ok(())
}
