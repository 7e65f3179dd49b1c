//! Bounded-concurrency compilation.
//!
//! A target's sources are split into consecutive chunks of at most `jobs`
//! files. Each chunk is compiled in parallel on a rayon pool and fully joined
//! before the next chunk starts, so no more than `jobs` compiler processes are
//! ever alive at once. A failure does not cancel siblings in the same chunk:
//! the whole chunk finishes, then the target aborts.

use super::utils::run_tool;
use crate::config::BuildSettings;
use crate::error::{BuildError, ToolFailure};
use crate::toolchain::{Invocation, ToolRunner, Toolchain};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One `compile_commands.json` entry.
#[derive(Debug, Clone, Serialize)]
pub struct CompileCommand {
    pub directory: String,
    pub arguments: Vec<String>,
    pub file: String,
    pub output: String,
}

#[derive(Debug, Default)]
pub struct CompileReport {
    /// Object files in the target's declared source order.
    pub objects: Vec<PathBuf>,
    pub commands: Vec<CompileCommand>,
    /// Number of compile tasks handed to the pool.
    pub dispatched: usize,
    /// Number of chunk joins performed.
    pub barriers: usize,
    /// Source pairs that compile to the same object file.
    pub collisions: Vec<(PathBuf, PathBuf)>,
}

pub struct CompileScheduler<'a, R: ToolRunner + ?Sized> {
    runner: &'a R,
    toolchain: &'a Toolchain,
    settings: &'a BuildSettings,
}

impl<'a, R: ToolRunner + ?Sized> CompileScheduler<'a, R> {
    pub fn new(runner: &'a R, toolchain: &'a Toolchain, settings: &'a BuildSettings) -> Self {
        Self {
            runner,
            toolchain,
            settings,
        }
    }

    /// Build the compiler invocation for one source file.
    pub fn compile_invocation(&self, source: &Path, object: &Path) -> Invocation {
        let mut inv = Invocation::new(&self.toolchain.cc)
            .arg("-c")
            .path_arg(source)
            .arg("-o")
            .path_arg(object);
        for flag in self.settings.profile.cflags() {
            inv = inv.arg(*flag);
        }
        inv
    }

    /// Compile every file of `target`, chunk by chunk.
    pub fn compile_target(
        &self,
        target: &str,
        files: &[PathBuf],
    ) -> Result<CompileReport, BuildError> {
        let build_dir = &self.settings.build_dir;
        let mut report = CompileReport::default();
        if files.is_empty() {
            return Ok(report);
        }

        let objects: Vec<PathBuf> = files
            .iter()
            .map(|src| Toolchain::object_path(build_dir, src))
            .collect();
        report.collisions = warn_on_collisions(target, files, &objects);

        let invocations: Vec<Invocation> = files
            .iter()
            .zip(&objects)
            .map(|(src, obj)| self.compile_invocation(src, obj))
            .collect();

        let directory = std::env::current_dir()
            .map(|d| d.to_string_lossy().to_string())
            .unwrap_or_else(|_| ".".to_string());
        report.commands = files
            .iter()
            .zip(&objects)
            .zip(&invocations)
            .map(|((src, obj), inv)| CompileCommand {
                directory: directory.clone(),
                arguments: inv.argv(),
                file: src.to_string_lossy().to_string(),
                output: obj.to_string_lossy().to_string(),
            })
            .collect();

        let chunk_size = self.settings.pool_width();
        let width = chunk_size.min(files.len());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(width)
            .thread_name(|i| format!("diddy-cc-{}", i))
            .build()
            .map_err(|e| BuildError::WorkerPool(e.to_string()))?;

        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        pb.set_message(format!("Compiling {}", target));
        // A hidden bar (no terminal) swallows println, so fall back to stdout.
        let emit = |line: String| {
            if pb.is_hidden() {
                println!("{}", line);
            } else {
                pb.println(line);
            }
        };

        let jobs: Vec<(&PathBuf, &PathBuf, &Invocation)> = files
            .iter()
            .zip(&objects)
            .zip(&invocations)
            .map(|((src, obj), inv)| (src, obj, inv))
            .collect();

        for (index, chunk) in jobs.chunks(chunk_size).enumerate() {
            log::debug!(
                "{}: dispatching chunk {} ({} files, width {})",
                target,
                index,
                chunk.len(),
                width
            );

            // Collecting every result (not short-circuiting) is the join barrier:
            // the chunk is done only when each task has finished, pass or fail.
            let results: Vec<Result<(), ToolFailure>> = pool.install(|| {
                chunk
                    .par_iter()
                    .map(|(src, obj, inv)| -> Result<(), ToolFailure> {
                        let label = src.display().to_string();
                        run_tool(self.runner, inv, &label, self.settings.verbose, emit)?;
                        emit(format!(
                            "{} Compiled {} -> {}",
                            "✓".green(),
                            src.display(),
                            obj.display()
                        ));
                        pb.inc(1);
                        Ok(())
                    })
                    .collect()
            });

            report.dispatched += chunk.len();
            report.barriers += 1;

            let failed: Vec<(PathBuf, ToolFailure)> = chunk
                .iter()
                .zip(results)
                .filter_map(|((src, _, _), res)| res.err().map(|e| ((*src).clone(), e)))
                .collect();

            if !failed.is_empty() {
                pb.abandon_with_message(format!("Failed to compile {}", target));
                return Err(BuildError::CompileFailure {
                    target: target.to_string(),
                    failed,
                });
            }
        }

        pb.finish_and_clear();
        report.objects = objects;
        Ok(report)
    }
}

// Flat object naming means two sources with the same stem write the same
// object file. The build keeps going, but the user is told.
fn warn_on_collisions(
    target: &str,
    files: &[PathBuf],
    objects: &[PathBuf],
) -> Vec<(PathBuf, PathBuf)> {
    let mut seen: HashMap<&PathBuf, &PathBuf> = HashMap::new();
    let mut collisions = Vec::new();
    for (src, obj) in files.iter().zip(objects) {
        if let Some(first) = seen.insert(obj, src)
            && first != src
        {
            log::warn!(
                "{}: {} and {} both compile to {}",
                target,
                first.display(),
                src.display(),
                obj.display()
            );
            println!(
                "{} {}: {} and {} both compile to {}",
                "!".yellow(),
                target,
                first.display(),
                src.display(),
                obj.display()
            );
            collisions.push((first.clone(), src.clone()));
        }
    }
    collisions
}
