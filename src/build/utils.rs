use super::feedback::FeedbackAnalyzer;
use crate::error::{BuildError, ToolFailure};
use crate::toolchain::{Invocation, ToolRunner};
use colored::*;
use std::fs;
use std::path::Path;

// --- Helper: Run one external tool, reporting through `print` ---
//
// `print` is either `println!` or a progress bar's `println`, so output from
// concurrent workers stays line-buffered.
pub(crate) fn run_tool<R, P>(
    runner: &R,
    invocation: &Invocation,
    label: &str,
    verbose: bool,
    print: P,
) -> Result<(), ToolFailure>
where
    R: ToolRunner + ?Sized,
    P: Fn(String),
{
    if verbose {
        print(format!("{} {}", "CMD:".bold().yellow(), invocation));
    }

    let output = runner.run(invocation).map_err(ToolFailure::Spawn)?;
    let stderr = output.stderr.trim_end();

    if output.success() {
        if !stderr.is_empty() {
            print(format!("{} Warning in {}:\n{}", "!".yellow(), label, stderr));
        }
        return Ok(());
    }

    if !stderr.is_empty() {
        print(format!("{} Error in {}:\n{}", "x".red(), label, stderr));
        if let Some(hint) = FeedbackAnalyzer::analyze(stderr) {
            print(format!("\n{} {}", "💡".yellow(), hint));
        }
    }
    Err(ToolFailure::Exit(output.code))
}

// --- Helper: Create the build directory if needed ---
pub(crate) fn ensure_dir(path: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(path).map_err(|source| BuildError::OutputDir {
        path: path.to_path_buf(),
        source,
    })
}
