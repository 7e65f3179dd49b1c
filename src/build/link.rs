use super::utils::run_tool;
use crate::config::BuildSettings;
use crate::descriptor::ExecutableTarget;
use crate::error::BuildError;
use crate::toolchain::{Invocation, ToolRunner, Toolchain};
use colored::*;
use std::path::{Path, PathBuf};

/// `cc -o <binary> <objects...> <archives...>`.
///
/// Archives come after the executable's own objects so the linker can
/// resolve their symbols from them.
pub fn link_invocation(
    toolchain: &Toolchain,
    binary: &Path,
    objects: &[PathBuf],
    archives: &[PathBuf],
) -> Invocation {
    objects.iter().chain(archives).fold(
        Invocation::new(&toolchain.cc).arg("-o").path_arg(binary),
        |inv, input| inv.path_arg(input),
    )
}

/// Output path for an executable, honouring `-output`.
pub fn binary_path(settings: &BuildSettings, executable: &ExecutableTarget) -> PathBuf {
    let name = settings.output.as_deref().unwrap_or(&executable.name);
    Toolchain::binary_path(&settings.build_dir, name)
}

/// Link an executable against every library archive.
///
/// `archives` must be complete: every declared library has already been archived.
pub fn link_executable<R: ToolRunner + ?Sized>(
    runner: &R,
    toolchain: &Toolchain,
    settings: &BuildSettings,
    executable: &ExecutableTarget,
    objects: &[PathBuf],
    archives: &[PathBuf],
) -> Result<PathBuf, BuildError> {
    let binary = binary_path(settings, executable);
    let inv = link_invocation(toolchain, &binary, objects, archives);

    println!("   {} Linking executable: {}", "🔗".cyan(), executable.name);
    run_tool(runner, &inv, &executable.name, settings.verbose, |line| {
        println!("{}", line)
    })
    .map_err(|cause| BuildError::LinkFailure {
        executable: executable.name.clone(),
        cause,
    })?;

    Ok(binary)
}
