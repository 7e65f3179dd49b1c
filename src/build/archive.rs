use super::utils::run_tool;
use crate::config::BuildSettings;
use crate::descriptor::LibraryTarget;
use crate::error::BuildError;
use crate::toolchain::{Invocation, ToolRunner, Toolchain};
use colored::*;
use std::path::{Path, PathBuf};

/// `ar rcs <build>/<name>.a <objects...>`, objects in declared source order.
pub fn archive_invocation(toolchain: &Toolchain, archive: &Path, objects: &[PathBuf]) -> Invocation {
    objects.iter().fold(
        Invocation::new(&toolchain.ar).arg("rcs").path_arg(archive),
        |inv, obj| inv.path_arg(obj),
    )
}

/// Bundle a library's compiled objects into its static archive.
///
/// Must only be called once every object in `objects` has been compiled.
pub fn archive_library<R: ToolRunner + ?Sized>(
    runner: &R,
    toolchain: &Toolchain,
    settings: &BuildSettings,
    library: &LibraryTarget,
    objects: &[PathBuf],
) -> Result<PathBuf, BuildError> {
    let archive = Toolchain::archive_path(&settings.build_dir, &library.name);
    let inv = archive_invocation(toolchain, &archive, objects);

    println!(
        "   {} Creating static library: {}",
        "📦".cyan(),
        archive.display()
    );
    run_tool(runner, &inv, &library.name, settings.verbose, |line| {
        println!("{}", line)
    })
    .map_err(|cause| BuildError::ArchiveFailure {
        library: library.name.clone(),
        cause,
    })?;

    Ok(archive)
}
