//! External tool boundary.
//!
//! The build never shells out. Every compiler, archiver and linker call goes
//! through [`ToolRunner`] as an [`Invocation`] with an explicit argument list,
//! and comes back as a [`ToolOutput`] carrying the exit status.

pub mod types;

pub use types::{Invocation, ToolOutput, Toolchain};

use std::io;
use std::process::Command;

/// Runs an external tool to completion and reports how it exited.
///
/// Implementations must be shareable across compile workers.
pub trait ToolRunner: Sync {
    fn run(&self, invocation: &Invocation) -> io::Result<ToolOutput>;
}

/// Spawns real processes. Stdout is inherited, stderr is buffered so that
/// concurrent compiles do not interleave their diagnostics.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<ToolOutput> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdout(std::process::Stdio::inherit())
            .output()?;
        Ok(ToolOutput {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Resolve the toolchain, letting `CC` and `AR` override the defaults.
pub fn detect_toolchain() -> Toolchain {
    toolchain_from(std::env::var("CC").ok(), std::env::var("AR").ok())
}

fn toolchain_from(cc: Option<String>, ar: Option<String>) -> Toolchain {
    let mut tc = Toolchain::default();
    if let Some(cc) = cc.filter(|s| !s.trim().is_empty()) {
        tc.cc = cc;
    }
    if let Some(ar) = ar.filter(|s| !s.trim().is_empty()) {
        tc.ar = ar;
    }
    log::debug!("toolchain: cc={} ar={}", tc.cc, tc.ar);
    tc
}
