//! # diddy - a small C build orchestrator
//!
//! diddy reads a declarative `diddy` descriptor from the current directory and
//! turns it into static archives and linked executables.
//!
//! ## Pipeline
//!
//! 1. Parse the descriptor into a [`descriptor::BuildDescriptor`].
//! 2. For every library: compile its sources (at most `jobs` compilers at a
//!    time), then archive the objects.
//! 3. For every executable: compile its sources, then link them against every
//!    library archive.
//! 4. Optionally copy the binaries to an install directory.
//!
//! Any failure aborts the run. Nothing is incremental: every source is
//! recompiled on every run.
//!
//! ## Descriptor
//!
//! ```text
//! [project]
//! name = demo
//! version = 0.1.0
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
//! ## Module Organization
//!
//! - [`descriptor`] - Descriptor model and parser
//! - [`build`] - Compile scheduler, archiver, linker and the orchestrator
//! - [`toolchain`] - External tool boundary
//! - [`config`] - Run settings

/// Compilation, archiving, linking and run orchestration.
pub mod build;

/// Run settings (`-build`, `-release`, `-install`, ...).
pub mod config;

/// Descriptor model and parser.
pub mod descriptor;

/// Fatal build errors.
pub mod error;

/// Compiler/archiver invocation.
pub mod toolchain;

/// Terminal UI utilities (tables, colors).
pub mod ui;
