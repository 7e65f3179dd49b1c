//! End-to-end pipeline tests with a recording tool runner.
//!
//! No real compiler is involved: the fake runner records every invocation,
//! creates the file named after `-o` (or the archive), and fails on request.

use diddy::build::{BuildOutcome, BuildState, Orchestrator};
use diddy::config::BuildSettings;
use diddy::descriptor::parse_descriptor;
use diddy::error::BuildError;
use diddy::toolchain::{Invocation, ToolOutput, ToolRunner, Toolchain};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Default)]
struct FakeTools {
    calls: Mutex<Vec<Invocation>>,
    fail_sources: Vec<String>,
    fail_programs: Vec<String>,
}

impl FakeTools {
    fn failing_sources(sources: &[&str]) -> Self {
        Self {
            fail_sources: sources.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn failing_program(program: &str) -> Self {
        Self {
            fail_programs: vec![program.to_string()],
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }
}

fn is_compile(inv: &Invocation) -> bool {
    inv.program == "cc" && inv.args.first().map(String::as_str) == Some("-c")
}

fn is_link(inv: &Invocation) -> bool {
    inv.program == "cc" && inv.args.first().map(String::as_str) == Some("-o")
}

impl ToolRunner for FakeTools {
    fn run(&self, inv: &Invocation) -> io::Result<ToolOutput> {
        self.calls.lock().unwrap().push(inv.clone());

        let failed = self.fail_programs.contains(&inv.program)
            || (is_compile(inv) && self.fail_sources.contains(&inv.args[1]));
        if failed {
            return Ok(ToolOutput {
                code: Some(1),
                stderr: "error: simulated failure".to_string(),
            });
        }

        let produced = if inv.program == "ar" {
            inv.args.get(1)
        } else {
            inv.args
                .iter()
                .position(|a| a == "-o")
                .and_then(|i| inv.args.get(i + 1))
        };
        if let Some(path) = produced {
            fs::write(path, b"artifact")?;
        }
        Ok(ToolOutput {
            code: Some(0),
            stderr: String::new(),
        })
    }
}

fn toolchain() -> Toolchain {
    Toolchain {
        cc: "cc".to_string(),
        ar: "ar".to_string(),
    }
}

fn settings(root: &Path) -> BuildSettings {
    BuildSettings {
        build_dir: root.join("build"),
        descriptor: root.join("diddy"),
        ..Default::default()
    }
}

fn s(p: &Path) -> String {
    p.to_string_lossy().to_string()
}

const APP_ONLY: &str = "[project]\nname = demo\n\n[executable]\nname = app\nfiles = a.c b.c\n";

const WITH_LIBRARIES: &str = r#"
[project]
name = layered
version = 2.0.0

[library]
name = core
files = core/mem.c core/log.c

[library]
name = util
files = util/str.c

[executable]
name = app
files = main.c
"#;

#[test]
fn test_scenario_a_compile_then_link() {
    let tmp = tempfile::tempdir().unwrap();
    let tools = FakeTools::default();
    let settings = settings(tmp.path());
    let build = settings.build_dir.clone();

    let mut orch = Orchestrator::new(settings, toolchain(), &tools);
    let summary = orch.build(parse_descriptor(APP_ONLY)).unwrap();

    let calls = tools.calls();
    assert_eq!(calls.len(), 3);
    let mut compiled: Vec<(String, String)> = calls[..2]
        .iter()
        .map(|c| {
            assert!(is_compile(c));
            (c.args[1].clone(), c.args[3].clone())
        })
        .collect();
    compiled.sort();
    assert_eq!(
        compiled,
        vec![
            ("a.c".to_string(), s(&build.join("a.o"))),
            ("b.c".to_string(), s(&build.join("b.o")))
        ]
    );

    assert!(is_link(&calls[2]));
    assert_eq!(
        calls[2].args,
        vec![
            "-o".to_string(),
            s(&build.join("app")),
            s(&build.join("a.o")),
            s(&build.join("b.o"))
        ]
    );
    assert_eq!(summary.binaries, vec![build.join("app")]);
    assert_eq!(summary.compiled, 2);
    assert_eq!(orch.state(), BuildState::Done);
}

#[test]
fn test_scenario_b_failed_compile_skips_link() {
    let tmp = tempfile::tempdir().unwrap();
    let tools = FakeTools::failing_sources(&["b.c"]);

    let mut orch = Orchestrator::new(settings(tmp.path()), toolchain(), &tools);
    let err = orch.build(parse_descriptor(APP_ONLY)).unwrap_err();

    match err {
        BuildError::CompileFailure { target, failed } => {
            assert_eq!(target, "app");
            assert_eq!(failed.len(), 1);
            assert_eq!(failed[0].0, PathBuf::from("b.c"));
        }
        other => panic!("unexpected error: {}", other),
    }
    let calls = tools.calls();
    assert_eq!(calls.len(), 2, "both compiles run, nothing else");
    assert!(calls.iter().all(is_compile));
    assert_eq!(orch.state(), BuildState::Aborted);
}

#[test]
fn test_libraries_archive_before_any_executable_links() {
    let tmp = tempfile::tempdir().unwrap();
    let tools = FakeTools::default();
    let settings = settings(tmp.path());
    let build = settings.build_dir.clone();

    let mut orch = Orchestrator::new(settings, toolchain(), &tools);
    let summary = orch.build(parse_descriptor(WITH_LIBRARIES)).unwrap();

    let calls = tools.calls();
    let programs: Vec<&str> = calls
        .iter()
        .map(|c| {
            if is_compile(c) {
                "compile"
            } else if is_link(c) {
                "link"
            } else {
                "archive"
            }
        })
        .collect();
    assert_eq!(
        programs,
        vec!["compile", "compile", "archive", "compile", "archive", "compile", "link"]
    );

    // core archive holds its objects in declared order
    assert_eq!(
        calls[2].args,
        vec![
            "rcs".to_string(),
            s(&build.join("core.a")),
            s(&build.join("mem.o")),
            s(&build.join("log.o"))
        ]
    );

    // link: own objects, then every archive in library order
    assert_eq!(
        calls[6].args[2..].to_vec(),
        vec![
            s(&build.join("main.o")),
            s(&build.join("core.a")),
            s(&build.join("util.a"))
        ]
    );
    assert_eq!(
        summary.archives,
        vec![build.join("core.a"), build.join("util.a")]
    );
    assert_eq!(summary.project.name, "layered");
    assert_eq!(
        orch.history(),
        &[
            BuildState::Init,
            BuildState::BuildLibraries,
            BuildState::BuildExecutables,
            BuildState::Done
        ]
    );
}

#[test]
fn test_library_compile_failure_stops_before_archive() {
    let tmp = tempfile::tempdir().unwrap();
    let tools = FakeTools::failing_sources(&["core/log.c"]);

    let mut orch = Orchestrator::new(settings(tmp.path()), toolchain(), &tools);
    let err = orch.build(parse_descriptor(WITH_LIBRARIES)).unwrap_err();

    assert!(matches!(err, BuildError::CompileFailure { ref target, .. } if target == "core"));
    assert!(tools.calls().iter().all(is_compile));
    assert_eq!(tools.calls().len(), 2);
}

#[test]
fn test_archive_failure_aborts_before_executables() {
    let tmp = tempfile::tempdir().unwrap();
    let tools = FakeTools::failing_program("ar");

    let mut orch = Orchestrator::new(settings(tmp.path()), toolchain(), &tools);
    let err = orch.build(parse_descriptor(WITH_LIBRARIES)).unwrap_err();

    assert!(matches!(err, BuildError::ArchiveFailure { ref library, .. } if library == "core"));
    assert_eq!(tools.calls().len(), 3);
    assert_eq!(orch.state(), BuildState::Aborted);
}

/// Passes everything through except links, which fail like a missing `main`.
struct FailLink(FakeTools);

impl ToolRunner for FailLink {
    fn run(&self, inv: &Invocation) -> io::Result<ToolOutput> {
        if is_link(inv) {
            return Ok(ToolOutput {
                code: Some(1),
                stderr: "undefined reference to `main'".to_string(),
            });
        }
        self.0.run(inv)
    }
}

#[test]
fn test_link_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let runner = FailLink(FakeTools::default());

    let mut orch = Orchestrator::new(settings(tmp.path()), toolchain(), &runner);
    let err = orch.build(parse_descriptor(APP_ONLY)).unwrap_err();

    assert!(matches!(err, BuildError::LinkFailure { ref executable, .. } if executable == "app"));
    assert_eq!(orch.state(), BuildState::Aborted);
}

#[test]
fn test_scenario_d_install_copies_binary() {
    let tmp = tempfile::tempdir().unwrap();
    let tools = FakeTools::default();
    let dest = tmp.path().join("dest");
    let settings = BuildSettings {
        install: Some(dest.clone()),
        ..settings(tmp.path())
    };

    let mut orch = Orchestrator::new(settings, toolchain(), &tools);
    let summary = orch.build(parse_descriptor(APP_ONLY)).unwrap();

    assert_eq!(summary.installed, vec![dest.join("app")]);
    assert!(dest.join("app").exists());
    assert!(orch.history().contains(&BuildState::Install));
}

#[test]
fn test_install_copy_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let blocker = tmp.path().join("not-a-dir");
    fs::write(&blocker, b"file").unwrap();
    let tools = FakeTools::default();
    let settings = BuildSettings {
        install: Some(blocker),
        ..settings(tmp.path())
    };

    let mut orch = Orchestrator::new(settings, toolchain(), &tools);
    let err = orch.build(parse_descriptor(APP_ONLY)).unwrap_err();
    assert!(matches!(err, BuildError::InstallCopyFailure { .. }));
}

#[test]
fn test_output_override_names_binary() {
    let tmp = tempfile::tempdir().unwrap();
    let tools = FakeTools::default();
    let settings = BuildSettings {
        output: Some("renamed".to_string()),
        ..settings(tmp.path())
    };
    let build = settings.build_dir.clone();

    let mut orch = Orchestrator::new(settings, toolchain(), &tools);
    let summary = orch.build(parse_descriptor(APP_ONLY)).unwrap();
    assert_eq!(
        summary.binaries,
        vec![Toolchain::binary_path(&build, "renamed")]
    );
}

#[test]
fn test_run_parses_descriptor_file() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("diddy"), APP_ONLY).unwrap();
    let tools = FakeTools::default();

    let mut orch = Orchestrator::new(settings(tmp.path()), toolchain(), &tools);
    let outcome = orch.run().unwrap();

    let BuildOutcome::Built(summary) = outcome else {
        panic!("expected a build");
    };
    assert_eq!(summary.project.name, "demo");
    assert_eq!(summary.project.version, "0.0.0");
    assert_eq!(
        orch.history(),
        &[
            BuildState::Init,
            BuildState::ParseDescriptor,
            BuildState::BuildLibraries,
            BuildState::BuildExecutables,
            BuildState::Done
        ]
    );

    let json = fs::read_to_string(tmp.path().join("build").join("compile_commands.json")).unwrap();
    let entries: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 2);
    assert_eq!(entries[0]["file"], "a.c");
}

#[test]
fn test_missing_descriptor_aborts() {
    let tmp = tempfile::tempdir().unwrap();
    let tools = FakeTools::default();

    let mut orch = Orchestrator::new(settings(tmp.path()), toolchain(), &tools);
    let err = orch.run().unwrap_err();

    assert!(matches!(err, BuildError::ConfigNotFound { .. }));
    assert!(tools.calls().is_empty());
    assert_eq!(
        orch.history(),
        &[
            BuildState::Init,
            BuildState::ParseDescriptor,
            BuildState::Aborted
        ]
    );
}

#[test]
fn test_clean_skips_descriptor() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("stale.o"), b"old").unwrap();
    let tools = FakeTools::default();
    let settings = BuildSettings {
        clean: true,
        build_dir: out.clone(),
        descriptor: tmp.path().join("does-not-exist"),
        ..Default::default()
    };

    let mut orch = Orchestrator::new(settings, toolchain(), &tools);
    let outcome = orch.run().unwrap();

    assert!(matches!(outcome, BuildOutcome::Cleaned { removed: true, .. }));
    assert!(!out.exists());
    assert!(tools.calls().is_empty());
    assert_eq!(orch.history(), &[BuildState::Init, BuildState::Clean]);
}

#[test]
fn test_batches_respect_pool_width() {
    let tmp = tempfile::tempdir().unwrap();
    let tools = FakeTools::default();
    let files: Vec<String> = (0..20).map(|i| format!("f{}.c", i)).collect();
    let text = format!("[executable]\nname = big\nfiles = {}\n", files.join(" "));
    let settings = BuildSettings {
        jobs: 3,
        ..settings(tmp.path())
    };

    let mut orch = Orchestrator::new(settings, toolchain(), &tools);
    let summary = orch.build(parse_descriptor(&text)).unwrap();
    assert_eq!(summary.compiled, 20);
    assert_eq!(tools.calls().iter().filter(|c| is_compile(c)).count(), 20);
}

#[test]
fn test_same_stem_sources_share_one_object() {
    let tmp = tempfile::tempdir().unwrap();
    let tools = FakeTools::default();
    let settings = settings(tmp.path());
    let build = settings.build_dir.clone();
    let text = "[library]\nname = l\nfiles = x/u.c y/u.c\n";

    let mut orch = Orchestrator::new(settings, toolchain(), &tools);
    orch.build(parse_descriptor(text)).unwrap();

    let calls = tools.calls();
    let archive = calls.iter().find(|c| c.program == "ar").unwrap();
    assert_eq!(
        archive.args,
        vec![
            "rcs".to_string(),
            s(&build.join("l.a")),
            s(&build.join("u.o")),
            s(&build.join("u.o"))
        ]
    );
}

#[test]
fn test_output_override_shared_by_every_executable() {
    let tmp = tempfile::tempdir().unwrap();
    let tools = FakeTools::default();
    let settings = BuildSettings {
        output: Some("tool".to_string()),
        ..settings(tmp.path())
    };
    let expected = s(&Toolchain::binary_path(&settings.build_dir, "tool"));
    let text = "[executable]\nname = first\nfiles = a.c\n\n[executable]\nname = second\nfiles = b.c\n";

    let mut orch = Orchestrator::new(settings, toolchain(), &tools);
    let summary = orch.build(parse_descriptor(text)).unwrap();

    let targets: Vec<String> = tools
        .calls()
        .iter()
        .filter(|c| is_link(c))
        .map(|c| c.args[1].clone())
        .collect();
    assert_eq!(targets, vec![expected.clone(), expected]);
    assert_eq!(summary.binaries.len(), 2);
    assert_eq!(summary.binaries[0], summary.binaries[1]);
    assert_eq!(orch.state(), BuildState::Done);
}
