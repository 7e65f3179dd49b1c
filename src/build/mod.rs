mod archive;
mod clean;
mod core;
mod feedback;
mod install;
mod link;
mod scheduler;
mod utils;

pub use archive::{archive_invocation, archive_library};
pub use clean::clean;
pub use self::core::{BuildOutcome, BuildState, BuildSummary, Orchestrator, build_project};
pub use feedback::FeedbackAnalyzer;
pub use install::install_binary;
pub use link::{binary_path, link_executable, link_invocation};
pub use scheduler::{CompileCommand, CompileReport, CompileScheduler};
