//! Release staging: cross-compiled, checksummed and signed binaries

pub mod command;
pub mod orchestrator;

pub use command::{run_checked, CommandOutput, CommandRunner, CommandSpec, Step, SystemRunner};
pub use orchestrator::{
    binary_name, sha256_file, ReleaseOptions, ReleaseOrchestrator, ReleaseReport, StagedArtifact,
    SUPPORTED_PLATFORMS,
};
