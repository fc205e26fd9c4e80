//! release - build, checksum and sign the unicodeit binaries for every platform

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use unicodeit_datagen::{ReleaseOptions, ReleaseOrchestrator, SystemRunner};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "release")]
#[command(about = "Stage signed unicodeit release binaries", long_about = None)]
struct Cli {
    /// Release version, used in the staged file names
    #[arg(long)]
    version: String,

    /// Staging directory (must not exist)
    #[arg(long, default_value = "staging")]
    out: PathBuf,

    /// Skip `cargo clean` before building
    #[arg(long)]
    no_clean: bool,

    /// Name of the binary produced by cargo
    #[arg(long, default_value = "unicodeit")]
    binary_name: String,

    /// Cargo target directory
    #[arg(long, default_value = "target")]
    target_dir: PathBuf,

    /// Target triple to build (repeatable; defaults to all supported platforms)
    #[arg(long = "platform")]
    platforms: Vec<String>,

    /// Quiet mode: only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

#[cfg(feature = "cli")]
impl Cli {
    fn options(&self) -> ReleaseOptions {
        let mut options = ReleaseOptions::new(self.version.clone())
            .with_out_dir(self.out.clone())
            .with_binary_name(self.binary_name.clone())
            .with_target_dir(self.target_dir.clone());
        if !self.platforms.is_empty() {
            options = options.with_platforms(self.platforms.iter().cloned());
        }
        if self.no_clean {
            options = options.without_clean();
        }
        options
    }
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    let level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    let mut orchestrator = ReleaseOrchestrator::new(cli.options(), SystemRunner);
    match orchestrator.run() {
        Ok(report) => {
            for artifact in &report.artifacts {
                eprintln!("✓ {}", artifact.binary.display());
                eprintln!("    sha256 {}", artifact.sha256);
            }
            eprintln!(
                "✓ {} binaries for {} staged in {}",
                report.artifacts.len(),
                report.version,
                report.out_dir.display()
            );
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    std::process::exit(1);
}
