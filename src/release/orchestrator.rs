//! Staging of signed release binaries
//!
//! For every platform, in order: cross-compile, copy the binary into the
//! staging directory under a versioned name, record its SHA-256 in
//! `sha256sum` format and sign it with gpg. The first failure stops the run
//! and the staging directory is removed again.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use sha2::{Digest, Sha256};

use crate::release::command::{run_checked, CommandRunner, CommandSpec, Step};
use crate::utils::error::{GenError, GenResult};

/// Targets a release is built for
pub const SUPPORTED_PLATFORMS: &[&str] = &[
    "x86_64-apple-darwin",
    "aarch64-apple-darwin",
    "x86_64-unknown-linux-musl",
    "aarch64-unknown-linux-musl",
];

/// `<name>-<version>-<platform>`
pub fn binary_name(name: &str, version: &str, platform: &str) -> String {
    format!("{}-{}-{}", name, version, platform)
}

/// Options for a release run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOptions {
    /// Staging directory; must not exist yet
    pub out_dir: PathBuf,
    /// Version used in staged file names
    pub version: String,
    /// Run `cargo clean` first
    pub clean: bool,
    /// Name of the binary cargo produces
    pub binary_name: String,
    /// Toolchain selector passed to cargo
    pub toolchain: String,
    /// Cargo target directory
    pub target_dir: PathBuf,
    pub platforms: Vec<String>,
}

impl ReleaseOptions {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            out_dir: PathBuf::from("staging"),
            version: version.into(),
            clean: true,
            binary_name: "unicodeit".to_string(),
            toolchain: "+stable".to_string(),
            target_dir: PathBuf::from("target"),
            platforms: SUPPORTED_PLATFORMS.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = dir.into();
        self
    }

    pub fn with_target_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.target_dir = dir.into();
        self
    }

    pub fn with_binary_name(mut self, name: impl Into<String>) -> Self {
        self.binary_name = name.into();
        self
    }

    pub fn with_platforms<I, S>(mut self, platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.platforms = platforms.into_iter().map(Into::into).collect();
        self
    }

    pub fn without_clean(mut self) -> Self {
        self.clean = false;
        self
    }

    /// Where cargo leaves the binary for `platform`
    pub fn built_binary(&self, platform: &str) -> PathBuf {
        self.target_dir
            .join(platform)
            .join("release")
            .join(&self.binary_name)
    }

    /// Where the binary for `platform` is staged
    pub fn staged_binary(&self, platform: &str) -> PathBuf {
        self.out_dir
            .join(binary_name(&self.binary_name, &self.version, platform))
    }

    pub fn clean_command(&self) -> CommandSpec {
        CommandSpec::new(Step::Clean, "cargo").args([self.toolchain.as_str(), "clean"])
    }

    pub fn build_command(&self, platform: &str) -> CommandSpec {
        CommandSpec::new(Step::Build, "cargo")
            .args([
                self.toolchain.as_str(),
                "zigbuild",
                "--target",
                platform,
                "--workspace",
                "--release",
            ])
            .for_platform(platform)
    }

    pub fn sign_command(&self, platform: &str, file_name: &str) -> CommandSpec {
        CommandSpec::new(Step::Sign, "gpg")
            .args(["--armor", "--detach-sign", file_name])
            .current_dir(&self.out_dir)
            .for_platform(platform)
            .captured()
    }
}

/// One platform's staged files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedArtifact {
    pub platform: String,
    pub binary: PathBuf,
    /// `<binary>.sha256sum`
    pub checksum: PathBuf,
    /// `<binary>.asc`
    pub signature: PathBuf,
    /// Lowercase hex digest of the binary
    pub sha256: String,
}

/// Result of a completed release run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseReport {
    pub out_dir: PathBuf,
    pub version: String,
    pub artifacts: Vec<StagedArtifact>,
}

/// `path` with `.ext` appended to the full file name
fn with_suffix(path: &Path, ext: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// SHA-256 of a file as lowercase hex.
pub fn sha256_file(path: &Path) -> GenResult<String> {
    let context = || format!("hashing {}", path.display());
    let mut file = fs::File::open(path).map_err(|e| GenError::io(context(), e))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| GenError::io(context(), e))?;
    Ok(hex::encode(hasher.finalize()))
}

/// One line in `sha256sum` output format
pub fn sha256sum_line(digest: &str, path: &Path) -> String {
    format!("{}  {}\n", digest, path.display())
}

/// Drives a release run through a [`CommandRunner`]
pub struct ReleaseOrchestrator<R: CommandRunner> {
    options: ReleaseOptions,
    runner: R,
}

impl<R: CommandRunner> ReleaseOrchestrator<R> {
    pub fn new(options: ReleaseOptions, runner: R) -> Self {
        Self { options, runner }
    }

    pub fn options(&self) -> &ReleaseOptions {
        &self.options
    }

    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Build, stage, hash and sign every configured platform.
    pub fn run(&mut self) -> GenResult<ReleaseReport> {
        let out_dir = self.options.out_dir.clone();
        if out_dir.exists() {
            return Err(GenError::precondition(format!(
                "staging directory {} already exists",
                out_dir.display()
            )));
        }
        if self.options.platforms.is_empty() {
            return Err(GenError::precondition("no platforms selected"));
        }

        if self.options.clean {
            info!("cleaning previous build artifacts");
            let spec = self.options.clean_command();
            run_checked(&mut self.runner, &spec)?;
        }

        fs::create_dir_all(out_dir.parent().unwrap_or(Path::new(".")))
            .and_then(|_| fs::create_dir(&out_dir))
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => GenError::precondition(format!(
                    "staging directory {} already exists",
                    out_dir.display()
                )),
                _ => GenError::io(format!("creating {}", out_dir.display()), e),
            })?;

        let platforms = self.options.platforms.clone();
        let mut artifacts = Vec::with_capacity(platforms.len());
        for (index, platform) in platforms.iter().enumerate() {
            info!("[{}/{}] {}", index + 1, platforms.len(), platform);
            match self.stage_platform(platform) {
                Ok(artifact) => artifacts.push(artifact),
                Err(e) => {
                    error!("release aborted at {}: {}", platform, e);
                    if let Err(cleanup) = fs::remove_dir_all(&out_dir) {
                        warn!("could not remove {}: {}", out_dir.display(), cleanup);
                    }
                    return Err(e);
                }
            }
        }

        info!("staged {} artifacts in {}", artifacts.len(), out_dir.display());
        Ok(ReleaseReport {
            out_dir,
            version: self.options.version.clone(),
            artifacts,
        })
    }

    fn stage_platform(&mut self, platform: &str) -> GenResult<StagedArtifact> {
        let spec = self.options.build_command(platform);
        run_checked(&mut self.runner, &spec)?;

        let built = self.options.built_binary(platform);
        if !built.is_file() {
            return Err(GenError::MissingArtifact {
                platform: platform.to_string(),
                path: built,
            });
        }

        let staged = self.options.staged_binary(platform);
        fs::copy(&built, &staged).map_err(|e| {
            GenError::io(format!("copying {} to {}", built.display(), staged.display()), e)
        })?;

        let sha256 = sha256_file(&staged)?;
        let checksum = with_suffix(&staged, "sha256sum");
        fs::write(&checksum, sha256sum_line(&sha256, &staged))
            .map_err(|e| GenError::io(format!("writing {}", checksum.display()), e))?;

        let file_name = binary_name(&self.options.binary_name, &self.options.version, platform);
        let spec = self.options.sign_command(platform, &file_name);
        run_checked(&mut self.runner, &spec)?;

        let signature = with_suffix(&staged, "asc");
        if !signature.is_file() {
            return Err(GenError::MissingArtifact {
                platform: platform.to_string(),
                path: signature,
            });
        }

        Ok(StagedArtifact {
            platform: platform.to_string(),
            binary: staged,
            checksum,
            signature,
            sha256,
        })
    }
}
