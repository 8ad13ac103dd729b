use crate::config::BuildConfig;
use crate::jdk::discover_jdk;
use implgen_model::ImplError;
use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Outcome of one compiler run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileStatus {
    pub exit_code: i32,
    /// Captured diagnostics (stderr).
    pub diagnostics: String,
}

impl CompileStatus {
    pub fn success() -> Self {
        Self {
            exit_code: 0,
            diagnostics: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Compiles one source unit into `out_dir`.
///
/// `Err` means the compiler could not be run at all; a compiler that ran
/// and rejected the unit reports a non-zero `exit_code`.
pub trait JavaCompiler {
    fn compile(
        &self,
        unit: &Path,
        out_dir: &Path,
        classpath: &[PathBuf],
    ) -> Result<CompileStatus, ImplError>;
}

/// The JDK's `javac`.
#[derive(Debug, Clone, Default)]
pub struct Javac {
    config: BuildConfig,
}

impl Javac {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }
}

impl JavaCompiler for Javac {
    fn compile(
        &self,
        unit: &Path,
        out_dir: &Path,
        classpath: &[PathBuf],
    ) -> Result<CompileStatus, ImplError> {
        let failure = |reason: String| ImplError::CompileFailure {
            unit: unit.to_path_buf(),
            reason,
        };

        let jdk = discover_jdk(self.config.javac.as_deref())
            .map_err(|error| failure(error.to_string()))?;
        if let Some(release) = self.config.release {
            jdk.ensure_release(release)
                .map_err(|error| failure(error.to_string()))?;
        }

        let mut cmd = Command::new(&jdk.javac_path);
        cmd.args(&self.config.compiler_options);
        if let Some(release) = self.config.release {
            cmd.arg("--release").arg(release.to_string());
        }
        cmd.arg("-d").arg(out_dir);

        let entries: Vec<&PathBuf> = self.config.classpath.iter().chain(classpath).collect();
        if !entries.is_empty() {
            let joined = env::join_paths(entries)
                .map_err(|error| failure(format!("invalid class path: {}", error)))?;
            cmd.arg("-cp").arg(joined);
        }
        cmd.arg(unit);

        debug!(command = ?cmd, "running javac");
        let output = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|error| {
                failure(format!(
                    "failed to run '{}': {}",
                    jdk.javac_path.display(),
                    error
                ))
            })?;

        let mut diagnostics = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if diagnostics.is_empty() {
            diagnostics = String::from_utf8_lossy(&output.stdout).trim().to_string();
        }

        Ok(CompileStatus {
            // Killed by a signal: no code, still a failure.
            exit_code: output.status.code().unwrap_or(-1),
            diagnostics,
        })
    }
}
