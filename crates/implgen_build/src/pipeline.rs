use crate::archive::write_single_entry_archive;
use crate::compiler::JavaCompiler;
use implgen_codegen::{EmittedUnit, GeneratedUnit, Implementor};
use implgen_model::{ImplError, TypeDescriptor};
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{info, warn};

/// A packaged implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedUnit {
    pub archive_path: PathBuf,
    /// Name of the single archive entry, `/`-separated.
    pub entry_name: String,
    /// Binary name of the compiled class.
    pub qualified_name: String,
}

/// Emit, compile and archive an implementation in a private staging
/// directory that is removed afterwards.
pub struct ArchivePipeline<C> {
    implementor: Implementor,
    compiler: C,
    classpath: Vec<PathBuf>,
}

impl<C: JavaCompiler> ArchivePipeline<C> {
    pub fn new(implementor: Implementor, compiler: C) -> Self {
        Self {
            implementor,
            compiler,
            classpath: Vec::new(),
        }
    }

    /// Entries the compiler needs to resolve the implemented type.
    pub fn with_classpath<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.classpath.extend(entries);
        self
    }

    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    pub fn run(
        &self,
        descriptor: &TypeDescriptor,
        archive_path: &Path,
    ) -> Result<PackagedUnit, ImplError> {
        if archive_path.as_os_str().is_empty() {
            return Err(ImplError::invalid_argument("archive path must not be empty"));
        }
        // Eligibility and constructor problems surface before staging exists.
        let unit = self.implementor.generate(descriptor)?;

        let staging = tempfile::Builder::new()
            .prefix("implgen-")
            .tempdir()
            .map_err(|error| ImplError::io(env::temp_dir(), error))?;

        let result = self.build_in(&staging, &unit, descriptor, archive_path);

        let staging_path = staging.path().to_path_buf();
        if let Err(error) = staging.close() {
            warn!(
                path = %staging_path.display(),
                %error,
                "unable to delete staging directory"
            );
        }
        result
    }

    fn build_in(
        &self,
        staging: &TempDir,
        unit: &GeneratedUnit,
        descriptor: &TypeDescriptor,
        archive_path: &Path,
    ) -> Result<PackagedUnit, ImplError> {
        let emitted: EmittedUnit = self
            .implementor
            .emit(unit, &descriptor.name, staging.path())?;

        let status = self
            .compiler
            .compile(emitted.unit_path(), staging.path(), &self.classpath)?;
        if !status.is_success() {
            return Err(ImplError::CompileFailure {
                unit: emitted.unit_path().to_path_buf(),
                reason: format!(
                    "compiler exited with status {}: {}",
                    status.exit_code, status.diagnostics
                ),
            });
        }

        let artifact = staging.path().join(emitted.target.artifact_path());
        if !artifact.is_file() {
            return Err(ImplError::CompileFailure {
                unit: emitted.unit_path().to_path_buf(),
                reason: format!("compiled class not found at {}", artifact.display()),
            });
        }

        let entry_name = emitted.target.artifact_entry_name();
        write_single_entry_archive(archive_path, &entry_name, &artifact)?;
        info!(
            archive = %archive_path.display(),
            entry = %entry_name,
            "packaged implementation"
        );

        Ok(PackagedUnit {
            archive_path: archive_path.to_path_buf(),
            entry_name,
            qualified_name: emitted.qualified_name,
        })
    }
}
