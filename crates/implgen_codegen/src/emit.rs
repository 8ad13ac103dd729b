use crate::config::CodeGenConfig;
use implgen_model::{ImplError, TypeName};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where a generated unit lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmissionTarget {
    root: PathBuf,
    package_dir: PathBuf,
    unit_path: PathBuf,
    artifact_path: PathBuf,
}

impl EmissionTarget {
    /// `<root>/<package path>/<Name><suffix>.<ext>`; the compiled artifact is
    /// `<package path>/<Name><suffix>.class` relative to a class output root.
    pub fn resolve(root: &Path, target: &TypeName, config: &CodeGenConfig) -> Self {
        let class_name = config.class_name(target.simple_name());
        let package_path = target.package_path();
        let package_dir = root.join(&package_path);
        Self {
            root: root.to_path_buf(),
            unit_path: package_dir.join(format!("{}.{}", class_name, config.extension)),
            artifact_path: package_path.join(format!("{}.class", class_name)),
            package_dir,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn package_dir(&self) -> &Path {
        &self.package_dir
    }

    pub fn unit_path(&self) -> &Path {
        &self.unit_path
    }

    /// Relative path of the compiled class under an output root.
    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    /// Archive entry name of the compiled class; always `/`-separated.
    pub fn artifact_entry_name(&self) -> String {
        self.artifact_path
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Result of emitting a unit, handed to the archive step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedUnit {
    pub target: EmissionTarget,
    /// Simple name of the generated class.
    pub class_name: String,
    /// Binary name of the generated class.
    pub qualified_name: String,
}

impl EmittedUnit {
    pub fn unit_path(&self) -> &Path {
        self.target.unit_path()
    }
}

/// Write `source` to the target's unit path, creating package directories.
pub fn write_unit(target: &EmissionTarget, source: &str) -> Result<(), ImplError> {
    create_package_dir(target.package_dir())?;

    let path = target.unit_path();
    let file = File::create(path).map_err(|source| ImplError::io(path, source))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(source.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|source| ImplError::io(path, source))?;

    debug!(path = %path.display(), bytes = source.len(), "wrote generated unit");
    Ok(())
}

fn create_package_dir(dir: &Path) -> Result<(), ImplError> {
    if let Some(conflict) = non_directory_ancestor(dir) {
        return Err(ImplError::PathConflict { path: conflict });
    }
    fs::create_dir_all(dir).map_err(|source| ImplError::io(dir, source))
}

/// The first existing path on the way to `dir` that is not a directory.
fn non_directory_ancestor(dir: &Path) -> Option<PathBuf> {
    let mut ancestors: Vec<&Path> = dir.ancestors().collect();
    ancestors.reverse();
    ancestors
        .into_iter()
        .filter(|path| !path.as_os_str().is_empty())
        .find(|path| path.exists() && !path.is_dir())
        .map(Path::to_path_buf)
}
