use crate::classfile::parse_class;
use crate::declaration::{ClassDeclaration, DeclarationSource};
use implgen_model::ImplError;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};
use zip::result::ZipError;
use zip::ZipArchive;

type OpenArchive = ZipArchive<BufReader<File>>;

/// Declarations read from class files on a class path made of directories,
/// jars and jmods. Entries are searched in order; the first hit wins.
///
/// Archives are opened once and kept open for the lifetime of the source.
#[derive(Default)]
pub struct ClasspathSource {
    entries: Vec<PathBuf>,
    archives: Mutex<HashMap<PathBuf, OpenArchive>>,
}

impl fmt::Debug for ClasspathSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClasspathSource")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl Clone for ClasspathSource {
    fn clone(&self) -> Self {
        Self::new(self.entries.clone())
    }
}

impl ClasspathSource {
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        Self {
            entries: entries.into_iter().collect(),
            archives: Mutex::default(),
        }
    }

    /// Build from raw strings, splitting entries on the platform path separator.
    pub fn from_raw(raw: &[String]) -> Self {
        Self::new(expand_classpath(raw))
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn add_entries<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.entries.extend(entries);
    }

    /// Append the modules of the JDK installed at `java_home` so `java.*`
    /// supertypes resolve.
    pub fn with_jdk_modules(mut self, java_home: &Path) -> Self {
        let modules = jdk_module_artifacts(java_home);
        debug!(
            java_home = %java_home.display(),
            artifacts = modules.len(),
            "adding JDK modules to class path"
        );
        self.entries.extend(modules);
        self
    }

    fn load_from_directory(
        &self,
        root: &Path,
        relative: &str,
    ) -> Result<Option<(Vec<u8>, PathBuf)>, ImplError> {
        let candidate = relative
            .split('/')
            .fold(root.to_path_buf(), |path, segment| path.join(segment));
        if !candidate.is_file() {
            return Ok(None);
        }
        let mut file = File::open(&candidate).map_err(|source| ImplError::io(&candidate, source))?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)
            .map_err(|source| ImplError::io(&candidate, source))?;
        Ok(Some((buffer, candidate)))
    }

    fn load_from_archive(
        &self,
        archive_path: &Path,
        relative: &str,
    ) -> Result<Option<(Vec<u8>, PathBuf)>, ImplError> {
        let mut archives = self.archives.lock().unwrap_or_else(PoisonError::into_inner);
        let archive = match archives.entry(archive_path.to_path_buf()) {
            Entry::Occupied(open) => open.into_mut(),
            Entry::Vacant(slot) => {
                let file =
                    File::open(archive_path).map_err(|source| ImplError::io(archive_path, source))?;
                let archive = ZipArchive::new(BufReader::new(file))
                    .map_err(|error| zip_failure(archive_path, error))?;
                debug!(
                    archive = %archive_path.display(),
                    entries = archive.len(),
                    "opened class path archive"
                );
                slot.insert(archive)
            }
        };

        // jmod files keep their classes under `classes/`.
        let jmod_name = format!("classes/{}", relative);
        for name in [relative, jmod_name.as_str()] {
            let mut entry = match archive.by_name(name) {
                Ok(entry) => entry,
                Err(ZipError::FileNotFound) => continue,
                Err(error) => return Err(zip_failure(archive_path, error)),
            };
            let mut buffer = Vec::new();
            entry
                .read_to_end(&mut buffer)
                .map_err(|source| ImplError::io(archive_path, source))?;
            return Ok(Some((buffer, archive_entry_path(archive_path, name))));
        }
        Ok(None)
    }
}

impl DeclarationSource for ClasspathSource {
    fn load(&self, binary_name: &str) -> Result<Option<ClassDeclaration>, ImplError> {
        let relative = format!("{}.class", binary_name.replace('.', "/"));

        for entry in &self.entries {
            if !entry.exists() {
                continue;
            }

            let found = if entry.is_dir() {
                self.load_from_directory(entry, &relative)?
            } else if is_archive(entry) {
                self.load_from_archive(entry, &relative)?
            } else {
                None
            };

            let Some((bytes, origin)) = found else {
                continue;
            };

            let declaration = parse_class(&bytes).map_err(|error| {
                ImplError::not_introspectable(
                    binary_name,
                    format!("{}: {}", origin.display(), error),
                )
            })?;

            if declaration.name != binary_name {
                warn!(
                    expected = binary_name,
                    found = %declaration.name,
                    origin = %origin.display(),
                    "class file declares a different type; skipping"
                );
                continue;
            }

            debug!(type_name = binary_name, origin = %origin.display(), "loaded class file");
            return Ok(Some(declaration.normalize()));
        }

        Ok(None)
    }
}

fn zip_failure(path: &Path, error: ZipError) -> ImplError {
    match error {
        ZipError::Io(source) => ImplError::io(path, source),
        other => ImplError::io(path, io::Error::new(io::ErrorKind::InvalidData, other)),
    }
}

/// `jmods/*.jmod` for JDK 9+, `jre/lib/rt.jar` for older layouts.
fn jdk_module_artifacts(java_home: &Path) -> Vec<PathBuf> {
    let mut artifacts = Vec::new();
    let jmods_dir = java_home.join("jmods");
    if let Ok(entries) = fs::read_dir(&jmods_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && is_archive(&path) {
                artifacts.push(path);
            }
        }
    }
    artifacts.sort();

    for legacy in [
        java_home.join("jre").join("lib").join("rt.jar"),
        java_home.join("lib").join("rt.jar"),
    ] {
        if legacy.is_file() {
            artifacts.push(legacy);
        }
    }
    artifacts
}

fn expand_classpath(raw: &[String]) -> Vec<PathBuf> {
    let separator = if cfg!(windows) { ';' } else { ':' };
    raw.iter()
        .flat_map(|entry| entry.split(separator))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| {
            ["jar", "zip", "jmod"]
                .iter()
                .any(|value| ext.eq_ignore_ascii_case(value))
        })
        .unwrap_or(false)
}

fn archive_entry_path(archive: &Path, entry: &str) -> PathBuf {
    PathBuf::from(format!("{}!/{}", archive.display(), entry))
}
