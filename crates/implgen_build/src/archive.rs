use implgen_model::ImplError;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Write an archive at `archive_path` holding `artifact` as its single
/// entry `entry_name`. Every failure is an `ArchiveFailure`.
pub fn write_single_entry_archive(
    archive_path: &Path,
    entry_name: &str,
    artifact: &Path,
) -> Result<(), ImplError> {
    let failure = |reason: String| ImplError::ArchiveFailure {
        path: archive_path.to_path_buf(),
        reason,
    };

    let parent = match archive_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|error| {
        failure(format!(
            "cannot create directory {}: {}",
            parent.display(),
            error
        ))
    })?;

    let mut input = File::open(artifact)
        .map(BufReader::new)
        .map_err(|error| failure(format!("cannot read {}: {}", artifact.display(), error)))?;

    // Staged beside the destination and renamed into place on success;
    // an early return drops and deletes it.
    let mut staged = tempfile::Builder::new()
        .prefix(".implgen-")
        .suffix(".part")
        .tempfile_in(parent)
        .map_err(|error| failure(error.to_string()))?;

    let bytes = {
        let mut writer = ZipWriter::new(staged.as_file_mut());
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        writer
            .start_file(entry_name, options)
            .map_err(|error| failure(format!("cannot add entry {}: {}", entry_name, error)))?;
        let bytes = io::copy(&mut input, &mut writer)
            .map_err(|error| failure(format!("cannot write entry {}: {}", entry_name, error)))?;
        writer
            .finish()
            .map_err(|error| failure(format!("cannot finish archive: {}", error)))?;
        bytes
    };

    staged
        .persist(archive_path)
        .map_err(|error| failure(error.error.to_string()))?;

    debug!(
        archive = %archive_path.display(),
        entry = entry_name,
        bytes,
        "wrote archive"
    );
    Ok(())
}
