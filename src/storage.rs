use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::PipelineError;

/// Writes `path` by filling a sibling temp file and renaming it over the target.
///
/// Readers observe either the previous file or the complete new one. On any
/// failure the temp file is removed and the previous file stays in place.
pub(crate) fn write_atomically<F>(path: &Path, fill: F) -> Result<(), PipelineError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), PipelineError>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| PipelineError::io(parent, err))?;
    }

    let staging = staging_path(path);
    let result = write_staged(&staging, fill)
        .and_then(|()| fs::rename(&staging, path).map_err(|err| PipelineError::io(path, err)));

    if result.is_err() {
        let _ = fs::remove_file(&staging);
    }
    result
}

fn write_staged<F>(staging: &Path, fill: F) -> Result<(), PipelineError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), PipelineError>,
{
    let file = File::create(staging).map_err(|err| PipelineError::io(staging, err))?;
    let mut writer = BufWriter::new(file);
    fill(&mut writer)?;
    writer
        .flush()
        .map_err(|err| PipelineError::io(staging, err))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|err| PipelineError::io(staging, err))
}

pub(crate) fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".tmp");
    path.with_file_name(name)
}
