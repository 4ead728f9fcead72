use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use liftmap_core::{AppError, AppResult};

/// Reads a UTF-8 file; a missing file maps to `NotFound`.
pub(crate) fn read_text(path: &Path, what: &str) -> AppResult<String> {
    fs::read_to_string(path).map_err(|error| match error.kind() {
        ErrorKind::NotFound => AppError::NotFound(format!("{what} '{}' does not exist", path.display())),
        _ => AppError::Io(format!("failed to read {what} '{}': {error}", path.display())),
    })
}

/// Writes a file through a sibling temporary file so readers never see a
/// partial write.
pub(crate) fn write_atomically(path: &Path, contents: &[u8], what: &str) -> AppResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|error| {
            AppError::Io(format!(
                "failed to create directory '{}' for {what}: {error}",
                parent.display()
            ))
        })?;
    }

    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = Path::new(&staging);

    fs::write(staging, contents).map_err(|error| {
        AppError::Io(format!("failed to write {what} '{}': {error}", staging.display()))
    })?;
    fs::rename(staging, path).map_err(|error| {
        AppError::Io(format!("failed to move {what} into '{}': {error}", path.display()))
    })
}
