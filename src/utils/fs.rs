use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::errors::OctError;

pub fn file_exists<P>(path: P) -> bool
where
    P: AsRef<Path>,
{
    path.as_ref().exists()
}

/// Creates a uniquely named file `october-*{suffix}` under the system
/// temp directory with `content`. The file is removed when dropped.
pub fn temp_file_with_content(suffix: &str, content: &str) -> Result<NamedTempFile, OctError> {
    let mut file = tempfile::Builder::new()
        .prefix("october-")
        .suffix(suffix)
        .tempfile()
        .map_err(|err| OctError::FileError(err, "failed to create temp file".to_string()))?;

    file.write_all(content.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|err| {
            OctError::FileError(err, format!("failed to write temp file {}", file.path().display()))
        })?;

    Ok(file)
}
