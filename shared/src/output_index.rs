//! Auto-numbered output files.
//!
//! Files are named `<prefix>_<N>.<ext>`. The next index is always derived
//! from the directory's current contents at write time, never from an
//! in-memory counter, so restarts and multiple simulator instances keep
//! numbering forward. Files are opened with `create_new`, so an existing
//! file is never overwritten; on a collision the directory is rescanned.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Give up after this many consecutive collisions.
const MAX_CREATE_ATTEMPTS: usize = 64;

/// Parse the index out of `<prefix>_<N>.<ext>`, if the name matches.
pub fn parse_index(file_name: &str, prefix: &str, extension: &str) -> Option<u32> {
    let stem = file_name.strip_suffix(extension)?.strip_suffix('.')?;
    let number = stem.strip_prefix(prefix)?.strip_prefix('_')?;
    number.parse().ok()
}

/// Next free index in `dir` for the given prefix and extension.
///
/// Returns 1 for a missing or empty directory, otherwise one past the largest
/// existing index. Names that do not match the pattern are ignored.
pub fn next_index(dir: &Path, prefix: &str, extension: &str) -> std::io::Result<u32> {
    if !dir.exists() {
        return Ok(1);
    }

    let mut next = 1;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if let Some(index) = entry
            .file_name()
            .to_str()
            .and_then(|name| parse_index(name, prefix, extension))
        {
            next = next.max(index.saturating_add(1));
        }
    }
    Ok(next)
}

/// Path for a given index.
pub fn indexed_path(dir: &Path, prefix: &str, index: u32, extension: &str) -> PathBuf {
    dir.join(format!("{prefix}_{index}.{extension}"))
}

/// Create the directory if needed and open a brand-new numbered file in it.
///
/// Returns the path together with the open (empty) file.
pub fn create_next_file(
    dir: &Path,
    prefix: &str,
    extension: &str,
) -> std::io::Result<(PathBuf, File)> {
    std::fs::create_dir_all(dir)?;

    for _ in 0..MAX_CREATE_ATTEMPTS {
        let index = next_index(dir, prefix, extension)?;
        let path = indexed_path(dir, prefix, index, extension);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                log::debug!("{} appeared concurrently, rescanning", path.display());
            }
            Err(e) => return Err(e),
        }
    }

    Err(std::io::Error::new(
        ErrorKind::AlreadyExists,
        format!(
            "could not allocate a new {prefix}_N.{extension} in {} after {MAX_CREATE_ATTEMPTS} attempts",
            dir.display()
        ),
    ))
}

/// Reserve the next numbered file and fill it with `write`.
///
/// If `write` fails the reserved file is removed again, so a failed write
/// leaves no partial output and does not consume the index.
pub fn write_next_file<E, F>(
    dir: &Path,
    prefix: &str,
    extension: &str,
    write: F,
) -> Result<PathBuf, E>
where
    E: From<std::io::Error>,
    F: FnOnce(&Path, File) -> Result<(), E>,
{
    let (path, file) = create_next_file(dir, prefix, extension)?;
    match write(&path, file) {
        Ok(()) => Ok(path),
        Err(e) => {
            if let Err(remove) = std::fs::remove_file(&path) {
                log::warn!("Could not remove partial output {}: {remove}", path.display());
            }
            Err(e)
        }
    }
}
