use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PersistError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Directory a bare file name such as `submitted_urls.txt` lives in.
pub(crate) fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Replace `path` with one URL per line, through a temp file and rename.
pub fn write_url_list(path: &Path, urls: &[String]) -> Result<(), PersistError> {
    let dir = parent_dir(path);
    ensure_output_dir(&dir)?;

    let mut content = String::with_capacity(urls.iter().map(|url| url.len() + 1).sum());
    for url in urls {
        content.push_str(url);
        content.push('\n');
    }

    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| PersistError::io(&dir, e))?;
    tmp.write_all(content.as_bytes())
        .and_then(|()| tmp.flush())
        .and_then(|()| tmp.as_file_mut().sync_all())
        .map_err(|e| PersistError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| PersistError::io(path, e.error))?;
    Ok(())
}
