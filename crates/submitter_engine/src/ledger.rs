use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use submitter_logging::submitter_info;

use crate::persist::{ensure_output_dir, parent_dir, PersistError};

/// Newline-delimited record of every URL the endpoint has accepted.
///
/// The file only ever grows. Lines may repeat across runs; readers treat it as a set.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file means no history yet.
    pub fn load(&self) -> Result<HashSet<String>, PersistError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                submitter_info!("No previous submission history found. This is the first run.");
                return Ok(HashSet::new());
            }
            Err(err) => return Err(PersistError::io(&self.path, err)),
        };

        let urls: HashSet<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        submitter_info!("Loaded {} previously submitted URLs", urls.len());
        Ok(urls)
    }

    pub fn append(&self, urls: &[String]) -> Result<(), PersistError> {
        ensure_output_dir(&parent_dir(&self.path))?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| PersistError::io(&self.path, e))?;
        let mut writer = BufWriter::new(file);
        for url in urls {
            writeln!(writer, "{url}").map_err(|e| PersistError::io(&self.path, e))?;
        }
        writer
            .flush()
            .map_err(|e| PersistError::io(&self.path, e))?;

        submitter_info!("Added {} URLs to submission history", urls.len());
        Ok(())
    }
}
