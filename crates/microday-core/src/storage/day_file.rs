//! The day document on disk.
//!
//! Read once at startup, written back in full after every mutation. When
//! today's file does not exist yet the content may come from a fallback
//! document (a standing `todo.md`), but writes always go to today's file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::StorageError;
use crate::timeline::Timeline;

/// Result of looking for a document to start the day from.
#[derive(Debug)]
pub enum Loaded {
    /// A document was read, from `source`.
    Found { timeline: Timeline, source: PathBuf },
    /// Neither the day file nor any fallback exists.
    Missing,
}

/// Handle on the document a session writes to.
#[derive(Debug, Clone)]
pub struct DayFile {
    path: PathBuf,
}

impl DayFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the day file, or the first fallback that exists.
    ///
    /// # Errors
    /// Returns an error when a file exists but cannot be read.
    pub fn open<P: AsRef<Path>>(
        &self,
        fallbacks: &[P],
        today: NaiveDate,
    ) -> Result<Loaded, StorageError> {
        let candidates =
            std::iter::once(self.path.as_path()).chain(fallbacks.iter().map(|p| p.as_ref()));

        for candidate in candidates {
            match std::fs::read_to_string(candidate) {
                Ok(text) => {
                    info!(path = %candidate.display(), "loaded day document");
                    return Ok(Loaded::Found {
                        timeline: Timeline::parse(&text, today),
                        source: candidate.to_path_buf(),
                    });
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!(path = %candidate.display(), "document not found");
                }
                Err(source) => {
                    return Err(StorageError::ReadFailed {
                        path: candidate.to_path_buf(),
                        source,
                    })
                }
            }
        }

        Ok(Loaded::Missing)
    }

    /// Write the full timeline back.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self, timeline: &Timeline) -> Result<(), StorageError> {
        std::fs::write(&self.path, timeline.serialize()).map_err(|source| {
            StorageError::WriteFailed {
                path: self.path.clone(),
                source,
            }
        })?;
        debug!(path = %self.path.display(), "saved day document");
        Ok(())
    }
}
