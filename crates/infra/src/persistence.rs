//! File-backed persistence for the warehouse.
//!
//! The whole collection is read on startup and written back on demand and on
//! exit. A missing file means "start empty". Loading decodes the complete file
//! before touching the warehouse, so a failed read leaves memory as it was.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use stockroom_inventory::Warehouse;
use stockroom_products::Product;

use crate::codec::{self, SkippedLine};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What a load found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No file at the path; the warehouse was reset to empty.
    Missing,
    /// The file was decoded and installed.
    Loaded {
        loaded: usize,
        skipped: Vec<SkippedLine>,
    },
}

/// The product data file at a fixed path.
#[derive(Debug, Clone)]
pub struct ProductFile {
    path: PathBuf,
}

impl ProductFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the warehouse contents with what the file holds.
    ///
    /// Malformed lines are skipped and returned in the outcome. Bytes that are
    /// not UTF-8 are replaced rather than failing the whole load, so such a line
    /// just ends up skipped or with a mangled name.
    pub fn load_into(&self, warehouse: &Warehouse) -> Result<LoadOutcome, PersistenceError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "data file not found, starting empty");
                warehouse.replace_all(Vec::new(), stockroom_core::ProductId::FIRST);
                return Ok(LoadOutcome::Missing);
            }
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let text = String::from_utf8_lossy(&bytes);
        let decoded = codec::deserialize(&text);
        for skipped in &decoded.skipped {
            warn!(
                path = %self.path.display(),
                line = skipped.line_number,
                reason = %skipped.reason,
                "skipping malformed line"
            );
        }

        let loaded = decoded.products.len();
        let next_id = decoded.next_id();
        warehouse.replace_all(decoded.products, next_id);
        info!(
            path = %self.path.display(),
            loaded,
            skipped = decoded.skipped.len(),
            "data file loaded"
        );

        Ok(LoadOutcome::Loaded {
            loaded,
            skipped: decoded.skipped,
        })
    }

    /// Write `products` in order, overwriting the file.
    pub fn save(&self, products: &[Product]) -> Result<(), PersistenceError> {
        fs::write(&self.path, codec::serialize(products)).map_err(|source| {
            PersistenceError::Write {
                path: self.path.clone(),
                source,
            }
        })?;
        info!(path = %self.path.display(), count = products.len(), "data file saved");
        Ok(())
    }

    /// Write a snapshot of the warehouse. Returns the number of products saved.
    pub fn save_from(&self, warehouse: &Warehouse) -> Result<usize, PersistenceError> {
        let snapshot = warehouse.list_all();
        self.save(&snapshot)?;
        Ok(snapshot.len())
    }
}
