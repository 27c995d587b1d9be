//! [`ItemStore`] implementation backed by a JSON file.
//!
//! The file holds the grid as a JSON array of items (see
//! [`TopSiteItem`]).  Entries written by older front ends carry no `"type"`
//! tag; they are read as websites.

use crate::grid::TopSiteItem;
use crate::traits::ItemStore;
use log::{error, info};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Errors produced by the JSON file store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shortcut list persisted to a single JSON file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Shortcuts a fresh install starts with.
pub fn sample_items() -> Vec<TopSiteItem> {
    [
        ("website-1", "Google", "https://google.com"),
        ("website-2", "GitHub", "https://github.com"),
        ("website-3", "YouTube", "https://youtube.com"),
        ("website-4", "Stack Overflow", "https://stackoverflow.com"),
    ]
    .into_iter()
    .map(|(id, title, url)| {
        let mut item = TopSiteItem::website(id, title);
        if let TopSiteItem::Website(w) = &mut item {
            w.url = Some(url.into());
        }
        item
    })
    .collect()
}

/// Decode a stored list, tagging untyped legacy entries as websites.
///
/// Anything that is not an array decodes to an empty list.
pub fn decode_items(text: &str) -> Result<Vec<TopSiteItem>, serde_json::Error> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(entries) = value else {
        return Ok(Vec::new());
    };
    entries
        .into_iter()
        .map(|mut entry| {
            if let Value::Object(map) = &mut entry {
                map.entry("type")
                    .or_insert_with(|| Value::String("website".into()));
            }
            serde_json::from_value(entry)
        })
        .collect()
}

impl ItemStore for JsonFileStore {
    type Error = StoreError;

    /// Read the list.
    ///
    /// A missing file is seeded with [`sample_items`]; a corrupt one is
    /// logged and treated as empty.
    fn load(&self) -> Result<Vec<TopSiteItem>, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("no item list at {}, seeding samples", self.path.display());
                let items = sample_items();
                self.save(&items)?;
                return Ok(items);
            }
            Err(e) => return Err(self.io_error(e)),
        };
        match decode_items(&text) {
            Ok(items) => Ok(items),
            Err(e) => {
                error!("error parsing item list {}: {}", self.path.display(), e);
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, items: &[TopSiteItem]) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(items)?;
        std::fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

//  Tests
