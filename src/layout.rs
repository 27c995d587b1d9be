//! [`TileRegistry`] backed by a layout snapshot pushed by the front end.
//!
//! The rendering layer reports where every tile currently sits by sending a
//! [`Command::Layout`](crate::command::Command::Layout) whenever the grid
//! reflows.  The latest snapshot is what the coordinator scans.

use crate::geometry::Rect;
use crate::traits::{Tile, TileRegistry};
use serde::{Deserialize, Serialize};

/// One rendered tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRect {
    pub id: String,
    pub rect: Rect,
}

impl TileRect {
    pub fn new(id: impl Into<String>, rect: Rect) -> Self {
        Self {
            id: id.into(),
            rect,
        }
    }
}

/// All rendered tiles, split by category, in rendering order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileLayout {
    #[serde(default)]
    pub folders: Vec<TileRect>,
    #[serde(default)]
    pub websites: Vec<TileRect>,
}

impl TileLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper to append a folder tile.
    pub fn with_folder(mut self, id: impl Into<String>, rect: Rect) -> Self {
        self.folders.push(TileRect::new(id, rect));
        self
    }

    /// Builder-style helper to append a website tile.
    pub fn with_website(mut self, id: impl Into<String>, rect: Rect) -> Self {
        self.websites.push(TileRect::new(id, rect));
        self
    }

    pub fn len(&self) -> usize {
        self.folders.len() + self.websites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.websites.is_empty()
    }
}

fn as_tiles(tiles: &[TileRect]) -> Vec<Tile> {
    tiles.iter().map(|t| (t.id.clone(), t.rect)).collect()
}

impl TileRegistry for TileLayout {
    fn folder_tiles(&self) -> Vec<Tile> {
        as_tiles(&self.folders)
    }

    fn website_tiles(&self) -> Vec<Tile> {
        as_tiles(&self.websites)
    }
}
