//! Core traits that decouple the drag-intent engine from any specific
//! rendering layer, time source, storage, or transport.
//!
//! The [`DropZoneCoordinator`](crate::dropzone::DropZoneCoordinator) only
//! depends on [`Clock`] and [`TileRegistry`]; the
//! [`GridController`](crate::controller::GridController) additionally talks
//! to an [`ItemStore`].  Commands reach the daemon through a
//! [`CommandSource`].

use crate::command::Command;
use crate::geometry::Rect;
use crate::grid::TopSiteItem;
use std::sync::mpsc;

/// A monotonic millisecond time source.
///
/// Dwell and grace deadlines are expressed against this clock, which lets
/// tests replace wall-clock time with a [`ManualClock`](crate::clock::ManualClock).
pub trait Clock {
    /// Milliseconds elapsed since an arbitrary, fixed origin.
    fn now_ms(&self) -> u64;
}

/// A rendered tile as seen by the engine: its item id and bounding box.
pub type Tile = (String, Rect);

/// Read-only view of the tiles currently rendered on screen.
///
/// Both methods return tiles in rendering order; the coordinator scans
/// them front to back and the first inner-zone hit wins.  Rects must be
/// current: implementations are queried on every pointer move and should
/// not hand out stale geometry.
pub trait TileRegistry {
    /// Every rendered folder tile.
    fn folder_tiles(&self) -> Vec<Tile>;

    /// Every rendered plain website tile.
    fn website_tiles(&self) -> Vec<Tile>;
}

/// Persistent storage for the shortcut list.
pub trait ItemStore {
    /// The error type produced by this store.
    type Error: std::error::Error + Send + 'static;

    /// Load the full list, in grid order.
    fn load(&self) -> Result<Vec<TopSiteItem>, Self::Error>;

    /// Replace the stored list with `items`.
    fn save(&self, items: &[TopSiteItem]) -> Result<(), Self::Error>;
}

/// A source of [`Command`]s.
///
/// Implementations listen on some transport (a Unix socket, an in-memory
/// channel, ...) and forward parsed commands into the provided
/// [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received command must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Command`] into `sink`.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error>;
}
