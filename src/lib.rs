//! **tilegrd** is a drag-intent engine for a shortcut grid with folders.
//!
//! While an item of the grid is being dragged, the engine decides what the
//! drop should mean: a plain reorder, moving the item into a folder, or
//! merging two website shortcuts into a new folder.  A target only counts
//! once the pointer has stayed inside its inner zone for a short dwell time,
//! and a brief grace period absorbs pointer jitter at the zone edge.
//!
//! # Architecture
//!
//! * [`geometry`]: rectangles, inner zones and hit tests.
//! * [`dwell`]: the per-target-kind dwell/grace timer.
//! * [`dropzone`]: the coordinator turning pointer moves into a
//!   [`FolderDropState`](intent::FolderDropState).
//! * [`controller`]: applies the verdict to the [`grid`] and persists it
//!   through the [`store`].
//!
//! The seams are the traits in [`traits`]: [`traits::Clock`] so timing can
//! be driven by hand in tests, [`traits::TileRegistry`] for tile geometry,
//! [`traits::ItemStore`] for persistence and [`traits::CommandSource`] for
//! the transport that delivers the drag lifecycle (see [`ipc`]).

pub mod clock;
pub mod command;
pub mod config;
pub mod controller;
pub mod dropzone;
pub mod dwell;
pub mod geometry;
pub mod grid;
pub mod intent;
pub mod ipc;
pub mod layout;
pub mod store;
pub mod traits;
