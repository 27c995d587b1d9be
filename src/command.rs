//! Commands understood by the daemon.
//!
//! The front end forwards its drag lifecycle as [`Command`]s: the current
//! tile layout, the start of a drag, every pointer move, and the end (or
//! cancellation) of the drag.  Management edits made outside a drag (adding
//! or editing websites and folders) arrive as commands too.  Pointer positions are accepted either as
//! `{"x":..,"y":..}`, as a `[x, y]` pair, or as an `"x y"` string.

use crate::geometry::Point;
use crate::grid::Website;
use crate::layout::TileLayout;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Wire format for a pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl From<PointerPosition> for Point {
    fn from(p: PointerPosition) -> Self {
        Point::new(p.x, p.y)
    }
}

impl<'de> Deserialize<'de> for PointerPosition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = PointerPosition;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "object {{x, y}}, [x, y], or string \"x y\"")
            }
            fn visit_map<A>(self, mut map: A) -> Result<PointerPosition, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut x = None;
                let mut y = None;
                while let Some(k) = map.next_key::<String>()? {
                    match k.as_str() {
                        "x" => x = Some(map.next_value()?),
                        "y" => y = Some(map.next_value()?),
                        _ => {
                            let _: serde::de::IgnoredAny = map.next_value()?;
                        }
                    }
                }
                Ok(PointerPosition {
                    x: x.ok_or_else(|| DeError::missing_field("x"))?,
                    y: y.ok_or_else(|| DeError::missing_field("y"))?,
                })
            }
            fn visit_seq<A>(self, mut seq: A) -> Result<PointerPosition, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let x = seq
                    .next_element()?
                    .ok_or_else(|| DeError::invalid_length(0, &self))?;
                let y = seq
                    .next_element()?
                    .ok_or_else(|| DeError::invalid_length(1, &self))?;
                Ok(PointerPosition { x, y })
            }
            fn visit_str<E>(self, s: &str) -> Result<PointerPosition, E>
            where
                E: DeError,
            {
                let parts: Vec<&str> = s.split_whitespace().collect();
                if parts.len() != 2 {
                    return Err(DeError::custom(format!(
                        "PointerMove: expected \"x y\", got {:?}",
                        s
                    )));
                }
                let x: f64 = parts[0]
                    .parse()
                    .map_err(|_| DeError::custom("PointerMove: x must be a number"))?;
                let y: f64 = parts[1]
                    .parse()
                    .map_err(|_| DeError::custom("PointerMove: y must be a number"))?;
                Ok(PointerPosition { x, y })
            }
        }
        deserializer.deserialize_any(V)
    }
}

/// Every event the grid controller reacts to.
///
/// Commands are produced by [`CommandSource`](crate::traits::CommandSource)
/// implementations and consumed by the
/// [`GridController`](crate::controller::GridController).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Replace the known tile layout.  Sent whenever the grid reflows.
    Layout(TileLayout),

    /// A drag of the item `item` has started.
    DragStart { item: String },

    /// The pointer moved during a drag.
    PointerMove(PointerPosition),

    /// The drag ended.
    ///
    /// `old_index` / `new_index` are the positions reported by the sortable
    /// list; they are only used when the verdict is a plain reorder.
    DragEnd { old_index: usize, new_index: usize },

    /// The drag was aborted (escape key, focus loss).
    ///
    /// On the wire this is the JSON string `"DragCancel"`.
    DragCancel,

    /// Append a website to the grid.
    AddWebsite(Website),

    /// Replace the website with the same id, wherever it lives.
    UpdateWebsite(Website),

    /// Delete an item: a website, a folder with its contents, or a website
    /// inside a folder.
    RemoveItem { id: String },

    /// Build a new folder from top-level websites.  A missing or blank
    /// title falls back to the configured default.
    AddFolder {
        #[serde(default)]
        title: Option<String>,
        websites: Vec<String>,
    },

    /// Set a folder's children (and optionally its title).
    EditFolder {
        id: String,
        #[serde(default)]
        title: Option<String>,
        websites: Vec<String>,
    },

    /// Move a website out of its folder, back into the grid.
    RemoveFromFolder { website: String, folder: String },

    /// Re-read the configuration file and apply it.
    ReloadConfig,
}
