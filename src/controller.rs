//! The orchestrator that ties the drop-zone coordinator, the shortcut grid
//! and the item store together.
//!
//! [`GridController`] reacts to [`Command`]s: it feeds the drag lifecycle to
//! the [`DropZoneCoordinator`], applies the final verdict (or a management
//! edit) to the [`ShortcutGrid`] and persists the result through an
//! [`ItemStore`].

use crate::command::Command;
use crate::config::{Config, ConfigError, GridConfig};
use crate::dropzone::DropZoneCoordinator;
use crate::grid::{GridError, ShortcutGrid, TopSiteItem};
use crate::intent::{DragIntent, FolderDropState};
use crate::layout::TileLayout;
use crate::traits::{Clock, ItemStore, TileRegistry};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Possible errors from the controller.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// The store failed to load or save the item list.
    #[error("store error: {0}")]
    Store(String),
    /// The verdict or edit could not be applied to the grid.
    #[error("grid error: {0}")]
    Grid(#[from] GridError),
    /// A drag end arrived with no drag in progress.
    #[error("no drag in progress")]
    NotDragging,
    /// The configuration could not be reloaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Events sent from the [`GridController`] to whoever renders the grid.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// The drop verdict changed; re-evaluate tile highlighting.
    DropStateChanged(FolderDropState),
    /// The item list changed and has been saved.
    ItemsChanged(Vec<TopSiteItem>),
}

/// Drives drag sessions against the shortcut grid.
///
/// Generic over the [`Clock`] and the [`ItemStore`], so tests run with a
/// [`ManualClock`](crate::clock::ManualClock) and an in-memory store.
pub struct GridController<C: Clock + Clone, S: ItemStore> {
    store: S,
    grid: ShortcutGrid,
    drop_zone: DropZoneCoordinator<C, TileLayout>,
    grid_config: GridConfig,
    config_path: Option<PathBuf>,
    event_tx: Option<mpsc::Sender<GridEvent>>,
}

impl<C: Clock + Clone, S: ItemStore> GridController<C, S> {
    /// Create a controller, loading the current item list from `store`.
    pub fn new(clock: C, store: S, config: Config) -> Result<Self, ControllerError> {
        let items = store
            .load()
            .map_err(|e| ControllerError::Store(e.to_string()))?;
        info!("loaded {} grid item(s)", items.len());
        Ok(Self {
            store,
            grid: ShortcutGrid::new(items),
            drop_zone: DropZoneCoordinator::new(clock, TileLayout::default(), config.drag),
            grid_config: config.grid,
            config_path: None,
            event_tx: None,
        })
    }

    /// Attach an event channel.
    ///
    /// The controller sends [`GridEvent::DropStateChanged`] whenever the
    /// verdict changes during a drag (and once more when it resets at drag
    /// end) and [`GridEvent::ItemsChanged`] after every saved mutation.
    pub fn set_event_sink(&mut self, tx: mpsc::Sender<GridEvent>) {
        self.event_tx = Some(tx);
    }

    /// File re-read by [`Command::ReloadConfig`].
    pub fn set_config_path(&mut self, path: impl AsRef<Path>) {
        self.config_path = Some(path.as_ref().to_path_buf());
    }

    /// Apply new settings.
    ///
    /// Drag settings take effect at the next drag start.  The store path is
    /// fixed at startup and is ignored here.
    pub fn set_config(&mut self, config: Config) {
        self.drop_zone.set_config(config.drag);
        self.grid_config = config.grid;
        info!("drag settings now {:?}", self.drop_zone.config());
    }

    pub fn grid(&self) -> &ShortcutGrid {
        &self.grid
    }

    pub fn drop_zone(&self) -> &DropZoneCoordinator<C, TileLayout> {
        &self.drop_zone
    }

    /// Earliest pending dwell/grace deadline, in clock milliseconds.
    pub fn next_deadline(&self) -> Option<u64> {
        self.drop_zone.next_deadline()
    }

    /// Fire due timers and publish the new drop state if it changed.
    pub fn poll(&mut self) {
        if self.drop_zone.poll() {
            self.publish_drop_state();
        }
    }

    /// Process a single [`Command`].
    pub fn handle(&mut self, cmd: Command) -> Result<(), ControllerError> {
        match cmd {
            Command::Layout(layout) => {
                *self.drop_zone.registry_mut() = layout;
                let registry = self.drop_zone.registry();
                debug!(
                    "layout: {} folder tile(s), {} website tile(s)",
                    registry.folder_tiles().len(),
                    registry.website_tiles().len()
                );
            }

            Command::DragStart { item } => {
                if self.grid.position(&item).is_none() {
                    warn!("drag start for unknown item {}", item);
                }
                self.drop_zone.handle_drag_start(item);
                self.publish_drop_state();
            }

            Command::PointerMove(pos) => {
                let before = self.drop_zone.drop_state().clone();
                self.drop_zone.handle_pointer_move(pos.into());
                if *self.drop_zone.drop_state() != before {
                    self.publish_drop_state();
                }
            }

            Command::DragEnd {
                old_index,
                new_index,
            } => {
                let dragged = self
                    .drop_zone
                    .dragged_item()
                    .map(str::to_string)
                    .ok_or(ControllerError::NotDragging)?;
                let verdict = self.drop_zone.handle_drag_end();
                self.publish_drop_state();
                self.apply_verdict(&dragged, &verdict, old_index, new_index)?;
            }

            Command::DragCancel => {
                self.drop_zone.cancel_drag();
                self.publish_drop_state();
            }

            Command::AddWebsite(website) => {
                info!("adding website {}", website.id);
                self.edit(|grid| grid.add_website(website))?;
            }

            Command::UpdateWebsite(website) => {
                info!("updating website {}", website.id);
                self.edit(|grid| grid.update_website(website))?;
            }

            Command::RemoveItem { id } => {
                info!("removing {}", id);
                self.edit(|grid| grid.remove_item(&id).map(drop))?;
            }

            Command::AddFolder { title, websites } => {
                let folder_id = self.new_folder_id();
                let title = self.folder_title(title);
                info!("adding folder {} with {} website(s)", folder_id, websites.len());
                self.edit(|grid| grid.add_folder(folder_id, title, &websites))?;
            }

            Command::EditFolder {
                id,
                title,
                websites,
            } => {
                let title = title.map(|t| self.folder_title(Some(t)));
                info!("editing folder {}", id);
                self.edit(|grid| {
                    grid.set_folder_children(&id, &websites)?;
                    match title {
                        Some(title) => grid.rename_folder(&id, title),
                        None => Ok(()),
                    }
                })?;
            }

            Command::RemoveFromFolder { website, folder } => {
                info!("moving {} out of folder {}", website, folder);
                self.edit(|grid| grid.remove_from_folder(&website, &folder))?;
            }

            Command::ReloadConfig => match &self.config_path {
                Some(path) => {
                    let config = Config::load(path)?;
                    info!("reloaded config from {}", path.display());
                    self.set_config(config);
                }
                None => warn!("no config file to reload"),
            },
        }
        Ok(())
    }

    /// Mutate the grid according to `verdict` and persist the result.
    ///
    /// A folder dragged onto another tile cannot nest, so it falls back to
    /// a plain reorder.  On error the grid is left as it was.
    fn apply_verdict(
        &mut self,
        dragged: &str,
        verdict: &FolderDropState,
        old_index: usize,
        new_index: usize,
    ) -> Result<(), ControllerError> {
        let dragged_is_folder = self.grid.get(dragged).is_some_and(TopSiteItem::is_folder);

        match (verdict.intent, &verdict.target_folder_id, &verdict.target_website_id) {
            (DragIntent::DropInFolder, Some(folder_id), _) if !dragged_is_folder => {
                info!("moving {} into folder {}", dragged, folder_id);
                self.edit(|grid| grid.insert_into_folder(dragged, folder_id))
            }
            (DragIntent::CreateFolder, _, Some(website_id)) if !dragged_is_folder => {
                let folder_id = self.new_folder_id();
                let title = self.grid_config.new_folder_title.clone();
                info!(
                    "merging {} and {} into new folder {}",
                    dragged, website_id, folder_id
                );
                self.edit(|grid| grid.create_folder(dragged, website_id, folder_id, title))
            }
            (intent, ..) => {
                if intent != DragIntent::ReorderGrid {
                    warn!("{} cannot nest ({}), reordering instead", dragged, intent);
                }
                // The dragged id is authoritative; the reported old index
                // may be stale.
                let from = self
                    .grid
                    .position(dragged)
                    .ok_or_else(|| GridError::UnknownItem(dragged.to_string()))?;
                if from != old_index {
                    warn!(
                        "{} is at {} but the drag reported {}",
                        dragged, from, old_index
                    );
                }
                if from == new_index {
                    debug!("drop at original position, nothing to do");
                    return Ok(());
                }
                info!("reorder {}: {} -> {}", dragged, from, new_index);
                self.edit(|grid| grid.reorder_item(dragged, new_index))
            }
        }
    }

    /// Apply `change` to a copy of the grid, save it, then commit and
    /// announce it.  On error the grid is left as it was.
    fn edit<F>(&mut self, change: F) -> Result<(), ControllerError>
    where
        F: FnOnce(&mut ShortcutGrid) -> Result<(), GridError>,
    {
        let mut next = self.grid.clone();
        change(&mut next)?;
        self.store
            .save(next.items())
            .map_err(|e| ControllerError::Store(e.to_string()))?;
        self.grid = next;
        self.send(GridEvent::ItemsChanged(self.grid.items().to_vec()));
        Ok(())
    }

    /// The requested title, or the configured default when missing or blank.
    fn folder_title(&self, title: Option<String>) -> String {
        match title {
            Some(t) if !t.trim().is_empty() => t.trim().to_string(),
            _ => self.grid_config.new_folder_title.clone(),
        }
    }

    /// A folder id not used anywhere in the grid.
    fn new_folder_id(&self) -> String {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let base = format!("folder-{}", stamp);
        let mut id = base.clone();
        let mut n = 1;
        while self.grid.contains_id(&id) {
            id = format!("{}-{}", base, n);
            n += 1;
        }
        id
    }

    fn publish_drop_state(&self) {
        self.send(GridEvent::DropStateChanged(self.drop_zone.drop_state().clone()));
    }

    fn send(&self, event: GridEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event);
        }
    }
}

//  Tests
