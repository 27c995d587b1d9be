//! Shortcut grid contents.
//!
//! The grid is a flat, ordered list of [`TopSiteItem`]s.  Each item is
//! either a website shortcut or a folder holding website shortcuts; folders
//! never nest.  [`ShortcutGrid`] implements the three list mutations a drag
//! can end in (reorder, insert into a folder, merge two websites into a new
//! folder) as well as the management edits: adding, updating and removing
//! items, building or editing a folder from a set of websites, and taking a
//! website back out of a folder.

use serde::{Deserialize, Serialize};

/// A website shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Website {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A folder of website shortcuts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub children: Vec<Website>,
}

/// One tile of the grid.
///
/// Serialized with a `"type"` tag: `{"type":"website","id":...}` or
/// `{"type":"folder","id":...,"title":...,"children":[...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TopSiteItem {
    Website(Website),
    Folder(Folder),
}

impl TopSiteItem {
    /// Convenience constructor for a titled website without url or icon.
    pub fn website(id: impl Into<String>, title: impl Into<String>) -> Self {
        TopSiteItem::Website(Website {
            id: id.into(),
            title: Some(title.into()),
            icon: None,
            url: None,
        })
    }

    /// Convenience constructor for a folder.
    pub fn folder(id: impl Into<String>, title: impl Into<String>, children: Vec<Website>) -> Self {
        TopSiteItem::Folder(Folder {
            id: id.into(),
            title: title.into(),
            children,
        })
    }

    pub fn id(&self) -> &str {
        match self {
            TopSiteItem::Website(w) => &w.id,
            TopSiteItem::Folder(f) => &f.id,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, TopSiteItem::Folder(_))
    }
}

/// Errors from grid mutations.  A failed mutation leaves the grid untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("no item with id {0:?}")]
    UnknownItem(String),
    #[error("item {0:?} is not a folder")]
    NotAFolder(String),
    #[error("item {0:?} is not a website")]
    NotAWebsite(String),
    #[error("index {index} out of range (have {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("item {0:?} cannot be dropped onto itself")]
    SelfTarget(String),
    #[error("id {0:?} is already in use")]
    DuplicateId(String),
    #[error("website {item:?} is not in folder {folder:?}")]
    NotInFolder { item: String, folder: String },
}

/// The ordered list of grid items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcutGrid {
    items: Vec<TopSiteItem>,
}

impl ShortcutGrid {
    pub fn new(items: Vec<TopSiteItem>) -> Self {
        Self { items }
    }

    //  Accessors

    pub fn items(&self) -> &[TopSiteItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the item with `id` in the flat list.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn get(&self, id: &str) -> Option<&TopSiteItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Whether any item, top-level or inside a folder, uses `id`.
    pub fn contains_id(&self, id: &str) -> bool {
        self.items.iter().any(|item| match item {
            TopSiteItem::Website(w) => w.id == id,
            TopSiteItem::Folder(f) => f.id == id || f.children.iter().any(|c| c.id == id),
        })
    }

    //  Mutations

    /// Move the item at `from` so that it ends up at index `to`.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), GridError> {
        let len = self.items.len();
        for index in [from, to] {
            if index >= len {
                return Err(GridError::IndexOutOfRange { index, len });
            }
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        Ok(())
    }

    /// Remove the website `item_id` from the flat list and append it to the
    /// children of `folder_id`.
    pub fn insert_into_folder(&mut self, item_id: &str, folder_id: &str) -> Result<(), GridError> {
        if item_id == folder_id {
            return Err(GridError::SelfTarget(item_id.to_string()));
        }
        let from = self.website_position(item_id)?;
        let folder_pos = self
            .position(folder_id)
            .ok_or_else(|| GridError::UnknownItem(folder_id.to_string()))?;
        if !self.items[folder_pos].is_folder() {
            return Err(GridError::NotAFolder(folder_id.to_string()));
        }

        let TopSiteItem::Website(website) = self.items.remove(from) else {
            unreachable!("website_position only returns websites");
        };
        let folder_pos = if from < folder_pos { folder_pos - 1 } else { folder_pos };
        if let TopSiteItem::Folder(folder) = &mut self.items[folder_pos] {
            folder.children.push(website);
        }
        Ok(())
    }

    /// Replace the websites `dragged_id` and `target_id` with a new folder
    /// containing both (dragged first), placed where the target was.
    pub fn create_folder(
        &mut self,
        dragged_id: &str,
        target_id: &str,
        folder_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<(), GridError> {
        if dragged_id == target_id {
            return Err(GridError::SelfTarget(dragged_id.to_string()));
        }
        let dragged_pos = self.website_position(dragged_id)?;
        let target_pos = self.website_position(target_id)?;

        let TopSiteItem::Website(dragged) = self.items.remove(dragged_pos) else {
            unreachable!("website_position only returns websites");
        };
        let target_pos = if dragged_pos < target_pos { target_pos - 1 } else { target_pos };
        let TopSiteItem::Website(target) = self.items.remove(target_pos) else {
            unreachable!("website_position only returns websites");
        };

        self.items.insert(
            target_pos,
            TopSiteItem::folder(folder_id, title, vec![dragged, target]),
        );
        Ok(())
    }

    /// Move the item `id` so that it ends up at index `to`.
    pub fn reorder_item(&mut self, id: &str, to: usize) -> Result<(), GridError> {
        let from = self
            .position(id)
            .ok_or_else(|| GridError::UnknownItem(id.to_string()))?;
        self.reorder(from, to)
    }

    /// Append a new website at the end of the grid.
    pub fn add_website(&mut self, website: Website) -> Result<(), GridError> {
        if self.contains_id(&website.id) {
            return Err(GridError::DuplicateId(website.id));
        }
        self.items.push(TopSiteItem::Website(website));
        Ok(())
    }

    /// Replace the website with the same id, top-level or inside a folder.
    pub fn update_website(&mut self, website: Website) -> Result<(), GridError> {
        let is_folder = self.get(&website.id).is_some_and(TopSiteItem::is_folder);
        let slot = self
            .items
            .iter_mut()
            .find_map(|item| match item {
                TopSiteItem::Website(w) if w.id == website.id => Some(w),
                TopSiteItem::Folder(f) => f.children.iter_mut().find(|c| c.id == website.id),
                TopSiteItem::Website(_) => None,
            });
        match slot {
            Some(w) => {
                *w = website;
                Ok(())
            }
            None if is_folder => Err(GridError::NotAWebsite(website.id)),
            None => Err(GridError::UnknownItem(website.id)),
        }
    }

    /// Delete the item `id`: a top-level website, a whole folder with its
    /// children, or a single website inside a folder.
    pub fn remove_item(&mut self, id: &str) -> Result<TopSiteItem, GridError> {
        if let Some(pos) = self.position(id) {
            return Ok(self.items.remove(pos));
        }
        for item in &mut self.items {
            if let TopSiteItem::Folder(f) = item {
                if let Some(pos) = f.children.iter().position(|c| c.id == id) {
                    return Ok(TopSiteItem::Website(f.children.remove(pos)));
                }
            }
        }
        Err(GridError::UnknownItem(id.to_string()))
    }

    /// Build a folder from the top-level websites `website_ids` (in that
    /// order) and append it to the grid.
    pub fn add_folder(
        &mut self,
        folder_id: impl Into<String>,
        title: impl Into<String>,
        website_ids: &[String],
    ) -> Result<(), GridError> {
        let folder_id = folder_id.into();
        if self.contains_id(&folder_id) {
            return Err(GridError::DuplicateId(folder_id));
        }
        let children = self.take_websites(website_ids)?;
        self.items.push(TopSiteItem::folder(folder_id, title, children));
        Ok(())
    }

    /// Change a folder's title.
    pub fn rename_folder(
        &mut self,
        folder_id: &str,
        title: impl Into<String>,
    ) -> Result<(), GridError> {
        self.folder_mut(folder_id)?.title = title.into();
        Ok(())
    }

    /// Make `website_ids` the exact children of `folder_id`, in that order.
    ///
    /// Ids may name current children or top-level websites; the latter are
    /// pulled out of the grid.  Children left out go back to the grid right
    /// after the folder, keeping their order.
    pub fn set_folder_children(
        &mut self,
        folder_id: &str,
        website_ids: &[String],
    ) -> Result<(), GridError> {
        reject_duplicates(website_ids)?;
        let mut next = self.clone();
        let mut kept = std::mem::take(&mut next.folder_mut(folder_id)?.children);

        let outside: Vec<String> = website_ids
            .iter()
            .filter(|id| !kept.iter().any(|c| &c.id == *id))
            .cloned()
            .collect();
        let mut pulled = next.take_websites(&outside)?;

        let mut children = Vec::with_capacity(website_ids.len());
        for id in website_ids {
            let source = if kept.iter().any(|c| &c.id == id) {
                &mut kept
            } else {
                &mut pulled
            };
            if let Some(pos) = source.iter().position(|c| &c.id == id) {
                children.push(source.remove(pos));
            }
        }

        let released: Vec<TopSiteItem> = kept.into_iter().map(TopSiteItem::Website).collect();
        let pos = next
            .position(folder_id)
            .ok_or_else(|| GridError::UnknownItem(folder_id.to_string()))?;
        next.items.splice(pos + 1..pos + 1, released);
        next.folder_mut(folder_id)?.children = children;
        *self = next;
        Ok(())
    }

    /// Take the website `item_id` out of `folder_id` and put it back in the
    /// grid right after the folder.
    pub fn remove_from_folder(
        &mut self,
        item_id: &str,
        folder_id: &str,
    ) -> Result<(), GridError> {
        let folder = self.folder_mut(folder_id)?;
        let child = folder
            .children
            .iter()
            .position(|c| c.id == item_id)
            .ok_or_else(|| GridError::NotInFolder {
                item: item_id.to_string(),
                folder: folder_id.to_string(),
            })?;
        let website = folder.children.remove(child);
        let at = self.position(folder_id).map_or(self.items.len(), |p| p + 1);
        self.items.insert(at, TopSiteItem::Website(website));
        Ok(())
    }

    fn folder_mut(&mut self, folder_id: &str) -> Result<&mut Folder, GridError> {
        match self.items.iter_mut().find(|item| item.id() == folder_id) {
            Some(TopSiteItem::Folder(f)) => Ok(f),
            Some(TopSiteItem::Website(_)) => Err(GridError::NotAFolder(folder_id.to_string())),
            None => Err(GridError::UnknownItem(folder_id.to_string())),
        }
    }

    /// Remove the top-level websites `ids` and return them in `ids` order.
    /// Nothing is removed if any id is not a top-level website.
    fn take_websites(&mut self, ids: &[String]) -> Result<Vec<Website>, GridError> {
        reject_duplicates(ids)?;
        for id in ids {
            self.website_position(id)?;
        }
        let mut taken: Vec<Website> = Vec::with_capacity(ids.len());
        for id in ids {
            if let Ok(pos) = self.website_position(id) {
                if let TopSiteItem::Website(w) = self.items.remove(pos) {
                    taken.push(w);
                }
            }
        }
        Ok(taken)
    }

    /// Position of the top-level website `id`.
    fn website_position(&self, id: &str) -> Result<usize, GridError> {
        let pos = self
            .position(id)
            .ok_or_else(|| GridError::UnknownItem(id.to_string()))?;
        if self.items[pos].is_folder() {
            return Err(GridError::NotAWebsite(id.to_string()));
        }
        Ok(pos)
    }
}

fn reject_duplicates(ids: &[String]) -> Result<(), GridError> {
    for (i, id) in ids.iter().enumerate() {
        if ids[..i].contains(id) {
            return Err(GridError::DuplicateId(id.clone()));
        }
    }
    Ok(())
}

impl From<ShortcutGrid> for Vec<TopSiteItem> {
    fn from(grid: ShortcutGrid) -> Self {
        grid.items
    }
}

//  Tests
