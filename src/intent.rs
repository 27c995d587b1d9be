//! What happens if the drag ends right now.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The mutually exclusive outcomes of a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DragIntent {
    /// Plain reordering of the flat grid.
    #[default]
    ReorderGrid,
    /// Append the dragged item to a folder's children.
    DropInFolder,
    /// Merge the dragged item and the hovered website into a new folder.
    CreateFolder,
}

impl fmt::Display for DragIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DragIntent::ReorderGrid => write!(f, "reorder"),
            DragIntent::DropInFolder => write!(f, "drop-in-folder"),
            DragIntent::CreateFolder => write!(f, "create-folder"),
        }
    }
}

/// Current drop verdict.
///
/// When `is_armed` is true exactly one of the target ids is set; when it is
/// false both are `None` and the intent is [`DragIntent::ReorderGrid`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FolderDropState {
    pub intent: DragIntent,
    pub target_folder_id: Option<String>,
    pub target_website_id: Option<String>,
    pub is_armed: bool,
}

impl FolderDropState {
    /// Drop into the folder `folder_id`.
    pub fn drop_in_folder(folder_id: impl Into<String>) -> Self {
        Self {
            intent: DragIntent::DropInFolder,
            target_folder_id: Some(folder_id.into()),
            target_website_id: None,
            is_armed: true,
        }
    }

    /// Merge with the website `website_id` into a new folder.
    pub fn create_folder(website_id: impl Into<String>) -> Self {
        Self {
            intent: DragIntent::CreateFolder,
            target_folder_id: None,
            target_website_id: Some(website_id.into()),
            is_armed: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unarmed_reorder() {
        let s = FolderDropState::default();
        assert_eq!(s.intent, DragIntent::ReorderGrid);
        assert!(!s.is_armed);
        assert!(s.target_folder_id.is_none());
        assert!(s.target_website_id.is_none());
    }

    #[test]
    fn constructors_set_exactly_one_target() {
        let f = FolderDropState::drop_in_folder("folder-1");
        assert_eq!(f.target_folder_id.as_deref(), Some("folder-1"));
        assert!(f.target_website_id.is_none());

        let w = FolderDropState::create_folder("website-2");
        assert_eq!(w.intent, DragIntent::CreateFolder);
        assert_eq!(w.target_website_id.as_deref(), Some("website-2"));
        assert!(w.target_folder_id.is_none());
    }

    #[test]
    fn intent_wire_names() {
        assert_eq!(
            serde_json::to_string(&DragIntent::DropInFolder).unwrap(),
            r#""DROP_IN_FOLDER""#
        );
        let parsed: DragIntent = serde_json::from_str(r#""CREATE_FOLDER""#).unwrap();
        assert_eq!(parsed, DragIntent::CreateFolder);
    }
}
