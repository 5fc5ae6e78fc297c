//! Gallery record types and the remote listing shapes they are built from.

use serde::{Deserialize, Serialize};

/// Small sequential folder id. `0` is reserved for "All Images".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(pub u32);

/// Remote list item id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
}

/// Where a record's pixels live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ImageContent {
    /// Encoded image bytes (a fresh save)
    Encoded(Vec<u8>),
    /// URL of the stored file
    Remote(String),
}

/// One gallery image with its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// `None` for records that have not been stored yet
    pub id: Option<ImageId>,
    pub folder_id: Option<FolderId>,
    /// File name in the library
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub copyright: String,
    pub content: ImageContent,
}

impl ImageRecord {
    /// A blank, unsaved record.
    pub fn blank(folder_id: Option<FolderId>) -> Self {
        Self {
            id: None,
            folder_id,
            name: String::new(),
            title: String::new(),
            description: String::new(),
            copyright: String::new(),
            content: ImageContent::Encoded(Vec::new()),
        }
    }

    pub fn is_stored(&self) -> bool {
        self.id.is_some()
    }
}

/// Folder entry as returned by the document library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteFolder {
    pub name: String,
    #[serde(default)]
    pub unique_id: String,
}

/// List item as returned by the document library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RemoteItem {
    pub id: u32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub file_leaf_ref: String,
    pub encoded_abs_url: Option<String>,
    pub file_ref: Option<String>,
    pub copyright_info: Option<String>,
    pub unique_id: Option<String>,
    pub modified: Option<String>,
}

impl RemoteItem {
    /// Absolute URL when the library provides one, else the server-relative path.
    pub fn file_url(&self) -> Option<&str> {
        self.encoded_abs_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.file_ref.as_deref())
            .filter(|s| !s.is_empty())
    }
}
