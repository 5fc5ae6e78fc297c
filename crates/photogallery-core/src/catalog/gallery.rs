//! The gallery read model: records grouped by folder, search and naming.

use serde::{Deserialize, Serialize};

use super::folders::{percent_encode_component, FolderIndex};
use super::types::{Folder, FolderId, ImageContent, ImageId, ImageRecord, RemoteFolder, RemoteItem};
use crate::config::EditorConfig;

pub const ALL_IMAGES_TITLE: &str = "All Images";

/// Which part of the gallery is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum FolderFilter {
    #[default]
    All,
    Folder(FolderId),
}

impl From<u32> for FolderFilter {
    fn from(id: u32) -> Self {
        match id {
            0 => FolderFilter::All,
            id => FolderFilter::Folder(FolderId(id)),
        }
    }
}

impl From<FolderFilter> for u32 {
    fn from(filter: FolderFilter) -> Self {
        match filter {
            FolderFilter::All => 0,
            FolderFilter::Folder(FolderId(id)) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderSummary {
    #[serde(flatten)]
    pub folder: Folder,
    pub image_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    folders: FolderIndex,
    images: Vec<ImageRecord>,
}

impl Catalog {
    /// Build the catalog from one fetch of the folder and item listings.
    ///
    /// `fetched_at` is the cache-busting version for items that carry neither
    /// a modification date nor a unique id.
    pub fn build(
        folders: &[RemoteFolder],
        items: &[RemoteItem],
        config: &EditorConfig,
        fetched_at: u64,
    ) -> Self {
        let folders = FolderIndex::build(folders, config);

        let images: Vec<ImageRecord> = items
            .iter()
            .filter_map(|item| {
                let url = item.file_url().filter(|u| config.is_image_path(u))?;
                Some(map_item(item, url, &folders, fetched_at))
            })
            .collect();

        tracing::debug!(
            folders = folders.folders().len(),
            images = images.len(),
            skipped = items.len() - images.len(),
            "built gallery catalog"
        );

        Self { folders, images }
    }

    pub fn folders(&self) -> &[Folder] {
        self.folders.folders()
    }

    pub fn folder_index(&self) -> &FolderIndex {
        &self.folders
    }

    pub fn images(&self, filter: FolderFilter) -> Vec<&ImageRecord> {
        match filter {
            FolderFilter::All => self.images.iter().collect(),
            FolderFilter::Folder(id) => self
                .images
                .iter()
                .filter(|img| img.folder_id == Some(id))
                .collect(),
        }
    }

    pub fn folder_summaries(&self) -> Vec<FolderSummary> {
        self.folders()
            .iter()
            .map(|folder| FolderSummary {
                folder: folder.clone(),
                image_count: self
                    .images
                    .iter()
                    .filter(|img| img.folder_id == Some(folder.id))
                    .count(),
            })
            .collect()
    }

    pub fn total_count(&self) -> usize {
        self.images.len()
    }

    /// Heading for the gallery view; empty for an unknown folder.
    pub fn gallery_title(&self, filter: FolderFilter) -> String {
        match filter {
            FolderFilter::All => ALL_IMAGES_TITLE.to_string(),
            FolderFilter::Folder(id) => self
                .folders
                .get(id)
                .map(|f| f.name.clone())
                .unwrap_or_default(),
        }
    }
}

fn map_item(item: &RemoteItem, url: &str, folders: &FolderIndex, fetched_at: u64) -> ImageRecord {
    let version = [item.modified.as_deref(), item.unique_id.as_deref()]
        .into_iter()
        .flatten()
        .find(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fetched_at.to_string());

    ImageRecord {
        id: Some(ImageId(item.id)),
        folder_id: folders.folder_for_url(url),
        name: item.file_leaf_ref.clone(),
        title: item
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| item.file_leaf_ref.clone()),
        description: item.description.clone().unwrap_or_default(),
        copyright: item.copyright_info.clone().unwrap_or_default(),
        content: ImageContent::Remote(format!("{}?v={}", url, percent_encode_component(&version))),
    }
}

/// Case-insensitive substring match on titles; a blank query matches all.
pub fn search_by_title<'a, I>(images: I, query: &str) -> Vec<&'a ImageRecord>
where
    I: IntoIterator<Item = &'a ImageRecord>,
{
    let query = query.trim().to_lowercase();
    images
        .into_iter()
        .filter(|img| query.is_empty() || img.title.to_lowercase().contains(&query))
        .collect()
}

/// Make `name` unique among `existing` by inserting `_<timestamp>` before
/// the extension.
pub fn unique_file_name<'a, I>(name: &str, existing: I, timestamp: u64) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken = existing
        .into_iter()
        .any(|other| other.eq_ignore_ascii_case(name));
    if !taken {
        return name.to_string();
    }

    match name.rfind('.') {
        Some(dot) => format!("{}_{}{}", &name[..dot], timestamp, &name[dot..]),
        None => format!("{}_{}", name, timestamp),
    }
}
