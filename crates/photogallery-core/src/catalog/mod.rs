//! Gallery catalog: folders, image records and the lookups the gallery view
//! needs on top of the remote listings.

mod fetch;
mod folders;
mod gallery;
mod types;

pub use fetch::{check_fetched_mime, FetchError};
pub use folders::{folder_for_url, FolderIndex};
pub use gallery::{
    search_by_title, unique_file_name, Catalog, FolderFilter, FolderSummary, ALL_IMAGES_TITLE,
};
pub use types::{Folder, FolderId, ImageContent, ImageId, ImageRecord, RemoteFolder, RemoteItem};
