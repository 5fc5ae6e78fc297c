//! Folder ids and folder lookup from file URLs.

use std::collections::HashMap;

use super::types::{Folder, FolderId, RemoteFolder};
use crate::config::EditorConfig;

/// Visible folders with sequential ids assigned in listing order.
///
/// Ids start at 1 and are stable for one fetch of the folder listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderIndex {
    folders: Vec<Folder>,
    by_unique_id: HashMap<String, FolderId>,
}

impl FolderIndex {
    pub fn build(remote: &[RemoteFolder], config: &EditorConfig) -> Self {
        let mut index = Self::default();

        for folder in remote.iter().filter(|f| config.is_visible_folder(&f.name)) {
            let id = FolderId(index.folders.len() as u32 + 1);
            if !folder.unique_id.is_empty() {
                index.by_unique_id.insert(folder.unique_id.clone(), id);
            }
            index.folders.push(Folder {
                id,
                name: folder.name.clone(),
            });
        }

        index
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn get(&self, id: FolderId) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn id_for_unique_id(&self, unique_id: &str) -> Option<FolderId> {
        self.by_unique_id.get(unique_id).copied()
    }

    /// Folder containing the file at `url`, if any.
    pub fn folder_for_url(&self, url: &str) -> Option<FolderId> {
        folder_for_url(url, &self.folders)
    }
}

/// Find the folder a file lives in by walking its URL path upward.
///
/// Starts at the segment above the file name. Segments are percent-decoded
/// and compared case-insensitively with folder names.
pub fn folder_for_url(url: &str, folders: &[Folder]) -> Option<FolderId> {
    let segments: Vec<&str> = url_path(url).split('/').filter(|s| !s.is_empty()).collect();
    let parents = segments.len().checked_sub(1)?;

    segments[..parents].iter().rev().find_map(|segment| {
        let segment = percent_decode(segment).to_lowercase();
        folders
            .iter()
            .find(|f| f.name.to_lowercase() == segment)
            .map(|f| f.id)
    })
}

/// Path component of an absolute or server-relative URL.
fn url_path(url: &str) -> &str {
    let url = url.split(['?', '#']).next().unwrap_or(url);
    match url.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("", |i| &rest[i..]),
        None => url,
    }
}

/// Decode `%XX` escapes; malformed escapes are kept literally.
pub(crate) fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}

/// Encode everything except RFC 3986 unreserved characters.
pub(crate) fn percent_encode_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
