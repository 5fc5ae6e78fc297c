//! Editor configuration.
//!
//! Passed in from the widget as a plain object; every field is optional and
//! falls back to the gallery defaults.

use serde::{Deserialize, Serialize};

use crate::decode::ResampleFilter;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Filter used to stretch the crop and sample non-quarter rotations
    pub resample: ResampleFilter,
    /// Appended to the title of a copy, followed by the gallery count
    pub copy_suffix: String,
    /// Folder names never shown in the gallery
    pub excluded_folders: Vec<String>,
    /// Folders whose name starts with this prefix are hidden
    pub hidden_folder_prefix: String,
    /// File extensions (lowercase, no dot) listed as images
    pub image_extensions: Vec<String>,
    /// Rotate decoded JPEGs upright according to their EXIF orientation
    pub apply_exif_orientation: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            resample: ResampleFilter::Bilinear,
            copy_suffix: "_Copy".to_string(),
            excluded_folders: vec!["Forms".to_string()],
            hidden_folder_prefix: "_".to_string(),
            image_extensions: ["jpeg", "jpg", "png", "gif", "webp"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            apply_exif_orientation: true,
        }
    }
}

impl EditorConfig {
    /// True if a folder with this name should appear in the gallery.
    pub fn is_visible_folder(&self, name: &str) -> bool {
        let hidden = !self.hidden_folder_prefix.is_empty() && name.starts_with(&self.hidden_folder_prefix);
        !hidden && !self.excluded_folders.iter().any(|f| f == name)
    }

    /// True if the path or URL ends in a configured image extension.
    pub fn is_image_path(&self, path: &str) -> bool {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        match path.rsplit_once('.') {
            Some((_, ext)) => {
                let ext = ext.to_ascii_lowercase();
                self.image_extensions.iter().any(|e| *e == ext)
            }
            None => false,
        }
    }
}
