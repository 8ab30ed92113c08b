//! Static content on disk: photo albums and the application template.

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::errors::MediaError;

/// Telegram accepts at most ten items per media group
pub const MAX_ALBUM_SIZE: usize = 10;

const IMAGE_EXTENSION: &str = "jpg";

/// List every `.jpg` file under `dir`, recursively, sorted by file name
///
/// An empty listing is an error: there is nothing to send.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, MediaError> {
    let mut images = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| MediaError::Io {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

        if entry.file_type().is_file()
            && entry.path().extension().and_then(|ext| ext.to_str()) == Some(IMAGE_EXTENSION)
        {
            images.push(entry.into_path());
        }
    }

    debug!(dir = %dir.display(), count = images.len(), "Listed album images");

    if images.is_empty() {
        return Err(MediaError::NoImages(dir.to_path_buf()));
    }
    Ok(images)
}

/// Make sure a document exists before trying to upload it
pub fn ensure_document(path: &Path) -> Result<(), MediaError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(MediaError::DocumentMissing(path.to_path_buf()))
    }
}

/// Split an album into groups Telegram will accept
pub fn album_chunks(images: &[PathBuf]) -> std::slice::Chunks<'_, PathBuf> {
    images.chunks(MAX_ALBUM_SIZE)
}
