//! Input discovery and ordering.
//!
//! Scans a single directory (no recursion) for still images, records each
//! file's modification time and, when the header is readable, its pixel
//! dimensions. The result is then ordered either randomly or chronologically
//! before it reaches the render queue.
//!
//! ## Directory Structure
//!
//! ```text
//! input_images/
//! ├── IMG_0001.jpg       # picked up
//! ├── IMG_0002.png       # picked up
//! ├── notes.txt          # ignored: not an image extension
//! ├── .thumb.jpg         # ignored: hidden
//! ├── IMG_0003.JPG       # ignored unless matching is case-insensitive
//! └── temp_clips/        # ignored: directories are never entered
//! ```
//!
//! ## Ordering
//!
//! - **Random**: Fisher–Yates shuffle through the run's [`RandomSource`].
//! - **Chronological**: oldest modification time first; ties keep file-name order.
//!
//! The two modes are mutually exclusive.

use crate::clip::Dimensions;
use crate::random::{RandomSource, shuffle};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read input directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Input directory does not exist: {0}")]
    InputMissing(PathBuf),
    #[error("No images found in '{}' (looking for: {})", .dir.display(), .extensions.join(", "))]
    NoImages {
        dir: PathBuf,
        extensions: Vec<String>,
    },
}

/// A source image, resolved to an absolute path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRef {
    pub path: PathBuf,
    /// Used only for chronological ordering.
    pub modified: SystemTime,
    /// Pixel size from the file header; `None` when it could not be probed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}

/// Which files count as input images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Extensions without the dot, e.g. `["jpg", "png"]`.
    pub extensions: Vec<String>,
    pub case_sensitive: bool,
}

impl ScanOptions {
    fn matches(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions.iter().any(|wanted| {
            if self.case_sensitive {
                wanted == ext
            } else {
                wanted.eq_ignore_ascii_case(ext)
            }
        })
    }
}

/// How to order the scanned images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderMode {
    Random,
    Chronological,
}

/// Collect the images directly inside `dir`, sorted by file name.
///
/// Fails when the directory is missing or holds no matching images.
pub fn scan(dir: &Path, options: &ScanOptions) -> Result<Vec<ImageRef>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::InputMissing(dir.to_path_buf()));
    }
    let root = std::path::absolute(dir)?;

    let mut images = Vec::new();
    for entry in WalkDir::new(&root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if hidden || !entry.file_type().is_file() || !options.matches(entry.path()) {
            continue;
        }

        let modified = entry.metadata()?.modified()?;
        let dimensions = probe_dimensions(entry.path());
        images.push(ImageRef {
            path: entry.into_path(),
            modified,
            dimensions,
        });
    }

    if images.is_empty() {
        return Err(ScanError::NoImages {
            dir: dir.to_path_buf(),
            extensions: options.extensions.clone(),
        });
    }

    tracing::debug!(count = images.len(), dir = %root.display(), "Scanned input images");
    Ok(images)
}

/// Read pixel dimensions from the image header without decoding pixels.
fn probe_dimensions(path: &Path) -> Option<Dimensions> {
    match image::image_dimensions(path) {
        Ok((width, height)) if width > 0 && height > 0 => Some(Dimensions { width, height }),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Could not probe image size");
            None
        }
    }
}

/// Order images for playback.
pub fn order_images(
    mut images: Vec<ImageRef>,
    mode: OrderMode,
    rng: &mut impl RandomSource,
) -> Vec<ImageRef> {
    match mode {
        OrderMode::Random => shuffle(&mut images, rng),
        OrderMode::Chronological => images.sort_by_key(|image| image.modified),
    }
    images
}
