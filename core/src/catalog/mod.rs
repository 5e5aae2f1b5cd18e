//! Overlay catalog
//!
//! The ordered set of overlay images a user cycles through. Loaded once from
//! a resource directory: files with the configured extension, sorted by file
//! name so the cycling order is the same on every run.
//!
//! Files that fail to decode, or decode to an empty image, are skipped with a
//! warning. A catalog with no usable image is an error.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anchorview_types::PixelSize;
use anchorview_types::formatting::format_pixels;
use image::RgbaImage;

/// A decoded overlay image.
#[derive(Debug, Clone)]
pub struct OverlayImage {
    name: String,
    path: Option<PathBuf>,
    pixels: RgbaImage,
}

impl OverlayImage {
    pub fn new(name: impl Into<String>, pixels: RgbaImage) -> Self {
        Self {
            name: name.into(),
            path: None,
            pixels,
        }
    }

    /// Decode an image file. The file name becomes the overlay name.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let decoded = image::open(path).map_err(|e| CatalogError::Decode {
            path: path.to_path_buf(),
            source: e,
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            name,
            path: Some(path.to_path_buf()),
            pixels: decoded.to_rgba8(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.pixels.width(), self.pixels.height())
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    fn is_empty(&self) -> bool {
        self.pixels.width() == 0 || self.pixels.height() == 0
    }
}

/// Immutable, non-empty, ordered list of overlays.
#[derive(Debug, Clone)]
pub struct OverlayCatalog {
    images: Vec<Arc<OverlayImage>>,
    skipped: Vec<PathBuf>,
}

impl OverlayCatalog {
    /// Load every `*.{extension}` file in `dir` (non-recursive), sorted by file name.
    pub fn load(dir: &Path, extension: &str) -> Result<Self, CatalogError> {
        let entries = fs::read_dir(dir).map_err(|e| CatalogError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && has_extension(path, extension))
            .collect();
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let mut images = Vec::with_capacity(paths.len());
        let mut skipped = Vec::new();

        for path in paths {
            match OverlayImage::open(&path) {
                Ok(image) if image.is_empty() => {
                    tracing::warn!(
                        path = %path.display(),
                        size = %format_pixels(&image.size()),
                        "Skipping empty overlay image"
                    );
                    skipped.push(path);
                }
                Ok(image) => images.push(Arc::new(image)),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping overlay image");
                    skipped.push(path);
                }
            }
        }

        if images.is_empty() {
            return Err(CatalogError::Empty {
                location: format!("{} (*.{})", dir.display(), extension),
            });
        }

        tracing::info!(
            count = images.len(),
            skipped = skipped.len(),
            dir = %dir.display(),
            "Loaded overlay catalog"
        );

        Ok(Self { images, skipped })
    }

    /// Build a catalog from already decoded images, keeping their order.
    pub fn from_images(images: Vec<OverlayImage>) -> Result<Self, CatalogError> {
        if images.is_empty() {
            return Err(CatalogError::Empty {
                location: "in-memory image list".to_string(),
            });
        }
        Ok(Self {
            images: images.into_iter().map(Arc::new).collect(),
            skipped: Vec::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Always false: an empty catalog cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Overlay at `index`, taken modulo the catalog length.
    pub fn at(&self, index: usize) -> &Arc<OverlayImage> {
        &self.images[index % self.images.len()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<OverlayImage>> {
        self.images.iter()
    }

    /// Files that matched the extension but could not be used.
    pub fn skipped(&self) -> &[PathBuf] {
        &self.skipped
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Errors that can occur while loading the overlay catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("no usable overlay images in {location}")]
    Empty { location: String },

    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode overlay {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
