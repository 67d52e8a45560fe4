//! Image folder enumeration and decoding.
//!
//! Probing only reads image headers, so listing a large folder stays cheap;
//! full decoding happens one image at a time when the stage shows it.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use thiserror::Error;

/// File extensions picked up by [`load_images_from_folder`], lowercase.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

/// One playable image.
#[derive(Debug, Clone, PartialEq, Eq, Reflect)]
pub struct ImageMetadata {
    /// File name without the folder.
    pub filename: String,
    /// Absolute path.
    pub path: PathBuf,
    /// Native width in pixels.
    pub width: u32,
    /// Native height in pixels.
    pub height: u32,
}

impl ImageMetadata {
    /// Native size as a vector.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Failures while listing or decoding images.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// The folder could not be listed.
    #[error("cannot read folder {}: {source}", .path.display())]
    ReadFolder {
        /// Folder that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The folder has no file with a supported, readable image.
    #[error("no supported images found in {}", .0.display())]
    Empty(PathBuf),
    /// An image file could not be decoded.
    #[error("cannot decode {}: {source}", .path.display())]
    Decode {
        /// File that failed.
        path: PathBuf,
        /// Underlying decoder error.
        #[source]
        source: image::ImageError,
    },
}

/// `true` if the file extension is one of [`SUPPORTED_EXTENSIONS`], ignoring case.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// Lists the supported images directly inside `folder`, sorted by file name.
///
/// Each file's dimensions are read from its header; files that fail to probe
/// are skipped with a warning. Sub-directories are not descended into.
pub fn load_images_from_folder(folder: &Path) -> Result<Vec<ImageMetadata>, LibraryError> {
    let read_err = |source| LibraryError::ReadFolder {
        path: folder.to_path_buf(),
        source,
    };
    let folder = folder.canonicalize().map_err(read_err)?;
    let entries = fs::read_dir(&folder).map_err(read_err)?;

    let mut images = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry in {}: {e}", folder.display());
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() || !is_supported(&path) {
            continue;
        }
        match image::image_dimensions(&path) {
            Ok((width, height)) => images.push(ImageMetadata {
                filename: entry.file_name().to_string_lossy().into_owned(),
                path,
                width,
                height,
            }),
            Err(e) => warn!("skipping {}: {e}", path.display()),
        }
    }

    if images.is_empty() {
        return Err(LibraryError::Empty(folder));
    }
    images.sort_by(|a, b| compare_filenames(&a.filename, &b.filename));
    info!("loaded {} images from {}", images.len(), folder.display());
    Ok(images)
}

/// Alphabetical order that ignores case, with lowercase first when two names
/// differ only in case.
pub fn compare_filenames(a: &str, b: &str) -> Ordering {
    let folded = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<String>();
    folded(a).cmp(&folded(b)).then_with(|| b.cmp(a))
}

/// Decodes `path` into an sRGB RGBA8 texture.
pub fn decode_image(path: &Path) -> Result<Image, LibraryError> {
    let rgba = image::open(path)
        .map_err(|source| LibraryError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    debug!("decoded {} ({width}x{height})", path.display());

    Ok(Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        rgba.into_raw(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    ))
}
