use std::path::{Path, PathBuf};

use crate::foundation::core::Dimensions;
use crate::foundation::error::{FramereelError, FramereelResult};

/// Extensions that qualify a file as a frame source (matched case-insensitively).
const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// A validated, lexicographically ordered set of same-sized frame images.
#[derive(Clone, Debug)]
pub struct ImageSet {
    paths: Vec<PathBuf>,
    dimensions: Dimensions,
}

impl ImageSet {
    /// The ordered frame paths.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Pixel dimensions shared by every member.
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Number of frames in the set.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the set holds no frames. Never true for a scanned set.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Scan `folder` for frame images and verify they share one pixel size.
///
/// Qualifying files (`.png`, `.jpg`, `.jpeg`, any case) are ordered
/// lexicographically by path. The dimension check is exhaustive and
/// front-loaded: every image is probed before any encoding work starts, so
/// a heterogeneous set never reaches the encoder. No side effects.
pub fn scan_image_folder(folder: &Path) -> FramereelResult<ImageSet> {
    let entries = std::fs::read_dir(folder).map_err(|e| {
        FramereelError::invalid_input(format!("cannot read folder '{}': {e}", folder.display()))
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            FramereelError::invalid_input(format!("cannot read folder '{}': {e}", folder.display()))
        })?;
        let path = entry.path();
        if path.is_file() && has_image_extension(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let Some(first_path) = paths.first() else {
        return Err(FramereelError::EmptyFolder {
            folder: folder.to_path_buf(),
        });
    };

    let first = probe_dimensions(first_path)?;
    for path in &paths[1..] {
        let got = probe_dimensions(path)?;
        if got != first {
            return Err(FramereelError::DimensionMismatch {
                path: path.clone(),
                got_w: got.width,
                got_h: got.height,
                want_w: first.width,
                want_h: first.height,
            });
        }
    }

    Ok(ImageSet {
        paths,
        dimensions: first,
    })
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

/// Read a file's pixel size from its header without a full decode.
fn probe_dimensions(path: &Path) -> FramereelResult<Dimensions> {
    let (width, height) = image::image_dimensions(path)
        .map_err(|e| FramereelError::image_read(path, e.to_string()))?;
    Ok(Dimensions { width, height })
}
