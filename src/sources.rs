//! Source ingestion: file paths in, decoded rasters out.

use std::path::{Path, PathBuf};

use crate::raster::SourceImage;

/// Still-image extensions accepted for review thumbnails (lowercase, no dot).
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "apng", "bmp", "cin", "dds", "dpx", "exr", "fits", "gif", "hdr", "icns", "ico", "jpeg",
    "jpg", "jp2", "j2k", "kra", "pam", "pbm", "pgm", "ppm", "pnm", "pcx", "png", "psd", "psb",
    "rgbe", "sgi", "tga", "tif", "tiff", "webp", "xbm", "xcf", "xpm",
];

/// Video extensions accepted for review thumbnails (lowercase, no dot).
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "3g2", "3gp", "amv", "asf", "avi", "flv", "f4v", "gifv", "m2v", "m4v", "mkv", "mng", "mov",
    "mp4", "mpe", "mpeg", "mpg", "mpv", "mxf", "ogv", "qt", "rm", "rmvb", "vob", "webm", "wmv",
    "yuv",
];

/// `true` when `path` carries an image or video extension (case-insensitive).
pub fn is_supported_review_file(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()) || VIDEO_EXTENSIONS.contains(&ext.as_str())
}

/// Pick the file a drop should act on.
///
/// Non-existing paths are ignored; the drop is accepted only when exactly one file remains
/// and it has a supported extension.
pub fn drop_candidate<P: AsRef<Path>>(paths: &[P]) -> Option<PathBuf> {
    let mut existing = paths.iter().map(AsRef::as_ref).filter(|p| p.exists());
    let first = existing.next()?;
    if existing.next().is_some() {
        return None;
    }
    is_supported_review_file(first).then(|| first.to_path_buf())
}

/// Decode every readable image among `paths`, in order.
///
/// Files that are missing or fail to decode are skipped with a warning.
pub fn load_sources<P: AsRef<Path>>(paths: &[P]) -> Vec<SourceImage> {
    paths
        .iter()
        .filter_map(|p| {
            let p = p.as_ref();
            match SourceImage::open(p) {
                Ok(img) => Some(img),
                Err(err) => {
                    tracing::warn!(path = %p.display(), %err, "skipping thumbnail source");
                    None
                }
            }
        })
        .collect()
}
