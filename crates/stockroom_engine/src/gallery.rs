use tracing::{debug, instrument};

use stockroom_base::{FilePath, PalHandle, StockroomResult};

/// Glob for the image formats the gallery shows. Compiled case-insensitively
/// by the PAL, so `CAT.JPG` matches too.
pub const IMAGE_GLOB: &str = "*.{jpg,jpeg,png,gif}";

/// List the image files directly inside `dir`.
///
/// Returns paths in whatever order the filesystem enumeration yields; the
/// gallery makes no ordering promise. A missing directory is an empty
/// gallery, not an error.
#[instrument(skip(pal), fields(dir = %dir))]
pub fn list_images(pal: &PalHandle, dir: &FilePath) -> StockroomResult<Vec<FilePath>> {
    let images = pal.list_directory(dir, &[IMAGE_GLOB.to_string()])?;
    debug!(count = images.len(), "listed gallery images");
    Ok(images)
}

/// Content type for an image path, judged by extension.
///
/// Returns `None` for anything that is not a gallery image format; the
/// image route treats that as not found.
pub fn image_content_type(path: &FilePath) -> Option<&'static str> {
    match path.extension()?.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}
