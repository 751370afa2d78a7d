//! Directory scanning for image files.

use std::path::Path;

use super::GalleryError;

/// Extensions treated as images when no configuration overrides them.
pub const DEFAULT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// List the image files directly inside `dir`, sorted by name.
///
/// A file counts as an image when its extension case-insensitively matches
/// one of `extensions`. Entries that cannot be inspected and names that are
/// not valid UTF-8 are skipped with a warning.
///
/// # Errors
///
/// Returns [`GalleryError::ReadDir`] if `dir` cannot be listed.
pub fn list_images(dir: &Path, extensions: &[String]) -> Result<Vec<String>, GalleryError> {
    let entries = std::fs::read_dir(dir).map_err(|source| GalleryError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let Ok(entry) = entry else {
            continue;
        };
        let path = entry.path();
        match entry.file_type() {
            Ok(ft) if ft.is_file() => {}
            Ok(_) => continue,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "cannot read file type");
                continue;
            }
        }

        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            tracing::warn!(path = %path.display(), "skipping non-UTF-8 file name");
            continue;
        };
        if has_image_extension(Path::new(name), extensions) {
            names.push(name.to_owned());
        }
    }

    names.sort();
    Ok(names)
}

/// Whether `path` ends in one of `extensions`, ignoring case.
pub fn has_image_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let ext = ext.to_lowercase();
    extensions.iter().any(|candidate| *candidate == ext)
}

/// Normalize configured extensions: trimmed, lowercase, no leading dot.
pub fn normalize_extensions<I, S>(extensions: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extensions
        .into_iter()
        .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}
