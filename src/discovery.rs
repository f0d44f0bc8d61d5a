use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, ensure, Context, Result};
use tracing::{debug, error, info, trace, warn};

/// Looks for image files in the image directory.
///
/// Results are sorted by name so the resumption order does not depend on the
/// platform's directory listing order.
pub fn find_images(img_dir: &Path, allowed_extensions: &[String]) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(img_dir)
        .with_context(|| format!("Failed to read directory {}", img_dir.display()))?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("Failed to read directory {}", img_dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        {
            files.push(path);
        }
    }

    if files.is_empty() {
        bail!("no images found in: {}", img_dir.display());
    }

    files.sort();
    debug!("found {} images in {}", files.len(), img_dir.display());

    Ok(files)
}
