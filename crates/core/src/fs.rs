//! Filesystem probes

use std::path::Path;

use log::warn;

/// Check that `path` names a regular file that can be opened for reading.
///
/// Logs the reason when it can't, so startup failures point at the file.
pub fn readable_file(path: &str) -> bool {
    let path = Path::new(path);
    match path.metadata() {
        Ok(meta) if meta.is_file() => match std::fs::File::open(path) {
            Ok(_) => true,
            Err(e) => {
                warn!("cannot open {}: {}", path.display(), e);
                false
            }
        },
        Ok(_) => {
            warn!("{} is not a regular file", path.display());
            false
        }
        Err(e) => {
            warn!("cannot stat {}: {}", path.display(), e);
            false
        }
    }
}
