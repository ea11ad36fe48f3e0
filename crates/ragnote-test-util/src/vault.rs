use std::path::{Path, PathBuf};

/// Write a note at `relative` under `root`, creating parent directories.
///
/// Returns the path of the written file.
pub fn write_note(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}
