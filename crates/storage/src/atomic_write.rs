//! Atomic file write using the write-rename pattern.
//!
//! Data goes to `{path}.tmp` first, is flushed with `sync_all()`, and the temp
//! file is then renamed over the final path. Readers either see the previous
//! file or the new one, never a prefix of it.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Atomically writes `data` to `path`.
///
/// Missing parent directories are created. If the process dies before the
/// rename, the original file at `path` is untouched.
pub fn atomic_write(path: impl AsRef<Path>, data: &[u8]) -> std::io::Result<()> {
    let final_path = path.as_ref();
    let tmp_path = tmp_path_for(final_path);

    if let Some(parent) = final_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    fs::rename(&tmp_path, final_path)?;

    Ok(())
}
