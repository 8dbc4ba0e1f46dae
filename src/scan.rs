// Folder size computation shared by the query endpoint and the limit gate.

use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Computes the aggregate byte size of the subtree rooted at `root`.
///
/// Every non-directory entry contributes its length; directory entries
/// contribute nothing. Symbolic links are not followed. The walk is a
/// single sequential pass and aborts on the first entry that cannot be
/// read, returning the underlying I/O error.
pub fn folder_size(root: &Path) -> io::Result<u64> {
    let mut size: u64 = 0;
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            size += entry.metadata()?.len();
        }
    }
    Ok(size)
}
