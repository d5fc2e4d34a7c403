/// Upload storage on the local filesystem
///
/// Uploaded bytes land under `<static_dir>/uploads/user_<id>/<filename>`, the
/// same tree the API serves at `/static`. The filename is reduced to its last
/// path component before use so an upload cannot escape its user directory.

use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Directory under the static root that holds user uploads
pub const UPLOADS_DIR: &str = "uploads";

/// Strips any directory part from a client-supplied filename
///
/// Returns `None` for names that have no usable final component
/// (empty, `.`, `..`, or a bare separator).
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let last = raw.rsplit(['/', '\\']).next()?.trim();
    if last.is_empty() || last == "." || last == ".." {
        return None;
    }
    Some(last.to_string())
}

/// Extension-style type of a filename: the text after its last `.`
///
/// A name without a dot is its own type, so `"README"` yields `"README"`.
pub fn file_type_of(filename: &str) -> String {
    filename
        .rsplit('.')
        .next()
        .unwrap_or(filename)
        .to_string()
}

/// Directory holding one user's uploads
pub fn user_upload_dir(static_dir: &Path, user_id: i64) -> PathBuf {
    static_dir.join(UPLOADS_DIR).join(format!("user_{user_id}"))
}

/// Destination path of an upload
pub fn upload_path(static_dir: &Path, user_id: i64, filename: &str) -> PathBuf {
    user_upload_dir(static_dir, user_id).join(filename)
}

/// Writes `bytes` next to `destination` without touching it
///
/// Parent directories are created as needed. Returns the staged path, which
/// [`commit_upload`] moves into place or [`discard_upload`] removes.
pub async fn stage_upload(destination: &Path, bytes: &[u8]) -> io::Result<PathBuf> {
    let parent = destination
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "upload path has no parent"))?;
    tokio::fs::create_dir_all(parent).await?;

    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let staged = parent.join(format!(".{name}.{}.part", Uuid::new_v4()));

    tokio::fs::write(&staged, bytes).await?;
    debug!(path = %staged.display(), size = bytes.len(), "Staged upload");
    Ok(staged)
}

/// Moves a staged upload onto `destination`, replacing any existing file
pub async fn commit_upload(staged: &Path, destination: &Path) -> io::Result<()> {
    tokio::fs::rename(staged, destination).await?;
    debug!(path = %destination.display(), "Saved upload");
    Ok(())
}

/// Removes a staged upload that will not be kept
pub async fn discard_upload(staged: &Path) {
    if let Err(e) = tokio::fs::remove_file(staged).await {
        warn!(path = %staged.display(), error = %e, "Failed to remove staged upload");
    }
}
