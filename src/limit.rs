// Folder limit gate: rejects requests while a configured folder exceeds a
// configured aggregate byte size. The folder is rescanned on every request;
// nothing is cached between requests.

use crate::{error::ApiError, scan};
use axum::{
    Extension,
    extract::Request,
    middleware::Next,
    response::Response,
};
use std::io;
use std::path::PathBuf;
use tracing::warn;

/// Gate configuration, fixed at startup.
#[derive(Debug, Clone)]
pub struct FolderLimit {
    pub folder_path: PathBuf,
    pub max_size: u64,
}

impl FolderLimit {
    /// Validates the configuration. The folder must exist when the server
    /// starts; requests do not re-check existence (a folder deleted later
    /// simply makes the per-request scan fail).
    pub fn provision(&self) -> io::Result<()> {
        if !self.folder_path.try_exists()? {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("folder does not exist: {}", self.folder_path.display()),
            ));
        }
        Ok(())
    }
}

/// Middleware applied in front of the router when a limit is configured.
/// Forwards the request unchanged when the folder is within the limit.
pub async fn enforce_folder_limit(
    Extension(limit): Extension<FolderLimit>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let folder = limit.folder_path.clone();
    let size = tokio::task::spawn_blocking(move || scan::folder_size(&folder))
        .await
        .map_err(|e| ApiError::InternalServerError(format!("Folder scan task failed: {}", e)))??;

    if size > limit.max_size {
        warn!(
            "Folder size limit exceeded: folder={}, size={}, max_size={}",
            limit.folder_path.display(),
            size,
            limit.max_size
        );
        return Err(ApiError::Forbidden("Folder size limit exceeded"));
    }

    Ok(next.run(request).await)
}

/// Parses a human-readable size expression: an integer literal with an
/// optional case-insensitive `kb`, `mb` or `gb` suffix. No suffix means
/// raw bytes.
pub fn parse_size(expr: &str) -> Result<u64, String> {
    let lower = expr.to_ascii_lowercase();
    let (literal, multiplier) = if let Some(rest) = lower.strip_suffix("kb") {
        (rest, 1024u64)
    } else if let Some(rest) = lower.strip_suffix("mb") {
        (rest, 1024 * 1024)
    } else if let Some(rest) = lower.strip_suffix("gb") {
        (rest, 1024 * 1024 * 1024)
    } else {
        (lower.as_str(), 1)
    };

    let value: u64 = literal
        .parse()
        .map_err(|e| format!("invalid size expression {:?}: {}", expr, e))?;
    value
        .checked_mul(multiplier)
        .ok_or_else(|| format!("size expression {:?} overflows", expr))
}
