// API handlers for the web server

use crate::{
    error::ApiError,
    models::{FolderSizeParams, FolderSizeResponse},
    scan,
};
use axum::{Json, extract::Query};
use std::path::PathBuf;
use tracing::debug;

// --- GET /foldersize?folder=<path> ---
// Computes and reports the aggregate size of the given folder.
pub async fn get_folder_size(
    Query(params): Query<FolderSizeParams>,
) -> Result<Json<FolderSizeResponse>, ApiError> {
    let folder = match params.folder {
        Some(folder) if !folder.is_empty() => folder,
        _ => {
            return Err(ApiError::BadRequest("folder parameter is required".into()));
        }
    };

    // The walk is blocking filesystem work; run it off the async executor.
    let path = PathBuf::from(&folder);
    let size = tokio::task::spawn_blocking(move || scan::folder_size(&path))
        .await
        .map_err(|e| ApiError::InternalServerError(format!("Folder scan task failed: {}", e)))??;

    debug!("Folder size computed: folder={}, size={}", folder, size);

    Ok(Json(FolderSizeResponse { folder, size }))
}
