// API-specific data models for the web server

use serde::{Deserialize, Serialize};

/// Query parameters for the folder size endpoint
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FolderSizeParams {
    pub folder: Option<String>,
}

/// Response returned by the folder size endpoint
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FolderSizeResponse {
    pub folder: String,
    pub size: u64,
}
