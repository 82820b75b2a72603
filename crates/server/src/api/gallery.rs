//! 相册目录浏览 API 路由。

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use folio_api_types::{ListingQuery, ListingResponse};
use folio_gallery::Listing;

use super::error::ApiError;
use super::state::AppState;

/// 创建相册 API 路由。
pub fn create_gallery_router() -> Router<Arc<AppState>> {
    Router::new().route("/api/gallery", get(list_gallery))
}

/// 列出相册目录内容。`path` 缺省时列出根目录。
async fn list_gallery(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<ListingResponse>, ApiError> {
    let path = query.path.unwrap_or_default();
    let listing = state.gallery.list(&path).await?;
    Ok(Json(to_response(listing)))
}

fn to_response(listing: Listing) -> ListingResponse {
    ListingResponse {
        folders: listing.folders,
        files: listing.files,
    }
}
