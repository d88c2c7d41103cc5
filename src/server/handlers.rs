//! Route handlers. One store call per request.
//!
//! Body and path extractors are taken as `Result` so rejections turn into
//! [`ApiError`] and keep the JSON error shape.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use tracing::debug;

use super::error::ApiError;
use super::AppState;
use crate::api::{BudgetBody, CreatedItem, ItemBody, ItemsBody, SuccessBody};
use crate::model::{ItemId, LineItem};
use crate::storage::StoredItem;

type ApiResult<T> = Result<Json<T>, ApiError>;

pub async fn get_budget(State(state): State<AppState>) -> ApiResult<BudgetBody> {
    let storage = state.storage.lock().await;
    let max_budget = storage
        .get_budget()
        .map_err(ApiError::with("Failed to get budget"))?;
    Ok(Json(BudgetBody { max_budget }))
}

pub async fn put_budget(
    State(state): State<AppState>,
    body: Result<Json<BudgetBody>, JsonRejection>,
) -> ApiResult<SuccessBody> {
    let Json(body) = body?;
    let mut storage = state.storage.lock().await;
    storage
        .update_budget(body.max_budget)
        .map_err(ApiError::with("Failed to update budget"))?;
    Ok(Json(SuccessBody::OK))
}

pub async fn list_items(State(state): State<AppState>) -> ApiResult<ItemsBody<StoredItem>> {
    let storage = state.storage.lock().await;
    let items = storage
        .get_items()
        .map_err(ApiError::with("Failed to get items"))?;
    Ok(Json(ItemsBody { items }))
}

pub async fn create_item(
    State(state): State<AppState>,
    body: Result<Json<ItemBody>, JsonRejection>,
) -> ApiResult<CreatedItem> {
    let Json(body) = body?;
    let mut storage = state.storage.lock().await;
    let id = storage
        .add_item(&body.quantity, &body.price)
        .map_err(ApiError::with("Failed to add item"))?;
    Ok(Json(CreatedItem {
        id,
        quantity: body.quantity,
        price: body.price,
    }))
}

pub async fn replace_items(
    State(state): State<AppState>,
    body: Result<Json<ItemsBody<ItemBody>>, JsonRejection>,
) -> ApiResult<SuccessBody> {
    let Json(body) = body?;
    let items: Vec<LineItem> = body.items.into_iter().map(LineItem::from).collect();
    let mut storage = state.storage.lock().await;
    storage
        .bulk_replace_items(&items)
        .map_err(ApiError::with("Failed to update items"))?;
    Ok(Json(SuccessBody::OK))
}

pub async fn update_item(
    State(state): State<AppState>,
    id: Result<Path<ItemId>, PathRejection>,
    body: Result<Json<ItemBody>, JsonRejection>,
) -> ApiResult<SuccessBody> {
    let Path(id) = id?;
    let Json(body) = body?;
    let mut storage = state.storage.lock().await;
    let changed = storage
        .update_item(id, &body.quantity, &body.price)
        .map_err(ApiError::with("Failed to update item"))?;
    if changed == 0 {
        debug!(id, "update for unknown item ignored");
    }
    Ok(Json(SuccessBody::OK))
}

pub async fn delete_item(
    State(state): State<AppState>,
    id: Result<Path<ItemId>, PathRejection>,
) -> ApiResult<SuccessBody> {
    let Path(id) = id?;
    let mut storage = state.storage.lock().await;
    storage
        .delete_item(id)
        .map_err(ApiError::with("Failed to delete item"))?;
    Ok(Json(SuccessBody::OK))
}
