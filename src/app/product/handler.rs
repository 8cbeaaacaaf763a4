//! 产品处理器

use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
};

use super::model::{DetailQuery, ProductForm, SearchQuery};
use crate::app::AppState;
use crate::core::{error::CoreError, extract::JsonOrForm};
use crate::view;

/// GET /
pub async fn list_products(State(state): State<AppState>) -> Result<Html<String>, CoreError> {
    let products = state.product_service.list_active().await?;
    Ok(view::home(&products))
}

/// GET /product/:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<DetailQuery>,
) -> Result<Html<String>, CoreError> {
    let product = state
        .product_service
        .get_product(id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Product not found.".to_string()))?;

    let banner = match query.status.as_deref() {
        Some("updated") => Some("Product updated."),
        Some("added") => Some("Product added."),
        _ => None,
    };

    Ok(view::product_detail(&product, banner))
}

/// GET /search?q=
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Html<String>, CoreError> {
    let term = query.q.unwrap_or_default();
    let products = state.product_service.search(&term).await?;
    Ok(view::search_results(&term, &products))
}

/// POST /product/:id/update (表单或 JSON)
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonOrForm(form): JsonOrForm<ProductForm>,
) -> Result<Redirect, CoreError> {
    if !state
        .product_service
        .update_product(id, form.into_changes())
        .await?
    {
        return Err(CoreError::NotFound(
            "Product not found or no changes.".to_string(),
        ));
    }

    Ok(Redirect::to(&format!("/product/{id}?status=updated")))
}

/// GET|POST /product/:id/delete
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<String, CoreError> {
    if !state.product_service.delete_product(id).await? {
        return Err(CoreError::NotFound(
            "Product not found for deletion.".to_string(),
        ));
    }

    Ok(format!("Product {id} deleted."))
}

/// GET /add-product
pub async fn add_product_form() -> Html<String> {
    view::add_product_form()
}

/// POST /add-product (表单或 JSON)
pub async fn create_product(
    State(state): State<AppState>,
    JsonOrForm(form): JsonOrForm<ProductForm>,
) -> Result<Redirect, CoreError> {
    let product = form
        .into_new_product()
        .ok_or_else(|| CoreError::BadRequest("Product name is required.".to_string()))?;

    let id = state.product_service.create_product(product).await?;
    Ok(Redirect::to(&format!("/product/{id}?status=added")))
}
