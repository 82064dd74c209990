use crate::dto::{FieldErrors, ProductRequest, ProductResponse};
use crate::errors::{ApiError, DetailResponse};
use crate::handlers::common::{created_response, no_content_response, success_response};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};

/// Creates the router for product endpoints
pub fn products_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// List all products
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "Live products", body = [ProductResponse]),
        (status = 400, description = "Listing failed", body = DetailResponse)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let products = state
        .services
        .products
        .get_all_products()
        .await
        .map_err(ApiError::bad_request)?;

    Ok(success_response(products))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid payload or storage failure", body = FieldErrors)
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let request = ProductRequest::from_json_slice(&body)?;
    request.validate_fields()?;

    let product = state
        .services
        .products
        .create_product(request)
        .await
        .map_err(ApiError::bad_request)?;

    Ok(created_response(product))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found", body = DetailResponse)
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state
        .services
        .products
        .get_product(&id)
        .await
        .map_err(ApiError::not_found)?;

    Ok(success_response(product))
}

/// Replace name, price and stock of a product
#[utoipa::path(
    put,
    path = "/products/{id}",
    params(("id" = String, Path, description = "Product ID")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid payload, unknown product or storage failure", body = FieldErrors)
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let request = ProductRequest::from_json_slice(&body)?;
    request.validate_fields()?;

    let product = state
        .services
        .products
        .update_product(&id, request)
        .await
        .map_err(ApiError::bad_request)?;

    Ok(success_response(product))
}

/// Soft-delete a product
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = DetailResponse)
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .products
        .delete_product(&id)
        .await
        .map_err(ApiError::not_found)?;

    Ok(no_content_response())
}
