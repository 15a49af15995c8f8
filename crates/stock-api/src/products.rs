//! Handlers for `/products` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/products` | Optional `?name=...&location=box\|apartment` |
//! | `POST`   | `/products` | Body: [`CreateBody`]; returns 201 |
//! | `GET`    | `/products/:id` | 404 if not found |
//! | `PUT`    | `/products/:id` | Body: [`UpdateBody`] |
//! | `DELETE` | `/products/:id` | 204; history goes with it |
//! | `POST`   | `/products/initialize` | Seeds missing catalog records |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use stock_core::{
  product::{Location, NewProduct, Product, ProductUpdate},
  store::{InventoryStore, ProductQuery, Updated},
};

use crate::{
  AppState,
  error::ApiError,
  extract::{Path, Payload, Query},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub name:     Option<String>,
  /// Validated against [`Location`]; an unknown value is a 400.
  pub location: Option<String>,
}

/// `GET /products[?name=...][&location=...]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Product>>, ApiError>
where
  S: InventoryStore,
{
  let query = ProductQuery {
    name:     params.name,
    location: params.location.as_deref().map(Location::parse).transpose()?,
  };
  let products = state
    .store
    .list_products(&query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(products))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:        String,
  pub quantity:    u32,
  pub location:    String,
  pub description: Option<String>,
}

/// `POST /products`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Payload(body): Payload<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InventoryStore,
{
  let mut input = NewProduct::new(&body.name, body.quantity, &body.location)?;
  if let Some(description) = body.description {
    input = input.with_description(description);
  }
  let product = state.store.create(input).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(product)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /products/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Product>, ApiError>
where
  S: InventoryStore,
{
  let product = state
    .store
    .get_product(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::from(stock_core::Error::ProductNotFound(id)))?;
  Ok(Json(product))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub quantity: u32,
  pub location: String,
}

/// `PUT /products/:id`: returns the record and the entry logged, `null` when
/// nothing changed.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Payload(body): Payload<UpdateBody>,
) -> Result<Json<Updated>, ApiError>
where
  S: InventoryStore,
{
  let change = ProductUpdate::new(body.quantity, &body.location)?;
  let updated = state.store.update(id, change).await.map_err(ApiError::store)?;
  Ok(Json(updated))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /products/:id`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: InventoryStore,
{
  state.store.delete(id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Initialize ───────────────────────────────────────────────────────────────

/// `POST /products/initialize`: returns the records created, empty when the
/// catalog was already complete.
pub async fn initialize<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Product>>, ApiError>
where
  S: InventoryStore,
{
  let created = state
    .store
    .initialize_catalog()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(created))
}
