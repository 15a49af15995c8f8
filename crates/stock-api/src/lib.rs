//! JSON REST API for the supply inventory.
//!
//! Exposes an axum [`Router`] backed by any
//! [`stock_core::store::InventoryStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", stock_api::api_router(state))
//! ```

pub mod error;
pub mod extract;
pub mod history;
pub mod inventory;
pub mod order;
pub mod products;
pub mod reports;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use stock_core::store::InventoryStore;

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Where the order form comes from and where generated copies go.
#[derive(Debug, Clone)]
pub struct OrderConfig {
  pub template_path: PathBuf,
  /// If set, every generated form is also written here.
  pub output_dir:    Option<PathBuf>,
}

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct AppState<S: InventoryStore> {
  pub store: Arc<S>,
  pub order: Arc<OrderConfig>,
}

impl<S: InventoryStore> AppState<S> {
  pub fn new(store: S, order: OrderConfig) -> Self {
    Self { store: Arc::new(store), order: Arc::new(order) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: InventoryStore + Clone + 'static,
{
  Router::new()
    // Records
    .route("/products", get(products::list::<S>).post(products::create::<S>))
    .route("/products/initialize", post(products::initialize::<S>))
    .route(
      "/products/{id}",
      get(products::get_one::<S>)
        .put(products::update::<S>)
        .delete(products::delete_one::<S>),
    )
    .route("/inventory/reset", post(inventory::reset::<S>))
    // History
    .route("/history", get(history::handler::<S>))
    // Views
    .route("/totals", get(reports::totals::<S>))
    .route("/summary", get(reports::summary::<S>))
    .route("/export.csv", get(reports::export_csv::<S>))
    .route("/order-form", get(order::handler::<S>))
    .with_state(state)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::path::Path;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use serde_json::{Value, json};
  use stock_core::catalog::CATALOG;
  use stock_order::{
    docx::OrderForm,
    package::{DOCUMENT_PART, Package},
  };
  use stock_store_sqlite::{SqliteStore, StoreOptions};
  use tower::ServiceExt as _;

  use super::*;

  fn scratch_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("stock-api-{tag}-{}", std::process::id()))
  }

  async fn make_state(template_path: &Path, output_dir: Option<PathBuf>) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState::new(store, OrderConfig {
      template_path: template_path.to_path_buf(),
      output_dir,
    })
  }

  async fn default_state() -> AppState<SqliteStore> {
    make_state(&scratch_dir("none").join("BON_COMMANDE.docx"), None).await
  }

  async fn call(
    state: AppState<SqliteStore>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    api_router(state).oneshot(req).await.unwrap()
  }

  async fn body_bytes(resp: Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap()
      .to_vec()
  }

  async fn json_body(resp: Response) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
  }

  async fn create(state: &AppState<SqliteStore>, name: &str, qty: u32, loc: &str) -> Value {
    let resp = call(
      state.clone(),
      "POST",
      "/products",
      Some(json!({ "name": name, "quantity": qty, "location": loc })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    json_body(resp).await
  }

  // ── Products ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_then_get_returns_record() {
    let state = default_state().await;
    let created = create(&state, "Sodium", 10, "box").await;
    assert_eq!(created["name"], "Sodium");
    assert_eq!(created["quantity"], 10);
    assert_eq!(created["location"], "box");

    let id = created["id"].as_i64().unwrap();
    let resp = call(state.clone(), "GET", &format!("/products/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, created);

    let resp = call(state, "GET", &format!("/history?product_id={id}"), None).await;
    let entries = json_body(resp).await;
    assert_eq!(entries.as_array().unwrap().len(), 1);
    assert_eq!(entries[0]["action"], "create");
    assert_eq!(entries[0]["new_quantity"], 10);
  }

  #[tokio::test]
  async fn create_rejects_bad_input() {
    let state = default_state().await;

    let resp = call(
      state.clone(),
      "POST",
      "/products",
      Some(json!({ "name": "Sodium", "quantity": 1, "location": "garage" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("garage"));

    let resp = call(
      state.clone(),
      "POST",
      "/products",
      Some(json!({ "name": "   ", "quantity": 1, "location": "box" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = call(state, "GET", "/products", None).await;
    assert_eq!(json_body(resp).await, json!([]));
  }

  #[tokio::test]
  async fn malformed_requests_get_json_errors() {
    let state = default_state().await;

    let resp = call(
      state.clone(),
      "POST",
      "/products",
      Some(json!({ "name": "Sodium", "quantity": -1, "location": "box" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());

    let resp = call(
      state.clone(),
      "PUT",
      "/products/abc",
      Some(json!({ "quantity": 1, "location": "box" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());

    let resp = call(state, "GET", "/history?limit=many", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn unknown_product_is_404() {
    let state = default_state().await;
    let resp = call(state.clone(), "GET", "/products/42", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = call(
      state.clone(),
      "PUT",
      "/products/42",
      Some(json!({ "quantity": 1, "location": "box" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = call(state, "DELETE", "/products/42", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn update_logs_only_real_changes() {
    let state = default_state().await;
    let id = create(&state, "Dialyseurs", 3, "box").await["id"].as_i64().unwrap();
    let uri = format!("/products/{id}");

    let resp = call(
      state.clone(),
      "PUT",
      &uri,
      Some(json!({ "quantity": 3, "location": "box" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["entry"], Value::Null);

    let resp = call(
      state.clone(),
      "PUT",
      &uri,
      Some(json!({ "quantity": 5, "location": "apartment" })),
    )
    .await;
    let updated = json_body(resp).await;
    assert_eq!(updated["product"]["quantity"], 5);
    assert_eq!(updated["product"]["location"], "apartment");
    assert_eq!(updated["entry"]["action"], "update");
    assert_eq!(updated["entry"]["old_quantity"], 3);
    assert_eq!(updated["entry"]["old_location"], "box");

    let resp = call(state, "GET", &format!("/history?product_id={id}&action=update"), None).await;
    assert_eq!(json_body(resp).await.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn delete_removes_record_and_history() {
    let state = default_state().await;
    let id = create(&state, "Raccords Y", 2, "apartment").await["id"].as_i64().unwrap();

    let resp = call(state.clone(), "DELETE", &format!("/products/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = call(state.clone(), "GET", &format!("/products/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = call(state, "GET", &format!("/history?product_id={id}"), None).await;
    assert_eq!(json_body(resp).await, json!([]));
  }

  #[tokio::test]
  async fn list_filters_by_location() {
    let state = default_state().await;
    create(&state, "Sodium", 10, "box").await;
    create(&state, "Sodium", 5, "apartment").await;

    let resp = call(state.clone(), "GET", "/products?location=apartment", None).await;
    let listed = json_body(resp).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["quantity"], 5);

    let resp = call(state, "GET", "/products?location=cellar", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn duplicate_is_conflict_when_unique() {
    let store = SqliteStore::open_in_memory()
      .await
      .unwrap()
      .with_options(StoreOptions { unique_name_location: true });
    let state = AppState::new(store, OrderConfig {
      template_path: scratch_dir("none").join("BON_COMMANDE.docx"),
      output_dir:    None,
    });
    create(&state, "Sodium", 10, "box").await;

    let resp = call(
      state,
      "POST",
      "/products",
      Some(json!({ "name": "Sodium", "quantity": 1, "location": "box" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
  }

  // ── Catalog, reset, views ───────────────────────────────────────────────────

  #[tokio::test]
  async fn initialize_is_idempotent() {
    let state = default_state().await;
    let resp = call(state.clone(), "POST", "/products/initialize", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await.as_array().unwrap().len(), CATALOG.len() * 2);

    let resp = call(state, "POST", "/products/initialize", None).await;
    assert_eq!(json_body(resp).await, json!([]));
  }

  #[tokio::test]
  async fn reset_zeroes_everything() {
    let state = default_state().await;
    create(&state, "Sodium", 10, "box").await;
    create(&state, "Enoxaparine", 0, "apartment").await;

    let resp = call(state.clone(), "POST", "/inventory/reset", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let entries = json_body(resp).await;
    assert_eq!(entries.as_array().unwrap().len(), 2);
    assert!(entries.as_array().unwrap().iter().all(|e| e["action"] == "reset"));

    let resp = call(state, "GET", "/totals", None).await;
    let totals = json_body(resp).await;
    assert!(totals.as_array().unwrap().iter().all(|t| t["total"] == 0));
  }

  #[tokio::test]
  async fn totals_cover_the_catalog() {
    let state = default_state().await;
    create(&state, "Sodium", 10, "box").await;
    create(&state, "Sodium", 5, "apartment").await;
    create(&state, "Pansements", 99, "box").await;

    let resp = call(state, "GET", "/totals", None).await;
    let totals = json_body(resp).await;
    let rows = totals.as_array().unwrap();
    assert_eq!(rows.len(), CATALOG.len());
    let sodium = rows.iter().find(|t| t["name"] == "Sodium").unwrap();
    assert_eq!(sodium, &json!({ "name": "Sodium", "box": 10, "apartment": 5, "total": 15 }));
  }

  #[tokio::test]
  async fn summary_seeds_catalog() {
    let state = default_state().await;
    let resp = call(state, "GET", "/summary", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let summary = json_body(resp).await;
    assert_eq!(summary["products"].as_array().unwrap().len(), CATALOG.len() * 2);
    assert_eq!(summary["totals"].as_array().unwrap().len(), CATALOG.len());
  }

  #[tokio::test]
  async fn history_rejects_unknown_action() {
    let state = default_state().await;
    let resp = call(state, "GET", "/history?action=explode", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn export_is_csv_attachment() {
    let state = default_state().await;
    create(&state, "Kits de ponctions", 4, "box").await;

    let resp = call(state, "GET", "/export.csv", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/csv; charset=utf-8");
    let disposition = resp.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_owned();
    assert!(disposition.starts_with("attachment; filename=\"inventory_"));

    let csv = String::from_utf8(body_bytes(resp).await).unwrap();
    let mut lines = csv.split("\r\n");
    assert_eq!(lines.next(), Some("name,quantity,location,last_modified"));
    assert!(lines.next().unwrap().starts_with("Kits de ponctions,4,box,"));
  }

  // ── Order form ──────────────────────────────────────────────────────────────

  fn write_template(dir: &Path) -> PathBuf {
    let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:tbl>
<w:tr><w:tc><w:p/></w:tc><w:tc><w:p><w:r><w:t>SERINGUE 20ML</w:t></w:r></w:p></w:tc><w:tc><w:p/></w:tc><w:tc><w:p><w:r><w:t>0</w:t></w:r></w:p></w:tc></w:tr>
</w:tbl></w:body></w:document>"#;
    let mut package = Package::new();
    package.set_part(DOCUMENT_PART, xml.as_bytes().to_vec());
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join("BON_COMMANDE.docx");
    std::fs::write(&path, package.write().unwrap()).unwrap();
    path
  }

  #[tokio::test]
  async fn order_form_without_template_is_404() {
    let state = default_state().await;
    let resp = call(state, "GET", "/order-form", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn order_form_carries_totals() {
    let dir = scratch_dir("order");
    let template = write_template(&dir);
    let output = dir.join("out");
    let state = make_state(&template, Some(output.clone())).await;
    create(&state, "Seringues 20 ml", 4, "box").await;
    create(&state, "Seringues 20 ml", 3, "apartment").await;

    let resp = call(state, "GET", "/order-form", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
      resp.headers()[header::CONTENT_TYPE],
      stock_order::DOCX_MIME
    );
    let disposition = resp.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_owned();
    assert!(disposition.contains("BON_COMMANDE_"));

    let bytes = body_bytes(resp).await;
    let form = OrderForm::parse(&bytes).unwrap();
    assert_eq!(form.document().tables[0].rows[0].cells[3].text, "7");

    let saved: Vec<_> = std::fs::read_dir(&output).unwrap().collect();
    assert_eq!(saved.len(), 1);
    let _ = std::fs::remove_dir_all(&dir);
  }
}
