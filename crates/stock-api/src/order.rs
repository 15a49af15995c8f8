//! Handler for `GET /order-form`.

use axum::{extract::State, http::header, response::IntoResponse};
use bytes::Bytes;
use chrono::Utc;
use stock_core::{
  store::{InventoryStore, ProductQuery},
  totals::compute_totals,
};
use stock_order::{DOCX_MIME, generate_order_form, output_file_name, read_template, write_output};

use crate::{AppState, error::ApiError};

/// `GET /order-form`: fill the configured template with current totals and
/// return it as an attachment. A copy is kept in the output directory when
/// one is configured.
pub async fn handler<S>(State(state): State<AppState<S>>) -> Result<impl IntoResponse, ApiError>
where
  S: InventoryStore,
{
  let products = state
    .store
    .list_products(&ProductQuery::default())
    .await
    .map_err(ApiError::store)?;
  let totals = compute_totals(&products);

  let template = read_template(&state.order.template_path).await?;
  let document = generate_order_form(&template, &totals)?;
  let name = output_file_name(Utc::now());

  if let Some(dir) = &state.order.output_dir {
    write_output(dir, &name, &document).await?;
  }

  Ok((
    [
      (header::CONTENT_TYPE, DOCX_MIME.to_owned()),
      (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{name}\"")),
    ],
    Bytes::from(document),
  ))
}
