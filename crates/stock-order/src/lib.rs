//! Order-form generation.
//!
//! Fills the supplier's `.docx` order form with current inventory totals:
//! [`docx`] turns the template into a plain [`Document`] of tables, the
//! [`mapper`] decides which quantity cells to rewrite, and [`docx`] writes the
//! edited cells back into a new package.

pub mod docx;
pub mod document;
pub mod error;
pub mod mapper;
pub mod package;
pub mod template;

pub use document::{Alignment, Cell, CellRef, CellStyle, Document, Row, Table};
pub use error::{Error, Result};
pub use mapper::{Edit, apply_edits, fill_order_form, plan_edits};
pub use template::{DOCX_MIME, output_file_name, read_template, write_output};

use stock_core::{catalog::ALIASES, totals::Totals};

/// Parse `template`, write every matched product's total into it and return
/// the serialized `.docx`.
pub fn generate_order_form(template: &[u8], totals: &Totals) -> Result<Vec<u8>> {
  let mut form = docx::OrderForm::parse(template)?;
  let edits = plan_edits(form.document(), totals, ALIASES);
  tracing::info!(filled = edits.len(), "filling order form");
  apply_edits(form.document_mut(), &edits);
  form.render()
}
