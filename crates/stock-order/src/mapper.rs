//! Matching order-form lines to products and writing their totals.
//!
//! The form is a set of tables whose product lines carry the supplier's label
//! in the second column and the quantity to order in the fourth. Planning is
//! a read-only scan; applying the plan is a separate pass.

use stock_core::{
  catalog::{AliasTable, resolve_alias},
  totals::Totals,
};
use tracing::debug;

use crate::document::{Alignment, CellRef, CellStyle, Document};

pub const LABEL_COLUMN: usize = 1;
pub const QUANTITY_COLUMN: usize = 3;

/// Rows with fewer cells are headers or notes, not product lines.
pub const MIN_CELLS: usize = 4;

/// How a written quantity looks in the generated form.
pub const QUANTITY_STYLE: CellStyle = CellStyle {
  font:      "Arial",
  size_pt:   12,
  alignment: Alignment::Center,
};

/// One planned cell rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
  pub at:      CellRef,
  /// Canonical name the row's label resolved to.
  pub product: &'static str,
  pub text:    String,
}

/// Scan every row and plan a quantity rewrite for each line whose label
/// resolves through `aliases`. Short rows and unknown labels are skipped.
pub fn plan_edits(document: &Document, totals: &Totals, aliases: AliasTable) -> Vec<Edit> {
  let mut edits = Vec::new();

  for (table, row_idx, row) in document.rows() {
    if row.cells.len() < MIN_CELLS {
      debug!(table, row = row_idx, cells = row.cells.len(), "skipping short row");
      continue;
    }

    let label = row.cells[LABEL_COLUMN].text.trim();
    let Some(product) = resolve_alias(aliases, label) else {
      debug!(table, row = row_idx, label, "no product for label");
      continue;
    };

    // Alias targets outside the catalog have no stock to report.
    let total = totals.get(product).map_or(0, |t| t.total);
    debug!(table, row = row_idx, label, product, total, "matched order line");

    edits.push(Edit {
      at: CellRef { table, row: row_idx, cell: QUANTITY_COLUMN },
      product,
      text: total.to_string(),
    });
  }

  edits
}

/// Write planned edits into `document`, styling each rewritten cell.
/// Edits pointing outside the document are ignored.
pub fn apply_edits(document: &mut Document, edits: &[Edit]) {
  for edit in edits {
    if let Some(cell) = document.cell_mut(edit.at) {
      cell.text.clone_from(&edit.text);
      cell.style = Some(QUANTITY_STYLE);
    }
  }
}

/// Plan and apply in one call.
pub fn fill_order_form(mut document: Document, totals: &Totals, aliases: AliasTable) -> Document {
  let edits = plan_edits(&document, totals, aliases);
  apply_edits(&mut document, &edits);
  document
}
