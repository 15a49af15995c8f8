//! Flat CSV dump of the product table.

use std::io::Write;

use csv::{Terminator, WriterBuilder};

use crate::product::Product;

pub const CSV_HEADER: [&str; 4] = ["name", "quantity", "location", "last_modified"];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Write one header line and one line per product, CRLF-terminated.
pub fn write_csv<'a, W: Write>(
  out: W,
  products: impl IntoIterator<Item = &'a Product>,
) -> csv::Result<()> {
  let mut writer = WriterBuilder::new()
    .terminator(Terminator::CRLF)
    .from_writer(out);
  writer.write_record(CSV_HEADER)?;
  for p in products {
    writer.write_record([
      p.name.clone(),
      p.quantity.to_string(),
      p.location.to_string(),
      p.last_modified.format(TIMESTAMP_FORMAT).to_string(),
    ])?;
  }
  writer.flush()?;
  Ok(())
}
