//! A word-processor document reduced to what the order form needs: tables
//! of rows of text cells.

/// Paragraph alignment of a cell's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
  Left,
  Center,
  Right,
}

impl Alignment {
  /// WordprocessingML `w:jc` value.
  pub fn as_jc(self) -> &'static str {
    match self {
      Alignment::Left => "left",
      Alignment::Center => "center",
      Alignment::Right => "right",
    }
  }
}

/// Visual style applied to a rewritten cell's single text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
  pub font:      &'static str,
  pub size_pt:   u16,
  pub alignment: Alignment,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
  pub text:  String,
  /// Set when the cell was rewritten; untouched cells keep their original
  /// formatting and carry `None`.
  pub style: Option<CellStyle>,
}

impl Cell {
  pub fn new(text: impl Into<String>) -> Self {
    Self { text: text.into(), style: None }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
  pub cells: Vec<Cell>,
}

impl Row {
  pub fn from_texts<I, S>(texts: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self { cells: texts.into_iter().map(Cell::new).collect() }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
  pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
  pub tables: Vec<Table>,
}

/// Position of a cell: table, row and cell index, all zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
  pub table: usize,
  pub row:   usize,
  pub cell:  usize,
}

impl Document {
  pub fn cell_mut(&mut self, at: CellRef) -> Option<&mut Cell> {
    self
      .tables
      .get_mut(at.table)?
      .rows
      .get_mut(at.row)?
      .cells
      .get_mut(at.cell)
  }

  /// Every row with its table and row index.
  pub fn rows(&self) -> impl Iterator<Item = (usize, usize, &Row)> {
    self.tables.iter().enumerate().flat_map(|(t, table)| {
      table.rows.iter().enumerate().map(move |(r, row)| (t, r, row))
    })
  }
}
