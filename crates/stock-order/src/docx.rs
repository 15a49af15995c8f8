//! Reading and writing the order form's `word/document.xml`.
//!
//! The part is kept as a flat list of XML events. Parsing records, for every
//! cell of every top-level table, which events make up that cell, and builds
//! the [`Document`] view from them. Rendering replays the events unchanged
//! except for rewritten cells, whose content is replaced by a single styled
//! paragraph while their cell properties are kept.
//!
//! Cell text is the text of the cell's own paragraphs, one line each. A cell
//! spanning several grid columns (`gridSpan`) appears once per column, and a
//! row starting after the first grid column (`gridBefore`) is padded with
//! empty cells, so column positions in the [`Document`] match the visual grid.

use std::{fmt::Display, ops::Range};

use quick_xml::{
  Reader, Writer,
  events::{BytesEnd, BytesStart, BytesText, Event},
};

use crate::{
  Error, Result,
  document::{Cell, CellStyle, Document, Row, Table},
  package::{DOCUMENT_PART, Package},
};

fn xml_err(e: impl Display) -> Error { Error::Xml(e.to_string()) }

/// Event indices of one `w:tc`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CellSpan {
  open:    usize,
  /// Equal to `open` for a self-closing cell.
  close:   usize,
  /// The `w:tcPr` element, if any.
  props:   Option<Range<usize>>,
  columns: usize,
}

/// Event layout of one `w:tr`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RowLayout {
  /// Grid columns skipped before the first cell.
  before: usize,
  spans:  Vec<CellSpan>,
}

/// A parsed order-form template.
#[derive(Debug, Clone)]
pub struct OrderForm {
  package:  Package,
  events:   Vec<Event<'static>>,
  layout:   Vec<Vec<RowLayout>>,
  document: Document,
}

impl OrderForm {
  pub fn parse(bytes: &[u8]) -> Result<Self> {
    let package = Package::read(bytes)?;
    let (events, scanner) = scan(package.required_part(DOCUMENT_PART)?)?;
    Ok(Self {
      package,
      events,
      layout: scanner.layout,
      document: scanner.document,
    })
  }

  pub fn document(&self) -> &Document { &self.document }

  /// Cells whose `style` is set are rewritten on [`render`](Self::render).
  pub fn document_mut(&mut self) -> &mut Document { &mut self.document }

  /// Serialize the package with rewritten cells applied.
  pub fn render(&self) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    let mut rewrites = self.rewrites().into_iter().peekable();

    let mut i = 0;
    while i < self.events.len() {
      if let Some((span, text, style)) = rewrites.next_if(|(span, ..)| span.open == i) {
        self.write_cell(&mut writer, span, text, style)?;
        i = span.close + 1;
        continue;
      }
      writer.write_event(self.events[i].borrow()).map_err(xml_err)?;
      i += 1;
    }

    let mut package = self.package.clone();
    package.set_part(DOCUMENT_PART, writer.into_inner());
    package.write()
  }

  /// Rewritten cells in document order. A merged cell takes the first
  /// rewritten column it covers.
  fn rewrites(&self) -> Vec<(&CellSpan, &str, CellStyle)> {
    let mut out = Vec::new();
    for (table, rows) in self.document.tables.iter().zip(&self.layout) {
      for (row, layout) in table.rows.iter().zip(rows) {
        let mut column = layout.before;
        for span in &layout.spans {
          let covered = row.cells.get(column..column + span.columns).unwrap_or_default();
          if let Some((text, style)) =
            covered.iter().find_map(|c| c.style.map(|s| (c.text.as_str(), s)))
          {
            out.push((span, text, style));
          }
          column += span.columns;
        }
      }
    }
    out.sort_by_key(|(span, ..)| span.open);
    out
  }

  fn write_cell(
    &self,
    writer: &mut Writer<Vec<u8>>,
    span: &CellSpan,
    text: &str,
    style: CellStyle,
  ) -> Result<()> {
    let tc = match &self.events[span.open] {
      Event::Start(e) | Event::Empty(e) => e,
      other => return Err(Error::Malformed(format!("cell starts with {other:?}"))),
    };
    let prefix = match tc.name().prefix() {
      Some(p) => Some(std::str::from_utf8(p.as_ref()).map_err(xml_err)?.to_owned()),
      None => None,
    };
    let mut out = CellWriter { writer, prefix };

    out.event(Event::Start(tc.borrow()))?;
    if let Some(props) = &span.props {
      for event in &self.events[props.clone()] {
        out.event(event.borrow())?;
      }
    }

    let size = (style.size_pt * 2).to_string();
    out.start("p", &[])?;
    out.start("pPr", &[])?;
    out.empty("jc", &[("val", style.alignment.as_jc())])?;
    out.end("pPr")?;
    out.start("r", &[])?;
    out.start("rPr", &[])?;
    out.empty("rFonts", &[
      ("ascii", style.font),
      ("hAnsi", style.font),
      ("cs", style.font),
    ])?;
    out.empty("sz", &[("val", size.as_str())])?;
    out.empty("szCs", &[("val", size.as_str())])?;
    out.end("rPr")?;
    out.start("t", &[("xml:space", "preserve")])?;
    out.event(Event::Text(BytesText::new(text)))?;
    out.end("t")?;
    out.end("r")?;
    out.end("p")?;

    out.event(Event::End(tc.to_end()))
  }
}

/// Writes elements in the namespace prefix of the cell being replaced.
struct CellWriter<'w> {
  writer: &'w mut Writer<Vec<u8>>,
  prefix: Option<String>,
}

impl CellWriter<'_> {
  fn qualify(&self, local: &str) -> String {
    match &self.prefix {
      Some(p) if !local.contains(':') => format!("{p}:{local}"),
      _ => local.to_owned(),
    }
  }

  fn element(&self, local: &str, attrs: &[(&str, &str)]) -> BytesStart<'static> {
    let keys: Vec<String> = attrs.iter().map(|(k, _)| self.qualify(k)).collect();
    BytesStart::new(self.qualify(local)).with_attributes(
      keys.iter().zip(attrs).map(|(k, (_, v))| (k.as_str(), *v)),
    )
  }

  fn event(&mut self, event: Event<'_>) -> Result<()> {
    self.writer.write_event(event).map_err(xml_err)
  }

  fn start(&mut self, local: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let e = self.element(local, attrs);
    self.event(Event::Start(e))
  }

  fn empty(&mut self, local: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let e = self.element(local, attrs);
    self.event(Event::Empty(e))
  }

  fn end(&mut self, local: &str) -> Result<()> {
    let name = self.qualify(local);
    self.event(Event::End(BytesEnd::new(name)))
  }
}

// ─── Scanning ────────────────────────────────────────────────────────────────

fn scan(xml: &[u8]) -> Result<(Vec<Event<'static>>, Scanner)> {
  let mut reader = Reader::from_reader(xml);
  let mut buf = Vec::new();
  let mut events = Vec::new();
  let mut stack: Vec<Vec<u8>> = Vec::new();
  let mut scanner = Scanner::default();

  loop {
    let event = reader.read_event_into(&mut buf)?.into_owned();
    buf.clear();
    let idx = events.len();

    match &event {
      Event::Eof => break,
      Event::Start(e) => {
        let name = e.local_name().as_ref().to_vec();
        scanner.open(&name, stack.len(), stack.last().map(Vec::as_slice), e, idx)?;
        stack.push(name);
      }
      Event::Empty(e) => {
        let name = e.local_name().as_ref().to_vec();
        scanner.open(&name, stack.len(), stack.last().map(Vec::as_slice), e, idx)?;
        scanner.close(&name, stack.len(), idx);
      }
      Event::End(_) => {
        let name = stack
          .pop()
          .ok_or_else(|| Error::Malformed("unbalanced end tag".into()))?;
        scanner.close(&name, stack.len(), idx);
      }
      Event::Text(t) if stack.last().is_some_and(|n| n == b"t") => {
        scanner.text(&t.unescape().map_err(xml_err)?);
      }
      _ => {}
    }

    events.push(event);
  }

  Ok((events, scanner))
}

/// Tracks position inside top-level tables. Depths are stack depths; a
/// table at depth `d` has rows at `d + 1`, cells at `d + 2` and cell
/// paragraphs at `d + 3`.
#[derive(Debug, Default)]
struct Scanner {
  document: Document,
  layout:   Vec<Vec<RowLayout>>,
  table:    Option<usize>,
  row:      Option<(Row, RowLayout)>,
  cell:     Option<OpenCell>,
}

#[derive(Debug)]
struct OpenCell {
  open:        usize,
  props_open:  Option<usize>,
  props:       Option<Range<usize>>,
  columns:     usize,
  paragraphs:  Vec<String>,
  paragraph:   Option<String>,
  run_depth:   Option<usize>,
}

impl OpenCell {
  fn new(open: usize) -> Self {
    Self {
      open,
      props_open: None,
      props: None,
      columns: 1,
      paragraphs: Vec::new(),
      paragraph: None,
      run_depth: None,
    }
  }

  fn push(&mut self, s: &str) {
    if self.run_depth.is_none() {
      return;
    }
    if let Some(p) = self.paragraph.as_mut() {
      p.push_str(s);
    }
  }
}

impl Scanner {
  fn open(
    &mut self,
    name: &[u8],
    depth: usize,
    parent: Option<&[u8]>,
    start: &BytesStart<'_>,
    idx: usize,
  ) -> Result<()> {
    let Some(td) = self.table else {
      if name == b"tbl" && parent == Some(b"body".as_slice()) {
        self.table = Some(depth);
        self.document.tables.push(Table::default());
        self.layout.push(Vec::new());
      }
      return Ok(());
    };

    match (name, depth - td) {
      (b"tr", 1) => self.row = Some((Row::default(), RowLayout::default())),
      (b"gridBefore", 3) if self.cell.is_none() => {
        let before = grid_columns(start, "gridBefore")?;
        if let Some((row, layout)) = self.row.as_mut() {
          row.cells.extend(std::iter::repeat_n(Cell::default(), before));
          layout.before = before;
        }
      }
      (b"tc", 2) if self.row.is_some() => self.cell = Some(OpenCell::new(idx)),
      _ => {
        let Some(cell) = self.cell.as_mut() else { return Ok(()) };
        match (name, depth - td) {
          (b"tcPr", 3) => cell.props_open = Some(idx),
          (b"gridSpan", 4) if cell.props_open.is_some() && cell.props.is_none() => {
            cell.columns = grid_columns(start, "gridSpan")?.max(1);
          }
          (b"p", 3) => cell.paragraph = Some(String::new()),
          (b"r", _) if cell.paragraph.is_some() && cell.run_depth.is_none() => {
            cell.run_depth = Some(depth);
          }
          (b"tab", _) => cell.push("\t"),
          (b"br" | b"cr", _) => cell.push("\n"),
          _ => {}
        }
      }
    }
    Ok(())
  }

  fn close(&mut self, name: &[u8], depth: usize, idx: usize) {
    let Some(td) = self.table else { return };

    match (name, depth - td) {
      (b"tbl", 0) => self.table = None,
      (b"tr", 1) => {
        let finished = self.row.take();
        if let (Some((row, row_layout)), Some(table), Some(layout)) =
          (finished, self.document.tables.last_mut(), self.layout.last_mut())
        {
          table.rows.push(row);
          layout.push(row_layout);
        }
      }
      (b"tc", 2) => {
        if let (Some(cell), Some((row, layout))) = (self.cell.take(), self.row.as_mut()) {
          let text = cell.paragraphs.join("\n");
          row
            .cells
            .extend(std::iter::repeat_n(Cell::new(text), cell.columns));
          layout.spans.push(CellSpan {
            open:    cell.open,
            close:   idx,
            props:   cell.props,
            columns: cell.columns,
          });
        }
      }
      _ => {
        let Some(cell) = self.cell.as_mut() else { return };
        match (name, depth - td) {
          (b"tcPr", 3) => cell.props = cell.props_open.map(|start| start..idx + 1),
          (b"p", 3) => {
            if let Some(p) = cell.paragraph.take() {
              cell.paragraphs.push(p);
            }
            cell.run_depth = None;
          }
          (b"r", _) if cell.run_depth == Some(depth) => cell.run_depth = None,
          _ => {}
        }
      }
    }
  }

  fn text(&mut self, s: &str) {
    if let Some(cell) = self.cell.as_mut() {
      cell.push(s);
    }
  }
}

/// The `w:val` of a grid count such as `gridSpan` or `gridBefore`.
fn grid_columns(start: &BytesStart<'_>, what: &str) -> Result<usize> {
  for attr in start.attributes() {
    let attr = attr.map_err(xml_err)?;
    if attr.key.local_name().as_ref() == b"val" {
      let value = attr.unescape_value().map_err(xml_err)?;
      let count: usize = value
        .trim()
        .parse()
        .map_err(|_| Error::Malformed(format!("bad {what} {value:?}")))?;
      return Ok(count);
    }
  }
  Ok(0)
}
