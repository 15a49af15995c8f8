//! The zip container around a `.docx`.
//!
//! Parts are kept in archive order with their bytes and compression, so a
//! package read and written back differs only in the parts that were replaced.

use std::io::{Cursor, Read, Write};

use zip::{CompressionMethod, ZipArchive, ZipWriter, write::SimpleFileOptions};

use crate::{Error, Result};

/// Main document part of a WordprocessingML package.
pub const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Part {
  name:       String,
  data:       Vec<u8>,
  compressed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
  parts: Vec<Part>,
}

impl Package {
  pub fn new() -> Self { Self::default() }

  pub fn read(bytes: &[u8]) -> Result<Self> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut parts = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
      let mut file = archive.by_index(i)?;
      if file.is_dir() {
        continue;
      }
      let mut data = Vec::new();
      file.read_to_end(&mut data)?;
      parts.push(Part {
        name: file.name().to_owned(),
        data,
        compressed: file.compression() != CompressionMethod::Stored,
      });
    }

    Ok(Self { parts })
  }

  pub fn part(&self, name: &str) -> Option<&[u8]> {
    self.parts.iter().find(|p| p.name == name).map(|p| p.data.as_slice())
  }

  /// Like [`part`](Self::part), for parts a valid package must have.
  pub fn required_part(&self, name: &'static str) -> Result<&[u8]> {
    self.part(name).ok_or(Error::MissingPart(name))
  }

  /// Replace a part's bytes, or append a new compressed part.
  pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
    match self.parts.iter_mut().find(|p| p.name == name) {
      Some(part) => part.data = data,
      None => self.parts.push(Part { name: name.to_owned(), data, compressed: true }),
    }
  }

  pub fn write(&self) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for part in &self.parts {
      let method = if part.compressed {
        CompressionMethod::Deflated
      } else {
        CompressionMethod::Stored
      };
      let options = SimpleFileOptions::default().compression_method(method);
      writer.start_file(part.name.as_str(), options)?;
      writer.write_all(&part.data)?;
    }

    Ok(writer.finish()?.into_inner())
  }
}
