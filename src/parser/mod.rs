//! XML parsing for 3MF model documents
//!
//! The model document is read in one streaming pass: [`DocumentReader`]
//! receives the events, asks the element [`factory`] for nodes, and fills
//! the vertex and triangle buffers as their rows stream in.

pub mod factory;
mod reader;

pub use reader::DocumentReader;

use crate::error::Result;
use crate::model::Model;
use crate::xml;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parse a model document from a buffered reader
pub fn parse_model<R: BufRead>(reader: R) -> Result<Model> {
    let mut document = DocumentReader::new();
    xml::drive(Reader::from_reader(reader), &mut document)?;
    document.into_model()
}

/// Parse model document XML held in memory
pub fn parse_model_xml(xml: &str) -> Result<Model> {
    parse_model(xml.as_bytes())
}

/// Parse a model document stored on disk
pub fn parse_model_file<P: AsRef<Path>>(path: P) -> Result<Model> {
    let file = File::open(path.as_ref())?;
    parse_model(BufReader::new(file))
}
