//! OPC relationship parsing and model part discovery

use crate::error::{Error, Result};
use crate::xml::{self, Attributes, XmlHandler};
use quick_xml::Reader;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use urlencoding::decode;

/// Relationship type of the 3D model part
pub const MODEL_REL_TYPE: &str = "http://schemas.microsoft.com/3dmanufacturing/2013/01/3dmodel";

/// One `Relationship` entry of a `.rels` part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship identifier (`Id`)
    pub id: Option<String>,
    /// Relationship type URI (`Type`)
    pub rel_type: String,
    /// Target part name as written (`Target`)
    pub target: String,
}

#[derive(Debug, Default)]
struct RelationshipScanner {
    relationships: Vec<Relationship>,
}

impl XmlHandler for RelationshipScanner {
    fn start_element(&mut self, name: &str, attrs: &Attributes) -> Result<()> {
        if name != "Relationship" {
            return Ok(());
        }
        match (attrs.get("Type"), attrs.get("Target")) {
            (Some(rel_type), Some(target)) => self.relationships.push(Relationship {
                id: attrs.get("Id").map(str::to_string),
                rel_type: rel_type.to_string(),
                target: target.to_string(),
            }),
            _ => log::debug!("Ignoring relationship without Type or Target"),
        }
        Ok(())
    }

    fn end_element(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }
}

/// Read every relationship of a `.rels` document
pub fn read_relationships<R: BufRead>(reader: R) -> Result<Vec<Relationship>> {
    let mut scanner = RelationshipScanner::default();
    xml::drive(Reader::from_reader(reader), &mut scanner)?;
    Ok(scanner.relationships)
}

/// Target of the first relationship declaring the 3D model part
pub fn find_model_target(relationships: &[Relationship]) -> Option<&str> {
    relationships
        .iter()
        .find(|rel| rel.rel_type == MODEL_REL_TYPE)
        .map(|rel| rel.target.as_str())
}

/// Turn a relationship target into a path relative to the package root
///
/// The leading `/` is dropped and percent-encoded characters are decoded.
/// Targets containing empty, `.` or `..` segments are rejected.
pub fn part_path(target: &str) -> Result<PathBuf> {
    let trimmed = target.strip_prefix('/').unwrap_or(target);
    let decoded = decode(trimmed).map_err(|e| {
        Error::invalid_format_context(
            "Relationship target",
            &format!("'{}' is not valid percent-encoded UTF-8: {}", target, e),
        )
    })?;

    let mut path = PathBuf::new();
    for segment in decoded.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(Error::invalid_format_context(
                "Relationship target",
                &format!("'{}' is not a valid part name", target),
            ));
        }
        path.push(segment);
    }
    Ok(path)
}

/// Locate the model part of a staged package
///
/// Returns `None` when the relationships declare no model part.
pub fn model_part(rels: &[Relationship], root: &Path) -> Result<Option<PathBuf>> {
    let Some(target) = find_model_target(rels) else {
        log::debug!("No relationship of type {}", MODEL_REL_TYPE);
        return Ok(None);
    };
    let path = root.join(part_path(target)?);
    log::debug!("Model part '{}' resolved to {}", target, path.display());
    Ok(Some(path))
}
