//! Element factory: maps a tag name to a new element-tree node

use crate::error::{Error, Result};
use crate::model::*;
use crate::xml::Attributes;

/// What the factory produced for a start tag
#[derive(Debug, Clone, PartialEq)]
pub enum Created {
    /// A new node to push and later attach to its parent
    Node(Element),
    /// A grouping tag (`resources`); its children attach to the enclosing node
    Passthrough,
    /// A data row (`vertex`, `triangle`), appended by the reader to its parent's buffer
    DataRow(ElementKind),
    /// An unrecognized tag; it and its subtree are dropped
    Unknown,
}

/// Create the node for `tag`
///
/// `parent` is the nearest enclosing node, used to allocate an id for an
/// `object` that does not declare one.
pub fn create(parent: Option<&Element>, tag: &str, attrs: &Attributes) -> Result<Created> {
    let Some(kind) = ElementKind::from_tag(tag) else {
        log::warn!("Unknown element <{}>, skipping it and its children", tag);
        return Ok(Created::Unknown);
    };

    let element = match kind {
        ElementKind::Model => Element::Model(create_model(attrs)?),
        ElementKind::MetaData => Element::MetaData(create_metadata(attrs)?),
        ElementKind::Resources => return Ok(Created::Passthrough),
        ElementKind::Object => Element::Object(create_object(parent, attrs)?),
        ElementKind::Mesh => Element::Mesh(Mesh::new()),
        ElementKind::Vertices => Element::Vertices(Vertices::new()),
        ElementKind::Triangles => Element::Triangles(Triangles::new()),
        ElementKind::Vertex | ElementKind::Triangle => return Ok(Created::DataRow(kind)),
        ElementKind::Build => Element::Build(Build::new()),
        ElementKind::Item => Element::Item(create_item(attrs)?),
    };
    Ok(Created::Node(element))
}

fn create_model(attrs: &Attributes) -> Result<Model> {
    let mut model = Model::new();
    if let Some(unit) = attrs.get("unit") {
        model.unit = unit.parse()?;
    }
    model.lang = attrs.get("lang").map(str::to_string);
    Ok(model)
}

fn create_metadata(attrs: &Attributes) -> Result<MetaData> {
    let name = attrs.required("metadata", "name")?;
    let value = attrs.get("val").unwrap_or_default();
    Ok(MetaData::new(name, value))
}

fn parse_resource_id(element: &str, attribute: &str, raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(Error::parse_error_with_context(
            &format!("{} {}", element, attribute),
            raw,
            "positive integer",
        )),
    }
}

fn create_object(parent: Option<&Element>, attrs: &Attributes) -> Result<ObjectResource> {
    let id = match (attrs.get("id"), parent) {
        (Some(raw), _) => parse_resource_id("object", "id", raw)?,
        (None, Some(Element::Model(model))) => {
            let id = model.generate_resource_id();
            log::debug!("Object without id, assigned id {}", id);
            id
        }
        (None, _) => return Err(Error::missing_attribute("object", "id")),
    };

    let mut object = ObjectResource::new(id);
    object.name = attrs.get("name").map(str::to_string);
    object.part_number = attrs
        .get("partnumber")
        .or_else(|| attrs.get("partNumber"))
        .map(str::to_string);
    if let Some(object_type) = attrs.get("type") {
        object.object_type = object_type.parse()?;
    }
    Ok(object)
}

fn create_item(attrs: &Attributes) -> Result<Item> {
    let raw = attrs.required("item", "objectid")?;
    Ok(Item::new(parse_resource_id("item", "objectid", raw)?))
}
