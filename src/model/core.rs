//! Core 3MF types and structures

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

use super::buffers::{Triangles, Vertices};

/// Unit of measurement declared on the `model` element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Unit {
    /// 1e-6 meter
    Micron,
    /// 1e-3 meter
    #[default]
    Millimeter,
    /// 1e-2 meter
    Centimeter,
    /// 0.0254 meter
    Inch,
    /// 0.3048 meter
    Foot,
    /// 1 meter
    Meter,
}

impl Unit {
    /// All supported units
    pub const ALL: [Unit; 6] = [
        Unit::Micron,
        Unit::Millimeter,
        Unit::Centimeter,
        Unit::Inch,
        Unit::Foot,
        Unit::Meter,
    ];

    /// The name used in the `unit` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Micron => "micron",
            Unit::Millimeter => "millimeter",
            Unit::Centimeter => "centimeter",
            Unit::Inch => "inch",
            Unit::Foot => "foot",
            Unit::Meter => "meter",
        }
    }

    /// Length of one unit in meters
    pub fn scale(&self) -> f64 {
        match self {
            Unit::Micron => 1e-6,
            Unit::Millimeter => 1e-3,
            Unit::Centimeter => 1e-2,
            Unit::Inch => 0.0254,
            Unit::Foot => 0.3048,
            Unit::Meter => 1.0,
        }
    }
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Unit::ALL
            .into_iter()
            .find(|unit| unit.as_str() == s)
            .ok_or_else(|| Error::UnknownUnit(s.to_string()))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type of an object resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectType {
    /// A regular model object
    #[default]
    Model,
    /// A support structure
    Support,
    /// A solid support structure
    SolidSupport,
    /// A surface object
    Surface,
    /// Other type
    Other,
}

impl FromStr for ObjectType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "model" => Ok(ObjectType::Model),
            "support" => Ok(ObjectType::Support),
            "solidsupport" => Ok(ObjectType::SolidSupport),
            "surface" => Ok(ObjectType::Surface),
            "other" => Ok(ObjectType::Other),
            _ => Err(Error::InvalidXml(format!(
                "Invalid object type '{}'. Must be one of: model, support, solidsupport, surface, other",
                s
            ))),
        }
    }
}

/// A triangle mesh owning at most one vertex list and one triangle list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions
    pub vertices: Option<Vertices>,
    /// Triangle indices
    pub triangles: Option<Triangles>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices, zero when the mesh has no vertex list
    pub fn vertex_count(&self) -> usize {
        self.vertices.as_ref().map_or(0, Vertices::count)
    }

    /// Number of triangles, zero when the mesh has no triangle list
    pub fn triangle_count(&self) -> usize {
        self.triangles.as_ref().map_or(0, Triangles::count)
    }
}

/// An object resource (`<object>`)
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectResource {
    /// Unique resource id
    pub id: u32,
    /// Optional object name
    pub name: Option<String>,
    /// Optional part number
    pub part_number: Option<String>,
    /// Object type
    pub object_type: ObjectType,
    /// Mesh geometry
    pub mesh: Option<Mesh>,
}

impl ObjectResource {
    /// Create a new object resource
    pub fn new(id: u32) -> Self {
        Self {
            id,
            name: None,
            part_number: None,
            object_type: ObjectType::Model,
            mesh: None,
        }
    }
}

/// Any resource addressable by a unique id
#[derive(Debug, Clone, PartialEq)]
pub enum ModelResource {
    /// An object with optional mesh geometry
    Object(ObjectResource),
}

impl ModelResource {
    /// The resource id
    pub fn id(&self) -> u32 {
        match self {
            ModelResource::Object(object) => object.id,
        }
    }

    /// The object, if this resource is one
    pub fn as_object(&self) -> Option<&ObjectResource> {
        match self {
            ModelResource::Object(object) => Some(object),
        }
    }
}

/// Build item instantiating an object in the assembled scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Id of the referenced object resource
    pub object_id: u32,
}

impl Item {
    /// Create a new build item
    pub fn new(object_id: u32) -> Self {
        Self { object_id }
    }
}

/// Build section listing the items to instantiate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Build {
    /// Items in document order
    pub items: Vec<Item>,
}

impl Build {
    /// Create a new empty build
    pub fn new() -> Self {
        Self::default()
    }
}

/// Metadata `(name, value)` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaData {
    /// Metadata name
    pub name: String,
    /// Metadata value
    pub value: String,
}

impl MetaData {
    /// Create a new metadata entry
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Root of a parsed 3MF model document
///
/// Resources are kept both in document order and in an id lookup. A
/// duplicate id keeps both resources in order while the lookup points at the
/// later one. Metadata follows the same rule keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    /// Unit of measurement
    pub unit: Unit,
    /// Language of the document, read from the `xml:lang` attribute
    ///
    /// Older importers filled this field from the `unit` attribute, so a
    /// model in inches reported a language of `"inch"`. Here it is `None`
    /// unless the root element declares `xml:lang`.
    pub lang: Option<String>,
    resources: Vec<ModelResource>,
    resource_index: HashMap<u32, usize>,
    build: Option<Build>,
    metadata: Vec<MetaData>,
    metadata_index: HashMap<String, usize>,
}

impl Model {
    /// Create a new empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource, replacing the lookup entry of an earlier resource with the same id
    pub fn add_resource(&mut self, resource: ModelResource) {
        let id = resource.id();
        if self.resource_index.contains_key(&id) {
            log::debug!("Resource id {} declared more than once, later one wins", id);
        }
        self.resource_index.insert(id, self.resources.len());
        self.resources.push(resource);
    }

    /// Next resource id by counting existing resources
    ///
    /// This does not search for a free id, so it can collide with an
    /// explicitly authored id that was declared out of order.
    pub fn generate_resource_id(&self) -> u32 {
        self.resources.len() as u32 + 1
    }

    /// Look up a resource by id
    pub fn resource(&self, id: u32) -> Option<&ModelResource> {
        self.resource_index
            .get(&id)
            .and_then(|&index| self.resources.get(index))
    }

    /// Look up an object resource by id
    pub fn object(&self, id: u32) -> Option<&ObjectResource> {
        self.resource(id).and_then(ModelResource::as_object)
    }

    /// All resources in document order, duplicates included
    pub fn resources(&self) -> &[ModelResource] {
        &self.resources
    }

    /// Set the build section
    pub fn set_build(&mut self, build: Build) {
        self.build = Some(build);
    }

    /// The build section, if the document has one
    pub fn build(&self) -> Option<&Build> {
        self.build.as_ref()
    }

    /// Add a metadata entry
    pub fn add_metadata(&mut self, entry: MetaData) {
        self.metadata_index
            .insert(entry.name.clone(), self.metadata.len());
        self.metadata.push(entry);
    }

    /// All metadata entries in document order, duplicates included
    pub fn metadata(&self) -> &[MetaData] {
        &self.metadata
    }

    /// Get the value of the last metadata entry with this name
    pub fn metadata_value(&self, name: &str) -> Option<&str> {
        self.metadata_index
            .get(name)
            .and_then(|&index| self.metadata.get(index))
            .map(|entry| entry.value.as_str())
    }
}
