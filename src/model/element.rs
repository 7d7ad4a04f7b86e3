//! Typed element tree produced while reading a model document

use super::buffers::{Triangles, Vertices};
use super::core::{Build, Item, Mesh, MetaData, Model, ModelResource, ObjectResource};

/// Every element name of the core model schema understood by the reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// `<model>`
    Model,
    /// `<metadata>`
    MetaData,
    /// `<resources>`, a grouping tag without a node of its own
    Resources,
    /// `<object>`
    Object,
    /// `<mesh>`
    Mesh,
    /// `<vertices>`
    Vertices,
    /// `<vertex>`, a data row of the enclosing vertex list
    Vertex,
    /// `<triangles>`
    Triangles,
    /// `<triangle>`, a data row of the enclosing triangle list
    Triangle,
    /// `<build>`
    Build,
    /// `<item>`
    Item,
}

impl ElementKind {
    /// All element kinds
    pub const ALL: [ElementKind; 11] = [
        ElementKind::Model,
        ElementKind::MetaData,
        ElementKind::Resources,
        ElementKind::Object,
        ElementKind::Mesh,
        ElementKind::Vertices,
        ElementKind::Vertex,
        ElementKind::Triangles,
        ElementKind::Triangle,
        ElementKind::Build,
        ElementKind::Item,
    ];

    /// Look up the kind for a local element name
    pub fn from_tag(tag: &str) -> Option<Self> {
        ElementKind::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// The local element name
    pub fn tag(&self) -> &'static str {
        match self {
            ElementKind::Model => "model",
            ElementKind::MetaData => "metadata",
            ElementKind::Resources => "resources",
            ElementKind::Object => "object",
            ElementKind::Mesh => "mesh",
            ElementKind::Vertices => "vertices",
            ElementKind::Vertex => "vertex",
            ElementKind::Triangles => "triangles",
            ElementKind::Triangle => "triangle",
            ElementKind::Build => "build",
            ElementKind::Item => "item",
        }
    }

    /// Whether the tag is a data row appended to its parent's buffer
    pub fn is_data_row(&self) -> bool {
        matches!(self, ElementKind::Vertex | ElementKind::Triangle)
    }
}

/// A node of the element tree that can adopt closed child elements
pub trait ModelElement {
    /// Kind of this node
    fn element_kind(&self) -> ElementKind;

    /// Take ownership of a child that just closed
    ///
    /// Children of a kind this node does not hold are dropped. For the
    /// single-valued slots (a mesh's vertex list, an object's mesh) the
    /// last child wins.
    fn add_child(&mut self, child: Element);
}

/// An element-tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Document root
    Model(Model),
    /// Metadata entry
    MetaData(MetaData),
    /// Object resource
    Object(ObjectResource),
    /// Mesh of an object
    Mesh(Mesh),
    /// Vertex list of a mesh
    Vertices(Vertices),
    /// Triangle list of a mesh
    Triangles(Triangles),
    /// Build section
    Build(Build),
    /// Build item
    Item(Item),
}

impl Element {
    /// Unwrap the document root
    pub fn into_model(self) -> Option<Model> {
        match self {
            Element::Model(model) => Some(model),
            _ => None,
        }
    }
}

fn dropped(parent: ElementKind, child: &Element) {
    log::debug!(
        "Dropping <{}> child of <{}>",
        child.element_kind().tag(),
        parent.tag()
    );
}

impl ModelElement for Element {
    fn element_kind(&self) -> ElementKind {
        match self {
            Element::Model(model) => model.element_kind(),
            Element::MetaData(entry) => entry.element_kind(),
            Element::Object(object) => object.element_kind(),
            Element::Mesh(mesh) => mesh.element_kind(),
            Element::Vertices(vertices) => vertices.element_kind(),
            Element::Triangles(triangles) => triangles.element_kind(),
            Element::Build(build) => build.element_kind(),
            Element::Item(item) => item.element_kind(),
        }
    }

    fn add_child(&mut self, child: Element) {
        match self {
            Element::Model(model) => model.add_child(child),
            Element::MetaData(entry) => entry.add_child(child),
            Element::Object(object) => object.add_child(child),
            Element::Mesh(mesh) => mesh.add_child(child),
            Element::Vertices(vertices) => vertices.add_child(child),
            Element::Triangles(triangles) => triangles.add_child(child),
            Element::Build(build) => build.add_child(child),
            Element::Item(item) => item.add_child(child),
        }
    }
}

impl ModelElement for Model {
    fn element_kind(&self) -> ElementKind {
        ElementKind::Model
    }

    fn add_child(&mut self, child: Element) {
        match child {
            Element::Object(object) => self.add_resource(ModelResource::Object(object)),
            Element::Build(build) => self.set_build(build),
            Element::MetaData(entry) => self.add_metadata(entry),
            other => dropped(ElementKind::Model, &other),
        }
    }
}

impl ModelElement for ObjectResource {
    fn element_kind(&self) -> ElementKind {
        ElementKind::Object
    }

    fn add_child(&mut self, child: Element) {
        match child {
            Element::Mesh(mesh) => self.mesh = Some(mesh),
            other => dropped(ElementKind::Object, &other),
        }
    }
}

impl ModelElement for Mesh {
    fn element_kind(&self) -> ElementKind {
        ElementKind::Mesh
    }

    fn add_child(&mut self, child: Element) {
        match child {
            Element::Vertices(vertices) => self.vertices = Some(vertices),
            Element::Triangles(triangles) => self.triangles = Some(triangles),
            other => dropped(ElementKind::Mesh, &other),
        }
    }
}

impl ModelElement for Build {
    fn element_kind(&self) -> ElementKind {
        ElementKind::Build
    }

    fn add_child(&mut self, child: Element) {
        match child {
            Element::Item(item) => self.items.push(item),
            other => dropped(ElementKind::Build, &other),
        }
    }
}

macro_rules! leaf_element {
    ($ty:ty, $kind:expr) => {
        impl ModelElement for $ty {
            fn element_kind(&self) -> ElementKind {
                $kind
            }

            fn add_child(&mut self, child: Element) {
                dropped($kind, &child);
            }
        }
    };
}

leaf_element!(Vertices, ElementKind::Vertices);
leaf_element!(Triangles, ElementKind::Triangles);
leaf_element!(Item, ElementKind::Item);
leaf_element!(MetaData, ElementKind::MetaData);
