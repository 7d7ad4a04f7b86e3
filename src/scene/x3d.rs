//! X3D XML encoding of an emitted scene

use crate::error::{Error, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use std::io::Write;

use super::{ContentSink, FieldValue};

/// X3D version written in the document header
const X3D_VERSION: &str = "3.3";

/// Default `containerField` of a node type when used as a child
fn default_container(node_type: &str) -> &'static str {
    match node_type {
        "Appearance" => "appearance",
        "Material" => "material",
        "Coordinate" => "coord",
        "IndexedTriangleSet" | "IndexedFaceSet" | "TriangleSet" | "Box" | "Sphere" => "geometry",
        _ => "children",
    }
}

fn format_values(value: &FieldValue<'_>) -> String {
    match value {
        FieldValue::Floats(values) => values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" "),
        FieldValue::Ints(values) => values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" "),
    }
}

#[derive(Debug)]
struct PendingNode {
    node_type: String,
    def: Option<String>,
    container: String,
    field: Option<String>,
    attributes: Vec<(String, String)>,
    children: Vec<PendingNode>,
}

/// A sink writing the scene as an X3D XML document
///
/// Nodes are buffered until the document ends because X3D carries numeric
/// fields as attributes of the start tag.
pub struct X3dWriter<W: Write> {
    xml: Writer<W>,
    source: Option<String>,
    profile: String,
    stack: Vec<PendingNode>,
    scene: Vec<PendingNode>,
}

impl<W: Write> X3dWriter<W> {
    /// Create a writer producing indented XML
    pub fn new(writer: W) -> Self {
        Self {
            xml: Writer::new_with_indent(writer, b' ', 2),
            source: None,
            profile: "Full".to_string(),
            stack: Vec::new(),
            scene: Vec::new(),
        }
    }

    /// Consume the sink, returning the underlying writer
    pub fn into_inner(self) -> W {
        self.xml.into_inner()
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.xml
            .write_event(event)
            .map_err(|e| Error::Sink(format!("Failed to write X3D: {}", e)))
    }

    fn top(&mut self, call: &str) -> Result<&mut PendingNode> {
        self.stack
            .last_mut()
            .ok_or_else(|| Error::Sink(format!("{} called with no open node", call)))
    }

    fn write_node(&mut self, node: &PendingNode) -> Result<()> {
        let mut start = BytesStart::new(node.node_type.as_str());
        if let Some(def) = &node.def {
            start.push_attribute(("DEF", def.as_str()));
        }
        if node.container != default_container(&node.node_type) {
            start.push_attribute(("containerField", node.container.as_str()));
        }
        for (name, value) in &node.attributes {
            start.push_attribute((name.as_str(), value.as_str()));
        }

        if node.children.is_empty() {
            return self.write(Event::Empty(start));
        }
        self.write(Event::Start(start))?;
        for child in &node.children {
            self.write_node(child)?;
        }
        self.write(Event::End(BytesEnd::new(node.node_type.as_str())))
    }
}

impl<W: Write> ContentSink for X3dWriter<W> {
    fn start_document(&mut self, url: &str) -> Result<()> {
        self.source = Some(url.to_string());
        self.stack.clear();
        self.scene.clear();
        Ok(())
    }

    fn profile_decl(&mut self, profile: &str) -> Result<()> {
        self.profile = profile.to_string();
        Ok(())
    }

    fn start_node(&mut self, node_type: &str, def: Option<&str>) -> Result<()> {
        let container = self
            .stack
            .last()
            .and_then(|parent| parent.field.clone())
            .unwrap_or_else(|| default_container(node_type).to_string());
        self.stack.push(PendingNode {
            node_type: node_type.to_string(),
            def: def.map(str::to_string),
            container,
            field: None,
            attributes: Vec::new(),
            children: Vec::new(),
        });
        Ok(())
    }

    fn start_field(&mut self, name: &str) -> Result<()> {
        self.top("start_field")?.field = Some(name.to_string());
        Ok(())
    }

    fn field_value(&mut self, value: FieldValue<'_>) -> Result<()> {
        let node = self.top("field_value")?;
        let field = node
            .field
            .take()
            .ok_or_else(|| Error::Sink("field_value called with no selected field".to_string()))?;
        node.attributes.push((field, format_values(&value)));
        Ok(())
    }

    fn end_field(&mut self) -> Result<()> {
        self.top("end_field")?.field = None;
        Ok(())
    }

    fn end_node(&mut self) -> Result<()> {
        let node = self
            .stack
            .pop()
            .ok_or_else(|| Error::Sink("end_node called with no open node".to_string()))?;
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.scene.push(node),
        }
        Ok(())
    }

    fn end_document(&mut self) -> Result<()> {
        if !self.stack.is_empty() {
            return Err(Error::Sink(format!(
                "end_document called with {} open node(s)",
                self.stack.len()
            )));
        }

        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("X3D");
        root.push_attribute(("profile", self.profile.as_str()));
        root.push_attribute(("version", X3D_VERSION));
        self.write(Event::Start(root))?;

        if let Some(source) = self.source.clone() {
            self.write(Event::Start(BytesStart::new("head")))?;
            let mut meta = BytesStart::new("meta");
            meta.push_attribute(("name", "source"));
            meta.push_attribute(("content", source.as_str()));
            self.write(Event::Empty(meta))?;
            self.write(Event::End(BytesEnd::new("head")))?;
        }

        self.write(Event::Start(BytesStart::new("Scene")))?;
        let scene = std::mem::take(&mut self.scene);
        for node in &scene {
            self.write_node(node)?;
        }
        self.write(Event::End(BytesEnd::new("Scene")))?;
        self.write(Event::End(BytesEnd::new("X3D")))?;

        self.xml
            .get_mut()
            .flush()
            .map_err(|e| Error::Sink(format!("Failed to flush X3D output: {}", e)))
    }
}
