//! Stack-based reader turning model-document events into an element tree

use crate::error::{Error, Result};
use crate::model::*;
use crate::xml::{Attributes, XmlHandler};

use super::factory::{self, Created};

#[derive(Debug)]
enum Frame {
    Node {
        element: Element,
        // metadata without a `val` attribute takes its value from text content
        collects_text: bool,
    },
    Passthrough,
    Unknown,
}

/// Consumes XML events of a model document and builds its element tree
///
/// Structural elements get a stack frame and are attached to their parent
/// when they close. `vertex` and `triangle` rows never get a frame: they are
/// appended straight to the vertex or triangle list on top of the stack.
#[derive(Debug, Default)]
pub struct DocumentReader {
    stack: Vec<Frame>,
    root: Option<Element>,
    root_depth: Option<usize>,
}

impl DocumentReader {
    /// Create a reader with an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nesting depth
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The first node produced by the document, once it has closed
    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    /// Consume the reader, returning the document's model
    pub fn into_model(self) -> Result<Model> {
        self.root
            .and_then(Element::into_model)
            .ok_or_else(|| {
                Error::invalid_format_context("Model document", "no <model> root element")
            })
    }

    fn parent_element(&self) -> Option<&Element> {
        for frame in self.stack.iter().rev() {
            match frame {
                Frame::Node { element, .. } => return Some(element),
                Frame::Passthrough => continue,
                Frame::Unknown => return None,
            }
        }
        None
    }

    fn attach(&mut self, child: Element) {
        for frame in self.stack.iter_mut().rev() {
            match frame {
                Frame::Node { element, .. } => {
                    element.add_child(child);
                    return;
                }
                Frame::Passthrough => continue,
                Frame::Unknown => break,
            }
        }
        log::debug!(
            "Dropping <{}> outside of the model tree",
            child.element_kind().tag()
        );
    }

    fn append_row(&mut self, kind: ElementKind, attrs: &Attributes) -> Result<()> {
        match (kind, self.stack.last_mut()) {
            (
                ElementKind::Vertex,
                Some(Frame::Node {
                    element: Element::Vertices(vertices),
                    ..
                }),
            ) => vertices.add_vertex(attrs),
            (
                ElementKind::Triangle,
                Some(Frame::Node {
                    element: Element::Triangles(triangles),
                    ..
                }),
            ) => triangles.add_triangle(attrs),
            _ => {
                log::warn!("Ignoring <{}> row outside of its list", kind.tag());
                Ok(())
            }
        }
    }
}

impl XmlHandler for DocumentReader {
    fn start_document(&mut self) -> Result<()> {
        self.stack.clear();
        self.root = None;
        self.root_depth = None;
        Ok(())
    }

    fn end_document(&mut self) -> Result<()> {
        self.stack.clear();
        Ok(())
    }

    fn start_element(&mut self, name: &str, attrs: &Attributes) -> Result<()> {
        let row = ElementKind::from_tag(name).filter(ElementKind::is_data_row);

        // everything below an unknown element is skipped unread
        if matches!(self.stack.last(), Some(Frame::Unknown)) {
            if row.is_none() {
                self.stack.push(Frame::Unknown);
            }
            return Ok(());
        }

        if let Some(kind) = row {
            return self.append_row(kind, attrs);
        }

        let frame = match factory::create(self.parent_element(), name, attrs)? {
            Created::Node(element) => {
                if self.root_depth.is_none() {
                    self.root_depth = Some(self.stack.len());
                }
                let collects_text =
                    matches!(element, Element::MetaData(_)) && attrs.get("val").is_none();
                Frame::Node {
                    element,
                    collects_text,
                }
            }
            Created::Passthrough => Frame::Passthrough,
            Created::Unknown | Created::DataRow(_) => Frame::Unknown,
        };
        self.stack.push(frame);
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> Result<()> {
        if ElementKind::from_tag(name).is_some_and(|kind| kind.is_data_row()) {
            return Ok(());
        }

        let Some(frame) = self.stack.pop() else {
            log::debug!("Unmatched </{}> ignored", name);
            return Ok(());
        };

        if let Frame::Node {
            mut element,
            collects_text,
        } = frame
        {
            if let (Element::MetaData(entry), true) = (&mut element, collects_text) {
                entry.value = entry.value.trim().to_string();
            }
            if self.root.is_none() && self.root_depth == Some(self.stack.len()) {
                self.root = Some(element);
            } else {
                self.attach(element);
            }
        }
        Ok(())
    }

    fn characters(&mut self, text: &str) -> Result<()> {
        if let Some(Frame::Node {
            element: Element::MetaData(entry),
            collects_text: true,
        }) = self.stack.last_mut()
        {
            entry.value.push_str(text);
        }
        Ok(())
    }
}
