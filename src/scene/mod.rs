//! Scene output
//!
//! A parsed model is pushed into a [`ContentSink`] as a stream of node and
//! field calls. [`SceneRecorder`] keeps those calls as values and
//! [`X3dWriter`] serializes them as an X3D document.

mod emitter;
mod x3d;

pub use emitter::{AVATAR_SIZE, PROFILE, SceneEmitter};
pub use x3d::X3dWriter;

use crate::error::Result;
use std::borrow::Cow;

/// A numeric field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    /// Floating-point values (coordinates, scales, rotations)
    Floats(Cow<'a, [f32]>),
    /// Integer values (triangle indices)
    Ints(Cow<'a, [u32]>),
}

impl<'a> FieldValue<'a> {
    /// Borrow a float slice
    pub fn floats(values: &'a [f32]) -> Self {
        FieldValue::Floats(Cow::Borrowed(values))
    }

    /// Borrow an integer slice
    pub fn ints(values: &'a [u32]) -> Self {
        FieldValue::Ints(Cow::Borrowed(values))
    }

    /// Number of values
    pub fn len(&self) -> usize {
        match self {
            FieldValue::Floats(values) => values.len(),
            FieldValue::Ints(values) => values.len(),
        }
    }

    /// Check if the value holds no numbers
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The float values, if this is a float field
    pub fn as_floats(&self) -> Option<&[f32]> {
        match self {
            FieldValue::Floats(values) => Some(&values[..]),
            FieldValue::Ints(_) => None,
        }
    }

    /// The integer values, if this is an integer field
    pub fn as_ints(&self) -> Option<&[u32]> {
        match self {
            FieldValue::Ints(values) => Some(&values[..]),
            FieldValue::Floats(_) => None,
        }
    }

    /// Copy borrowed values so the value outlives its source
    pub fn into_owned(self) -> FieldValue<'static> {
        match self {
            FieldValue::Floats(values) => FieldValue::Floats(Cow::Owned(values.into_owned())),
            FieldValue::Ints(values) => FieldValue::Ints(Cow::Owned(values.into_owned())),
        }
    }
}

/// Destination of an emitted scene
///
/// Node-valued and numeric fields both open with `start_field`. Only
/// multi-node fields (such as `children`) are closed with `end_field`.
pub trait ContentSink {
    /// Begin a scene converted from `url`
    fn start_document(&mut self, url: &str) -> Result<()>;

    /// Declare the profile the scene conforms to
    fn profile_decl(&mut self, profile: &str) -> Result<()>;

    /// Open a node, optionally naming it with a `DEF` name
    fn start_node(&mut self, node_type: &str, def: Option<&str>) -> Result<()>;

    /// Select a field of the open node
    fn start_field(&mut self, name: &str) -> Result<()>;

    /// Set the value of the selected field
    fn field_value(&mut self, value: FieldValue<'_>) -> Result<()>;

    /// Close a multi-node field
    fn end_field(&mut self) -> Result<()>;

    /// Close the open node
    fn end_node(&mut self) -> Result<()>;

    /// Finish the scene
    fn end_document(&mut self) -> Result<()>;
}

/// One recorded sink call
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// `start_document`
    StartDocument(String),
    /// `profile_decl`
    ProfileDecl(String),
    /// `start_node`
    StartNode {
        /// Node type name
        node_type: String,
        /// `DEF` name
        def: Option<String>,
    },
    /// `start_field`
    StartField(String),
    /// `field_value`
    FieldValue(FieldValue<'static>),
    /// `end_field`
    EndField,
    /// `end_node`
    EndNode,
    /// `end_document`
    EndDocument,
}

/// A sink that records every call it receives
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneRecorder {
    events: Vec<SceneEvent>,
}

impl SceneRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded calls in order
    pub fn events(&self) -> &[SceneEvent] {
        &self.events
    }

    /// Take the recorded calls
    pub fn into_events(self) -> Vec<SceneEvent> {
        self.events
    }

    /// `DEF` names of every node of `node_type`, in emission order
    pub fn nodes(&self, node_type: &str) -> Vec<Option<&str>> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SceneEvent::StartNode { node_type: t, def } if t == node_type => {
                    Some(def.as_deref())
                }
                _ => None,
            })
            .collect()
    }

    /// Every value set on a field named `field`, in emission order
    pub fn values(&self, field: &str) -> Vec<&FieldValue<'static>> {
        self.events
            .windows(2)
            .filter_map(|pair| match pair {
                [SceneEvent::StartField(name), SceneEvent::FieldValue(value)] if name == field => {
                    Some(value)
                }
                _ => None,
            })
            .collect()
    }
}

impl ContentSink for SceneRecorder {
    fn start_document(&mut self, url: &str) -> Result<()> {
        self.events.push(SceneEvent::StartDocument(url.to_string()));
        Ok(())
    }

    fn profile_decl(&mut self, profile: &str) -> Result<()> {
        self.events.push(SceneEvent::ProfileDecl(profile.to_string()));
        Ok(())
    }

    fn start_node(&mut self, node_type: &str, def: Option<&str>) -> Result<()> {
        self.events.push(SceneEvent::StartNode {
            node_type: node_type.to_string(),
            def: def.map(str::to_string),
        });
        Ok(())
    }

    fn start_field(&mut self, name: &str) -> Result<()> {
        self.events.push(SceneEvent::StartField(name.to_string()));
        Ok(())
    }

    fn field_value(&mut self, value: FieldValue<'_>) -> Result<()> {
        self.events.push(SceneEvent::FieldValue(value.into_owned()));
        Ok(())
    }

    fn end_field(&mut self) -> Result<()> {
        self.events.push(SceneEvent::EndField);
        Ok(())
    }

    fn end_node(&mut self) -> Result<()> {
        self.events.push(SceneEvent::EndNode);
        Ok(())
    }

    fn end_document(&mut self) -> Result<()> {
        self.events.push(SceneEvent::EndDocument);
        Ok(())
    }
}
