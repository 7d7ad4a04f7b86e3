//! Scene emitter: walks a parsed model and pushes a triangle-mesh scene

use crate::error::{Error, Result};
use crate::model::{Model, ObjectResource};

use super::{ContentSink, FieldValue};

/// Profile declared by every emitted scene
pub const PROFILE: &str = "Interchange";

/// Avatar size of the emitted navigation info
pub const AVATAR_SIZE: [f32; 3] = [0.1, 1.6, 0.75];

/// Rotation turning the Z-up model space into a Y-up scene (-90 degrees about X)
const Z_UP_TO_Y_UP: [f32; 4] = [1.0, 0.0, 0.0, -std::f32::consts::FRAC_PI_2];

/// Emits a parsed model into a content sink
///
/// The scene is a navigation info node followed by one transform that
/// scales model units to meters and rotates Z-up to Y-up. Each build item
/// becomes a shape holding the referenced object's mesh as authored.
pub struct SceneEmitter<'s, S: ContentSink + ?Sized> {
    sink: &'s mut S,
}

impl<'s, S: ContentSink + ?Sized> SceneEmitter<'s, S> {
    /// Create an emitter writing to `sink`
    pub fn new(sink: &'s mut S) -> Self {
        Self { sink }
    }

    /// Emit `model`, converted from `url`
    ///
    /// Every build item is resolved before the first sink call, so an item
    /// referencing an unknown object fails without emitting anything.
    pub fn emit(&mut self, url: &str, model: &Model) -> Result<()> {
        let objects = resolve_items(model)?;
        let scale = model.unit.scale() as f32;
        let transform_name = format!("{}_TRANS", model.unit.as_str().to_uppercase());

        self.sink.start_document(url)?;
        self.sink.profile_decl(PROFILE)?;

        self.sink.start_node("NavigationInfo", None)?;
        self.sink.start_field("avatarSize")?;
        self.sink.field_value(FieldValue::floats(&AVATAR_SIZE))?;
        self.sink.end_node()?;

        self.sink.start_node("Transform", Some(transform_name.as_str()))?;
        self.sink.start_field("scale")?;
        self.sink.field_value(FieldValue::floats(&[scale, scale, scale]))?;
        self.sink.start_field("rotation")?;
        self.sink.field_value(FieldValue::floats(&Z_UP_TO_Y_UP))?;
        self.sink.start_field("children")?;
        for object in objects {
            self.emit_shape(object)?;
        }
        self.sink.end_field()?;
        self.sink.end_node()?;

        self.sink.end_document()
    }

    fn emit_shape(&mut self, object: &ObjectResource) -> Result<()> {
        let (points, indices) = match &object.mesh {
            Some(mesh) => (
                mesh.vertices.as_ref().map_or(&[][..], |v| v.coordinates()),
                mesh.triangles.as_ref().map_or(&[][..], |t| t.indices()),
            ),
            None => (&[][..], &[][..]),
        };

        let shape_name = format!("OBJ_{}", object.id);
        self.sink.start_node("Shape", Some(shape_name.as_str()))?;

        self.sink.start_field("appearance")?;
        self.sink.start_node("Appearance", None)?;
        self.sink.start_field("material")?;
        self.sink.start_node("Material", None)?;
        self.sink.end_node()?;
        self.sink.end_node()?;

        self.sink.start_field("geometry")?;
        self.sink.start_node("IndexedTriangleSet", None)?;
        self.sink.start_field("coord")?;
        self.sink.start_node("Coordinate", None)?;
        self.sink.start_field("point")?;
        self.sink.field_value(FieldValue::floats(points))?;
        self.sink.end_node()?;
        self.sink.start_field("index")?;
        self.sink.field_value(FieldValue::ints(indices))?;
        self.sink.end_node()?;

        self.sink.end_node()
    }
}

fn resolve_items(model: &Model) -> Result<Vec<&ObjectResource>> {
    let Some(build) = model.build() else {
        return Ok(Vec::new());
    };
    build
        .items
        .iter()
        .map(|item| {
            model.object(item.object_id).ok_or_else(|| {
                Error::InvalidModel(format!(
                    "Build item references object {} which is not a resource of the model",
                    item.object_id
                ))
            })
        })
        .collect()
}
