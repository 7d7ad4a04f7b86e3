//! # lib3mf-import
//!
//! A pure Rust importer for 3MF (3D Manufacturing Format) packages.
//!
//! A 3MF file is a ZIP container following the Open Packaging Conventions
//! (OPC). Importing one happens in three steps:
//!
//! 1. The package is extracted into a uniquely named staging directory and
//!    its `_rels/.rels` part is read to find the 3D model document.
//! 2. The model document is parsed in one streaming pass into a [`Model`]
//!    holding objects, meshes, build items and metadata.
//! 3. The model is emitted into a [`ContentSink`] as a triangle-mesh scene,
//!    scaled from the model's unit to meters and rotated from Z-up to Y-up.
//!
//! ## Features
//!
//! - Pure Rust implementation with no unsafe code
//! - Core 3MF elements: model, resources, object, mesh, vertices,
//!   triangles, build, item and metadata
//! - Scene output through a sink trait, with an X3D writer and a recorder
//!   included
//!
//! ## Example
//!
//! ```no_run
//! use lib3mf_import::{ImportConfig, Importer, SceneRecorder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let importer = Importer::new(ImportConfig::new());
//!
//! let model = importer.read_model("model.3mf")?;
//! println!("Model contains {} resources", model.resources().len());
//!
//! let mut scene = SceneRecorder::new();
//! importer.import("model.3mf", &mut scene)?;
//! println!("Scene has {} shapes", scene.nodes("Shape").len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod import;
pub mod model;
pub mod opc;
pub mod parser;
pub mod scene;
pub mod xml;

pub use config::ImportConfig;
pub use error::{Error, Result};
pub use import::Importer;
pub use model::{
    Build, Element, ElementKind, Item, Mesh, MetaData, Model, ModelElement, ModelResource,
    ObjectResource, ObjectType, Triangles, Unit, Vertices,
};
pub use opc::StagedPackage;
pub use parser::{parse_model, parse_model_file, parse_model_xml};
pub use scene::{ContentSink, FieldValue, SceneEmitter, SceneEvent, SceneRecorder, X3dWriter};
