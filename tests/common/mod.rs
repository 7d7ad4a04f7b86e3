//! Shared helpers for integration tests: building 3MF packages on disk

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::PathBuf;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub const MODEL_REL_TYPE: &str = "http://schemas.microsoft.com/3dmanufacturing/2013/01/3dmodel";

pub const CONTENT_TYPES: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="model" ContentType="application/vnd.ms-package.3dmanufacturing-3dmodel+xml"/>
</Types>"##;

/// `_rels/.rels` pointing the model relationship at `target`
pub fn rels_for(target: &str) -> String {
    format!(
        r##"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Target="{}" Id="rel0" Type="{}"/>
</Relationships>"##,
        target, MODEL_REL_TYPE
    )
}

/// Model document wrapping `body` in a `model` element of the given unit
pub fn model_xml(unit: &str, body: &str) -> String {
    format!(
        r##"<?xml version="1.0" encoding="UTF-8"?>
<model unit="{}" xml:lang="en-US" xmlns="http://schemas.microsoft.com/3dmanufacturing/core/2015/02">
{}
</model>"##,
        unit, body
    )
}

/// A square of 4 vertices and 2 triangles, placed by one build item
pub fn quad_model(unit: &str) -> String {
    model_xml(
        unit,
        r##"  <metadata name="Title">Quad</metadata>
  <resources>
    <object id="1" name="Quad" type="model">
      <mesh>
        <vertices>
          <vertex x="0" y="0" z="0"/>
          <vertex x="10" y="0" z="0"/>
          <vertex x="10" y="10" z="0"/>
          <vertex x="0" y="10" z="0"/>
        </vertices>
        <triangles>
          <triangle v1="0" v2="1" v3="2"/>
          <triangle v1="0" v2="2" v3="3"/>
        </triangles>
      </mesh>
    </object>
  </resources>
  <build>
    <item objectid="1"/>
  </build>"##,
    )
}

/// ZIP archive bytes holding `entries`
pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// A scratch area holding a package file and a staging root
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("staging")).unwrap();
        Self { dir }
    }

    /// Directory staging directories are created in
    pub fn staging_root(&self) -> PathBuf {
        self.dir.path().join("staging")
    }

    /// Number of staging directories created so far
    pub fn staged_count(&self) -> usize {
        std::fs::read_dir(self.staging_root()).unwrap().count()
    }

    /// Write a package with `entries` and return its path as a string
    pub fn package(&self, name: &str, entries: &[(&str, &str)]) -> String {
        let path = self.dir.path().join(name);
        std::fs::write(&path, zip_bytes(entries)).unwrap();
        path.to_str().unwrap().to_string()
    }

    /// Write a standard package whose model part is `model`
    pub fn model_package(&self, name: &str, model: &str) -> String {
        let rels = rels_for("/3D/3dmodel.model");
        self.package(
            name,
            &[
                ("[Content_Types].xml", CONTENT_TYPES),
                ("_rels/.rels", &rels),
                ("3D/3dmodel.model", model),
            ],
        )
    }
}
