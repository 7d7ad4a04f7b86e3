//! Integration tests for lib3mf-import
//!
//! These tests write real 3MF packages to disk and import them end to end.

mod common;

use common::{CONTENT_TYPES, Workspace, model_xml, quad_model, rels_for};
use lib3mf_import::{Error, ImportConfig, Importer, SceneEvent, SceneRecorder, Unit, X3dWriter};

fn importer(ws: &Workspace) -> Importer {
    Importer::new(ImportConfig::new().with_staging_root(ws.staging_root()))
}

#[test]
fn test_import_centimeter_quad() {
    let ws = Workspace::new();
    let url = ws.model_package("quad.3mf", &quad_model("centimeter"));

    let mut scene = SceneRecorder::new();
    importer(&ws).import(&url, &mut scene).unwrap();

    assert_eq!(scene.nodes("Transform"), vec![Some("CENTIMETER_TRANS")]);
    let scale = scene.values("scale");
    assert_eq!(scale.len(), 1);
    assert_eq!(scale[0].as_floats(), Some(&[0.01f32, 0.01, 0.01][..]));

    assert_eq!(scene.nodes("Shape"), vec![Some("OBJ_1")]);
    let point = scene.values("point");
    assert_eq!(
        point[0].as_floats().unwrap(),
        &[0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 10.0, 10.0, 0.0, 0.0, 10.0, 0.0]
    );
    let index = scene.values("index");
    assert_eq!(index[0].as_ints().unwrap(), &[0, 1, 2, 0, 2, 3]);

    assert_eq!(
        scene.events().first(),
        Some(&SceneEvent::StartDocument(url.clone()))
    );
    assert_eq!(scene.events().last(), Some(&SceneEvent::EndDocument));
}

#[test]
fn test_read_model_details() {
    let ws = Workspace::new();
    let url = ws.model_package("quad.3mf", &quad_model("inch"));

    let model = importer(&ws).read_model(&url).unwrap();
    assert_eq!(model.unit, Unit::Inch);
    assert_eq!(model.lang.as_deref(), Some("en-US"));
    assert_eq!(model.metadata_value("Title"), Some("Quad"));

    let object = model.object(1).unwrap();
    assert_eq!(object.name.as_deref(), Some("Quad"));
    let mesh = object.mesh.as_ref().unwrap();
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.triangle_count(), 2);
}

#[test]
fn test_malformed_vertex_emits_nothing() {
    let ws = Workspace::new();
    let model = model_xml(
        "millimeter",
        r#"<resources><object id="1"><mesh><vertices>
  <vertex x="0" y="0" z="0"/>
  <vertex y="1" z="0"/>
</vertices></mesh></object></resources>
<build><item objectid="1"/></build>"#,
    );
    let url = ws.model_package("bad.3mf", &model);

    let mut scene = SceneRecorder::new();
    let err = importer(&ws).import(&url, &mut scene).unwrap_err();
    assert!(matches!(err, Error::InvalidXml(_)), "{}", err);
    assert!(scene.events().is_empty());

    let model = model_xml(
        "millimeter",
        r#"<resources><object id="1"><mesh><vertices>
  <vertex x="zero" y="0" z="0"/>
</vertices></mesh></object></resources>"#,
    );
    let url = ws.model_package("nan.3mf", &model);
    let err = importer(&ws).import(&url, &mut scene).unwrap_err();
    assert!(matches!(err, Error::ParseError(_)), "{}", err);
    assert!(scene.events().is_empty());
}

#[test]
fn test_unresolved_item_fails_import() {
    let ws = Workspace::new();
    let model = model_xml(
        "millimeter",
        r#"<resources><object id="1"/></resources>
<build><item objectid="1"/><item objectid="7"/></build>"#,
    );
    let url = ws.model_package("dangling.3mf", &model);

    let mut scene = SceneRecorder::new();
    let err = importer(&ws).import(&url, &mut scene).unwrap_err();
    assert!(matches!(err, Error::InvalidModel(_)));
    assert!(scene.events().is_empty());
}

#[test]
fn test_unknown_unit_fails_import() {
    let ws = Workspace::new();
    let url = ws.model_package("cubit.3mf", &quad_model("cubit"));

    let mut scene = SceneRecorder::new();
    let err = importer(&ws).import(&url, &mut scene).unwrap_err();
    assert!(matches!(err, Error::UnknownUnit(ref unit) if unit == "cubit"));
    assert!(scene.events().is_empty());
}

#[test]
fn test_duplicate_object_ids_keep_both_resources() {
    let ws = Workspace::new();
    let model = model_xml(
        "meter",
        r#"<resources>
  <object id="3" name="first"/>
  <object id="3" name="second"/>
</resources>
<build><item objectid="3"/></build>"#,
    );
    let url = ws.model_package("dup.3mf", &model);

    let model = importer(&ws).read_model(&url).unwrap();
    assert_eq!(model.resources().len(), 2);
    assert_eq!(model.object(3).unwrap().name.as_deref(), Some("second"));
}

#[test]
fn test_unknown_elements_are_skipped() {
    let ws = Workspace::new();
    let model = model_xml(
        "millimeter",
        r##"<resources>
  <basematerials id="9"><base name="Red" displaycolor="#FF0000"/></basematerials>
  <object id="1"><mesh>
    <vertices><vertex x="1" y="2" z="3"/></vertices>
    <triangles><triangle v1="0" v2="0" v3="0"/></triangles>
  </mesh></object>
</resources>
<build><item objectid="1"/></build>"##,
    );
    let url = ws.model_package("materials.3mf", &model);

    let mut scene = SceneRecorder::new();
    importer(&ws).import(&url, &mut scene).unwrap();
    assert_eq!(scene.nodes("Shape"), vec![Some("OBJ_1")]);
    assert_eq!(scene.values("point")[0].as_floats().unwrap(), &[1.0, 2.0, 3.0]);
}

#[test]
fn test_slice_stack_with_two_dimensional_vertices_is_skipped() {
    let ws = Workspace::new();
    let model = model_xml(
        "millimeter",
        r#"<metadata name="Title">Nuts &amp; Bolts</metadata>
<resources>
  <s:slicestack xmlns:s="http://schemas.microsoft.com/3dmanufacturing/slice/2015/07" id="2" zbottom="0">
    <s:slice ztop="0.1">
      <s:vertices><s:vertex x="0" y="0"/><s:vertex x="4" y="0"/><s:vertex x="4" y="4"/></s:vertices>
      <s:polygon startv="0"><s:segment v2="1"/><s:segment v2="2"/><s:segment v2="0"/></s:polygon>
    </s:slice>
  </s:slicestack>
  <object id="1"><mesh>
    <vertices><vertex x="1" y="2" z="3"/></vertices>
    <triangles><triangle v1="0" v2="0" v3="0"/></triangles>
  </mesh></object>
</resources>
<build><item objectid="1"/></build>"#,
    );
    let url = ws.model_package("sliced.3mf", &model);

    let parsed = importer(&ws).read_model(&url).unwrap();
    assert_eq!(parsed.resources().len(), 1);
    assert_eq!(parsed.metadata_value("Title"), Some("Nuts & Bolts"));

    let mut scene = SceneRecorder::new();
    importer(&ws).import(&url, &mut scene).unwrap();
    assert_eq!(scene.nodes("Shape"), vec![Some("OBJ_1")]);
}

#[test]
fn test_missing_rels_is_import_error() {
    let ws = Workspace::new();
    let model = quad_model("millimeter");
    let url = ws.package("norels.3mf", &[("3D/3dmodel.model", &model)]);

    let err = importer(&ws).read_model(&url).unwrap_err();
    match err {
        Error::Import { source, .. } => assert!(matches!(*source, Error::MissingFile(_))),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_truncated_rels_is_import_error() {
    let ws = Workspace::new();
    let model = quad_model("millimeter");
    let url = ws.package(
        "truncated.3mf",
        &[
            ("[Content_Types].xml", CONTENT_TYPES),
            (
                "_rels/.rels",
                "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\"><Relationship Target=\"/3D/3dmodel.model\"",
            ),
            ("3D/3dmodel.model", &model),
        ],
    );

    let err = importer(&ws).read_model(&url).unwrap_err();
    match err {
        Error::Import { url: failed, source } => {
            assert_eq!(failed, url);
            match *source {
                Error::UnreadablePart { part, .. } => assert_eq!(part, "_rels/.rels"),
                other => panic!("unexpected cause: {}", other),
            }
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_no_model_relationship_is_invalid_format() {
    let ws = Workspace::new();
    let rels = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Target="/Metadata/thumbnail.png" Id="rel1" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/thumbnail"/>
</Relationships>"#;
    let model = quad_model("millimeter");
    let url = ws.package(
        "nomodel.3mf",
        &[("_rels/.rels", rels), ("3D/3dmodel.model", &model)],
    );

    let err = importer(&ws).read_model(&url).unwrap_err();
    assert!(matches!(err, Error::InvalidFormat(_)), "{}", err);
}

#[test]
fn test_relationship_target_not_in_archive() {
    let ws = Workspace::new();
    let rels = rels_for("/3D/elsewhere.model");
    let model = quad_model("millimeter");
    let url = ws.package(
        "moved.3mf",
        &[("_rels/.rels", &rels), ("3D/3dmodel.model", &model)],
    );

    let err = importer(&ws).read_model(&url).unwrap_err();
    match err {
        Error::Import { source, .. } => assert!(matches!(*source, Error::MissingFile(_))),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_percent_encoded_model_target() {
    let ws = Workspace::new();
    let rels = rels_for("/2D/test%C3%86file.model");
    let model = quad_model("millimeter");
    let url = ws.package(
        "encoded.3mf",
        &[
            ("[Content_Types].xml", CONTENT_TYPES),
            ("_rels/.rels", &rels),
            ("2D/testÆfile.model", &model),
        ],
    );

    let model = importer(&ws).read_model(&url).unwrap();
    assert!(model.object(1).is_some());
}

#[test]
fn test_non_file_url_is_unsupported() {
    let ws = Workspace::new();
    let mut scene = SceneRecorder::new();
    let err = importer(&ws)
        .import("http://example.com/part.3mf", &mut scene)
        .unwrap_err();

    assert!(matches!(err, Error::Unsupported(_)));
    assert_eq!(ws.staged_count(), 0);
}

#[test]
fn test_file_url_is_accepted() {
    let ws = Workspace::new();
    let path = ws.model_package("quad.3mf", &quad_model("millimeter"));
    let url = format!("file://{}", path);

    let model = importer(&ws).read_model(&url).unwrap();
    assert_eq!(model.unit, Unit::Millimeter);
}

#[test]
fn test_not_a_zip_is_import_error() {
    let ws = Workspace::new();
    let path = ws.dir.path().join("plain.3mf");
    std::fs::write(&path, "this is not an archive").unwrap();

    let err = importer(&ws).read_model(path.to_str().unwrap()).unwrap_err();
    match err {
        Error::Import { source, .. } => assert!(matches!(*source, Error::Zip(_))),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_repeated_imports_are_identical() {
    let ws = Workspace::new();
    let url = ws.model_package("quad.3mf", &quad_model("foot"));
    let importer = importer(&ws);

    let first = importer.read_model(&url).unwrap();
    let second = importer.read_model(&url).unwrap();
    assert_eq!(first, second);

    let mut a = SceneRecorder::new();
    let mut b = SceneRecorder::new();
    importer.import(&url, &mut a).unwrap();
    importer.import(&url, &mut b).unwrap();
    assert_eq!(a, b);

    // every import stages into its own directory
    assert_eq!(ws.staged_count(), 4);
}

#[test]
fn test_cleanup_removes_staging_directory() {
    let ws = Workspace::new();
    let url = ws.model_package("quad.3mf", &quad_model("millimeter"));

    let importer = Importer::new(
        ImportConfig::new()
            .with_staging_root(ws.staging_root())
            .with_cleanup(true),
    );
    let mut scene = SceneRecorder::new();
    importer.import(&url, &mut scene).unwrap();
    importer.read_model(&url).unwrap();

    assert_eq!(ws.staged_count(), 0);
}

#[test]
fn test_failed_import_leaves_staging_directory() {
    let ws = Workspace::new();
    let url = ws.model_package("cubit.3mf", &quad_model("cubit"));

    let importer = Importer::new(
        ImportConfig::new()
            .with_staging_root(ws.staging_root())
            .with_cleanup(true),
    );
    assert!(importer.read_model(&url).is_err());
    assert_eq!(ws.staged_count(), 1);
}

#[test]
fn test_import_to_x3d() {
    let ws = Workspace::new();
    let url = ws.model_package("quad.3mf", &quad_model("millimeter"));

    let mut writer = X3dWriter::new(Vec::new());
    importer(&ws).import(&url, &mut writer).unwrap();
    let xml = String::from_utf8(writer.into_inner()).unwrap();

    assert!(xml.contains("<Transform DEF=\"MILLIMETER_TRANS\" scale=\"0.001 0.001 0.001\""));
    assert!(xml.contains("<Shape DEF=\"OBJ_1\">"));
    assert!(xml.contains("index=\"0 1 2 0 2 3\""));
}
