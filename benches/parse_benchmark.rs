use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lib3mf_import::{ImportConfig, Importer, SceneEmitter, SceneRecorder, parse_model_xml};
use std::fmt::Write as _;
use std::hint::black_box;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Generate model document XML with a specified number of vertices and triangles
fn generate_model_xml(vertices: usize, triangles: usize) -> String {
    let mut model_xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<model unit="millimeter" xml:lang="en-US" xmlns="http://schemas.microsoft.com/3dmanufacturing/core/2015/02">
    <resources>
        <object id="1" type="model">
            <mesh>
                <vertices>
"#,
    );

    // Vertices on a grid, 100 per row
    for i in 0..vertices {
        let x = (i % 100) as f32;
        let y = (i / 100) as f32;
        writeln!(
            model_xml,
            "                    <vertex x=\"{}\" y=\"{}\" z=\"0\"/>",
            x, y
        )
        .unwrap();
    }

    model_xml.push_str(
        r#"                </vertices>
                <triangles>
"#,
    );

    // each triangle needs three consecutive vertices
    let bases = vertices.saturating_sub(2);
    let triangles = if bases == 0 { 0 } else { triangles };
    for i in 0..triangles {
        let base = (i * 3) % bases;
        writeln!(
            model_xml,
            "                    <triangle v1=\"{}\" v2=\"{}\" v3=\"{}\"/>",
            base,
            base + 1,
            base + 2
        )
        .unwrap();
    }

    model_xml.push_str(
        r#"                </triangles>
            </mesh>
        </object>
    </resources>
    <build>
        <item objectid="1"/>
    </build>
</model>"#,
    );
    model_xml
}

/// Package the generated model as a 3MF file
fn generate_3mf(vertices: usize, triangles: usize) -> NamedTempFile {
    let temp_file = NamedTempFile::new().unwrap();
    let mut zip = ZipWriter::new(temp_file.reopen().unwrap());
    let options = SimpleFileOptions::default();

    let rels = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rel0" Target="/3D/3dmodel.model" Type="http://schemas.microsoft.com/3dmanufacturing/2013/01/3dmodel"/>
</Relationships>"#;

    zip.start_file("_rels/.rels", options).unwrap();
    zip.write_all(rels.as_bytes()).unwrap();

    zip.start_file("3D/3dmodel.model", options).unwrap();
    zip.write_all(generate_model_xml(vertices, triangles).as_bytes())
        .unwrap();

    zip.finish().unwrap();
    temp_file
}

fn bench_parse_model(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_model");

    for &(vertices, triangles) in &[(1000, 500), (10000, 5000), (100000, 50000)] {
        let xml = generate_model_xml(vertices, triangles);

        group.bench_with_input(
            BenchmarkId::new(
                "vertices_triangles",
                format!("{}v_{}t", vertices, triangles),
            ),
            &xml,
            |b, xml| {
                b.iter(|| black_box(parse_model_xml(xml).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_emit_scene(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit_scene");

    for &(vertices, triangles) in &[(10000, 5000), (100000, 50000)] {
        let model = parse_model_xml(&generate_model_xml(vertices, triangles)).unwrap();

        group.bench_with_input(
            BenchmarkId::new(
                "vertices_triangles",
                format!("{}v_{}t", vertices, triangles),
            ),
            &model,
            |b, model| {
                b.iter(|| {
                    let mut scene = SceneRecorder::new();
                    SceneEmitter::new(&mut scene).emit("bench.3mf", model).unwrap();
                    black_box(scene)
                });
            },
        );
    }

    group.finish();
}

fn bench_import_package(c: &mut Criterion) {
    let mut group = c.benchmark_group("import_package");
    group.sample_size(10); // Each iteration extracts the archive to disk

    let staging = TempDir::new().unwrap();
    let importer = Importer::new(
        ImportConfig::new()
            .with_staging_root(staging.path())
            .with_cleanup(true),
    );

    for &(vertices, triangles) in &[(1000, 500), (50000, 25000)] {
        let temp_file = generate_3mf(vertices, triangles);
        let url = temp_file.path().to_str().unwrap().to_string();

        group.bench_with_input(
            BenchmarkId::new(
                "vertices_triangles",
                format!("{}v_{}t", vertices, triangles),
            ),
            &url,
            |b, url| {
                b.iter(|| {
                    let mut scene = SceneRecorder::new();
                    importer.import(url, &mut scene).unwrap();
                    black_box(scene)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_model,
    bench_emit_scene,
    bench_import_package
);
criterion_main!(benches);
