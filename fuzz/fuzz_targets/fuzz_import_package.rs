#![no_main]

use libfuzzer_sys::fuzz_target;
use lib3mf_import::{ImportConfig, Importer, SceneRecorder};
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    // Complete pipeline: archive extraction -> relationships -> model -> scene
    let Ok(dir) = tempfile::TempDir::new() else {
        return;
    };
    let package = dir.path().join("fuzz.3mf");
    let Ok(mut file) = std::fs::File::create(&package) else {
        return;
    };
    if file.write_all(data).is_err() {
        return;
    }

    let importer = Importer::new(ImportConfig::new().with_staging_root(dir.path()));
    let mut scene = SceneRecorder::new();
    if let Some(url) = package.to_str() {
        let _ = importer.import(url, &mut scene);
    }
});
