#![no_main]

use libfuzzer_sys::fuzz_target;
use lib3mf_import::{SceneEmitter, SceneRecorder};

fuzz_target!(|data: &[u8]| {
    // Streaming reader and element tree on arbitrary model documents
    if let Ok(model) = lib3mf_import::parse_model(data) {
        // A parsed model either emits fully or fails before the first sink call
        let mut scene = SceneRecorder::new();
        if SceneEmitter::new(&mut scene).emit("fuzz.3mf", &model).is_err() {
            assert!(scene.events().is_empty());
        }
    }
});
