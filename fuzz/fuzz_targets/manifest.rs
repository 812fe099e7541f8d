#![no_main]

use libfuzzer_sys::fuzz_target;
use mkgen::{Manifest, Session};

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // Any manifest that validates must render without panicking
        if let Ok(manifest) = Manifest::from_json(s) {
            let session = Session::default();
            for project in &manifest.projects {
                let _ = session.render_project(project);
            }
            let _ = session.makefile_paths(&manifest);
        }
    }
});
