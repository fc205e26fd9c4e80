//! Shared helpers for integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use unicodeit_datagen::Dataset;

/// A directory under the system temp dir, removed on drop
pub struct TempDir {
    pub path: PathBuf,
}

impl TempDir {
    pub fn new(label: &str) -> Self {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        path.push(format!("unicodeit_datagen_{label}_{}_{}", std::process::id(), nanos));
        fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Small dataset shaped like the upstream one
pub fn sample_dataset() -> Dataset {
    Dataset::new("0.7.5")
        .with_replacements([
            ("\\longrightarrow", "\u{27f6}"),
            ("\\not{}", "\u{338}"),
            ("\\doteq", "\u{2250}"),
            ("\\{", "{"),
            ("\\#", "#"),
        ])
        .with_combining_marks([
            ("\\acute", "\u{301}"),
            ("\\grave", "\u{300}"),
            ("\\bar", "\u{305}"),
        ])
        .with_sub_super_scripts([("^\\alpha", "\u{1d45}"), ("^2", "\u{b2}"), ("_i", "\u{1d62}")])
}
