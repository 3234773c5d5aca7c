//! Shared test utilities for integration and E2E tests.
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let site = SiteFixture::new().with_plugin_marker("ai-chat", "DJJones66/BrainDriveChat", "docs");
//!     // ... test code
//! }
//! ```

use std::env;
use std::fs;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::should_skip_network_tests;
    #[allow(unused_imports)]
    pub use super::SiteFixture;
}

/// Check if network tests should be skipped.
///
/// Returns `true` if the `SKIP_NETWORK_TESTS` environment variable is set.
#[allow(dead_code)]
pub fn should_skip_network_tests() -> bool {
    env::var("SKIP_NETWORK_TESTS").is_ok()
}

/// A temporary site root, populated with content folders and marker files
/// as tests need them.
pub struct SiteFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl SiteFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a file (creating parents) relative to the site root.
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        let path = self.temp_dir.path().join(relative);
        fs::create_dir_all(path.parent().expect("file has parent")).expect("create parents");
        fs::write(path, content).expect("write file");
        self
    }

    /// Create a plugin content folder carrying the synchronizer's marker
    /// pair.
    pub fn with_plugin_marker(self, key: &str, repo: &str, edit_base: &str) -> Self {
        self.with_file(&format!("docs-plugins/{}/.repo", key), repo)
            .with_file(&format!("docs-plugins/{}/.editbase", key), edit_base)
    }

    /// Write a sources manifest and return its path as a string.
    pub fn with_manifest(self, content: &str) -> Self {
        self.with_file("sources.yaml", content)
    }

    pub fn manifest_path(&self) -> String {
        self.temp_dir
            .path()
            .join("sources.yaml")
            .to_string_lossy()
            .into_owned()
    }
}
