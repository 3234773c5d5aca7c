//! Integration tests across the synchronizer and the edit-URL resolver:
//! the marker files one writes are the contract the other reads. The
//! post-clone pipeline is driven directly against plain directories, so
//! none of these tests need git or network access.

use std::fs;
use std::path::Path;

use docsite::config::{CopyStrategy, SourceSpec};
use docsite::edit_url::{self, DocRef};
use docsite::sync::populate_from_checkout;
use docsite::{config, markers};
use tempfile::TempDir;

fn touch(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn spec(key: &str, repo: &str, dest: &str) -> SourceSpec {
    serde_yaml::from_str(&format!("key: {key}\nrepo: {repo}\ndest: {dest}\n")).unwrap()
}

/// Sync two plugin checkouts with different layouts, then resolve edit
/// URLs for both through the markers they left behind.
#[test]
fn synced_plugins_resolve_to_their_upstreams() {
    let temp = TempDir::new().unwrap();
    let site = temp.path().join("site");

    // One plugin ships a docs/ folder, the other keeps Markdown at its root
    let with_docs = temp.path().join("checkout-a");
    touch(&with_docs.join("docs/getting-started.md"), "# Start\n");
    let root_only = temp.path().join("checkout-b");
    touch(&root_only.join("README.md"), "# Readme\n");

    let a = spec("ai-chat", "DJJones66/BrainDriveChat", "docs-plugins/ai-chat");
    let b = spec(
        "settings-plugin",
        "BrainDriveAI/BrainDrive-Settings-Plugin",
        "docs-plugins/brain-drive-settings-plugin",
    );

    assert_eq!(
        populate_from_checkout(&a, &with_docs, &site).unwrap(),
        Some(CopyStrategy::Docs)
    );
    assert_eq!(
        populate_from_checkout(&b, &root_only, &site).unwrap(),
        Some(CopyStrategy::Root)
    );

    let site_config = config::default_site();
    let plugins = site_config.collection("plugins").unwrap();
    let resolver = edit_url::resolver_for(&site_config, plugins, &site).unwrap();

    // docs-based plugin: the docs/ prefix is restored
    assert_eq!(
        resolver
            .resolve(&DocRef::path("ai-chat/getting-started.md"))
            .unwrap(),
        "https://github.com/DJJones66/BrainDriveChat/edit/main/docs/getting-started.md"
    );

    // root-based plugin: the path maps through unchanged
    assert_eq!(
        resolver
            .resolve(&DocRef::path("brain-drive-settings-plugin/README.md"))
            .unwrap(),
        "https://github.com/BrainDriveAI/BrainDrive-Settings-Plugin/edit/main/README.md"
    );

    // a folder nobody synced still gets a working link
    assert_eq!(
        resolver
            .resolve(&DocRef::path("unregistered-plugin/readme.md"))
            .unwrap(),
        "https://github.com/BrainDriveAI/BrainDrive-Docs-Site/edit/main/docs-plugins/unregistered-plugin/readme.md"
    );
}

/// Root-strategy copies never let a disallowed or excluded file through,
/// regardless of nesting depth.
#[test]
fn root_copy_filter_holds_at_depth() {
    let temp = TempDir::new().unwrap();
    let site = temp.path().join("site");
    let checkout = temp.path().join("checkout");

    touch(&checkout.join("README.md"), "# Readme\n");
    touch(&checkout.join("a/b/c/deep.md"), "deep\n");
    touch(&checkout.join("a/b/c/build.gradle"), "code");
    touch(&checkout.join("a/secrets/plan.md"), "internal\n");
    touch(&checkout.join("assets/logo.svg"), "<svg/>");

    let mut spec = spec("demo", "example/demo", "docs-demo");
    spec.exclude = vec!["a/secrets/**".to_string()];
    populate_from_checkout(&spec, &checkout, &site).unwrap();

    let dest = site.join("docs-demo");
    assert!(dest.join("README.md").exists());
    assert!(dest.join("a/b/c/deep.md").exists());
    assert!(dest.join("assets/logo.svg").exists());
    assert!(!dest.join("a/b/c/build.gradle").exists());
    assert!(!dest.join("a/secrets/plan.md").exists());

    // And nothing outside the allowed set is anywhere in the tree
    for entry in walkdir::WalkDir::new(&dest) {
        let entry = entry.unwrap();
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == markers::EDIT_BASE_FILE || name == markers::REPO_FILE {
            continue;
        }
        let ext = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        assert!(
            docsite::sync::copy::ALLOWED_EXTENSIONS.contains(&ext.as_str()),
            "unexpected file in destination: {}",
            entry.path().display()
        );
    }
}

/// Two runs against the same checkout leave byte-identical destinations,
/// markers included.
#[test]
fn repeated_sync_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let site = temp.path().join("site");
    let checkout = temp.path().join("checkout");
    touch(&checkout.join("docs/intro.md"), "speed <100ms\n");
    touch(&checkout.join("docs/guide.md"), "[l](LICENSE)\n");

    let spec = spec("core", "BrainDriveAI/BrainDrive-Core", "docs-core");

    let snapshot = |dir: &Path| {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.unwrap();
            if entry.file_type().is_file() {
                files.push((
                    entry.path().to_path_buf(),
                    fs::read(entry.path()).unwrap(),
                ));
            }
        }
        files
    };

    populate_from_checkout(&spec, &checkout, &site).unwrap();
    let first = snapshot(&site.join("docs-core"));
    populate_from_checkout(&spec, &checkout, &site).unwrap();
    let second = snapshot(&site.join("docs-core"));

    assert_eq!(first, second);
    // Sanitization ran on the copies
    let guide = fs::read_to_string(site.join("docs-core/guide.md")).unwrap();
    assert_eq!(
        guide,
        "[l](https://github.com/BrainDriveAI/BrainDrive-Core/blob/main/LICENSE)\n"
    );
}
