mod support;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use assist_pipeline::{DirectoryWalker, ProjectContextCollector};
use pretty_assertions::assert_eq;

use support::FakeHost;

async fn relative_paths(host: Arc<FakeHost>) -> Vec<String> {
    DirectoryWalker::new(host)
        .walk(Path::new("/work"))
        .await
        .into_iter()
        .map(|entry| entry.relative_path.display().to_string())
        .collect()
}

#[tokio::test]
async fn readme_below_depth_limit_is_never_read() {
    let host = Arc::new(FakeHost::with_root());
    host.add_file("/work/a/b/c/readme.md", "too deep");
    host.add_file("/work/a/b/readme.md", "deep enough");

    let digest = ProjectContextCollector::new(host.clone())
        .collect(Path::new("/work"))
        .await;

    assert_eq!(
        digest,
        "\nFolder: a\n\nFolder: a/b\n\nFolder: a/b/c\nREADME for a/b/readme.md:\ndeep enough\n\n"
    );
    assert!(!digest.contains("too deep"));
    assert!(!host.listed().contains(&PathBuf::from("/work/a/b/c")));
}

#[tokio::test]
async fn gitignore_excludes_matching_entries_and_their_subtrees() {
    let host = Arc::new(FakeHost::with_root());
    host.add_file("/work/.gitignore", "# local\nsecrets/\n*.env\n");
    host.add_file("/work/secrets/README.md", "hidden");
    host.add_file("/work/prod.env", "TOKEN=1");
    host.add_file("/work/docs/README.md", "docs");

    let paths = relative_paths(host.clone()).await;

    assert_eq!(paths, vec![".gitignore", "docs", "docs/README.md"]);
    assert!(!host.listed().contains(&PathBuf::from("/work/secrets")));
}

#[tokio::test]
async fn gitignore_applies_only_to_its_own_directory() {
    let host = Arc::new(FakeHost::with_root());
    host.add_file("/work/pkg/.gitignore", "notes.md\n");
    host.add_file("/work/pkg/notes.md", "x");
    host.add_file("/work/notes.md", "y");

    let paths = relative_paths(host).await;

    assert_eq!(paths, vec!["pkg", "pkg/.gitignore", "notes.md"]);
}

#[tokio::test]
async fn default_rules_skip_dependency_and_build_directories() {
    let host = Arc::new(FakeHost::with_root());
    host.add_file("/work/node_modules/left-pad/package.json", "{}");
    host.add_file("/work/target/debug/build.log", "");
    host.add_file("/work/package.json", "{\"name\":\"web\"}");

    let digest = ProjectContextCollector::new(host)
        .collect(Path::new("/work"))
        .await;

    assert_eq!(digest, "package.json for package.json:\n{\"name\":\"web\"}\n\n");
}

#[tokio::test]
async fn unreadable_entries_are_skipped_and_traversal_continues() {
    let host = Arc::new(FakeHost::with_root());
    host.add_file("/work/locked/README.md", "locked");
    host.add_file("/work/README.md", "top");
    host.add_file("/work/svc/go.mod", "module svc");
    host.make_unreadable("/work/README.md");
    host.make_unreadable("/work/locked");

    let digest = ProjectContextCollector::new(host)
        .collect(Path::new("/work"))
        .await;

    assert_eq!(
        digest,
        "\nFolder: locked\n\nFolder: svc\ngo.mod for svc/go.mod:\nmodule svc\n\n"
    );
}

#[tokio::test]
async fn listing_order_is_preserved() {
    let host = Arc::new(FakeHost::with_root());
    host.add_file("/work/zeta/Gemfile", "z");
    host.add_file("/work/alpha/Gemfile", "a");

    let first = relative_paths(host.clone()).await;
    let second = relative_paths(host).await;

    assert_eq!(first, vec!["zeta", "zeta/Gemfile", "alpha", "alpha/Gemfile"]);
    assert_eq!(first, second);
}

#[tokio::test]
async fn walker_depth_is_configurable() {
    let host = Arc::new(FakeHost::with_root());
    host.add_file("/work/a/b/Cargo.toml", "");

    let entries = DirectoryWalker::new(host)
        .with_max_depth(0)
        .walk(Path::new("/work"))
        .await;

    let names: Vec<_> = entries.iter().map(|entry| entry.name.as_str()).collect();
    assert_eq!(names, vec!["a"]);
    assert_eq!(entries[0].depth, 0);
}
