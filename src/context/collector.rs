use std::path::Path;
use std::sync::Arc;

use crate::context::walker::{DirectoryWalker, WalkEntry};
use crate::error::ContextReadError;
use crate::host::Host;

/// Dependency and build manifests whose content is copied into the digest.
///
/// Entries starting with `*` match by suffix.
pub const MANIFEST_FILENAMES: &[&str] = &[
    "package.json",
    "requirements.txt",
    "Gemfile",
    "pom.xml",
    "build.gradle",
    "composer.json",
    "Cargo.toml",
    "go.mod",
    "packages.config",
    "*.csproj",
    "pubspec.yaml",
    "Project.toml",
    "mix.exs",
    "rebar.config",
    "shard.yml",
    "Package.swift",
    "dependencies.gradle",
    "Podfile",
    "*.cabal",
    "dub.json",
];

pub fn is_readme(name: &str) -> bool {
    name.eq_ignore_ascii_case("readme.md")
}

pub fn is_manifest(name: &str) -> bool {
    MANIFEST_FILENAMES
        .iter()
        .any(|pattern| match pattern.strip_prefix('*') {
            Some(suffix) => name.len() > suffix.len() && name.ends_with(suffix),
            None => name == *pattern,
        })
}

/// Builds the project digest used as onboarding prompt material.
pub struct ProjectContextCollector {
    host: Arc<dyn Host>,
    walker: DirectoryWalker,
}

impl ProjectContextCollector {
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self {
            walker: DirectoryWalker::new(Arc::clone(&host)),
            host,
        }
    }

    pub fn with_walker(host: Arc<dyn Host>, walker: DirectoryWalker) -> Self {
        Self { host, walker }
    }

    /// Walks `root` and concatenates folder markers, READMEs and manifests.
    ///
    /// Files that cannot be read are logged and left out.
    pub async fn collect(&self, root: &Path) -> String {
        let mut digest = String::new();

        for entry in self.walker.walk(root).await {
            if entry.is_directory() {
                digest.push_str(&format!("\nFolder: {}\n", entry.relative_path.display()));
                continue;
            }

            let label = if is_readme(&entry.name) {
                "README".to_string()
            } else if is_manifest(&entry.name) {
                entry.name.clone()
            } else {
                continue;
            };

            if let Some(content) = self.read_entry(&entry).await {
                digest.push_str(&format!(
                    "{label} for {}:\n{content}\n\n",
                    entry.relative_path.display()
                ));
            }
        }

        tracing::debug!(root = %root.display(), bytes = digest.len(), "project context collected");
        digest
    }

    async fn read_entry(&self, entry: &WalkEntry) -> Option<String> {
        match self.host.read_file(&entry.path).await {
            Ok(content) => Some(content),
            Err(source) => {
                let skipped = ContextReadError::ReadFile {
                    path: entry.path.clone(),
                    source,
                };
                tracing::warn!(error = %skipped, "skipping context file");
                None
            }
        }
    }
}
