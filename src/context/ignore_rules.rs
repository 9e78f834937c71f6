use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::ContextReadError;

/// Directories never worth describing to a model.
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    ".git/",
    ".svn/",
    ".hg/",
    ".vscode/",
    ".idea/",
    ".vs/",
    "node_modules/",
    "bower_components/",
    "venv/",
    ".venv/",
    "env/",
    "__pycache__/",
    ".pytest_cache/",
    ".mypy_cache/",
    ".gradle/",
    ".next/",
    ".nuxt/",
    ".cache/",
    ".turbo/",
    "dist/",
    "build/",
    "out/",
    "target/",
    "bin/",
    "obj/",
    "coverage/",
    "vendor/",
];

/// Binary, generated and lock files.
pub const DEFAULT_IGNORE_FILES: &[&str] = &[
    ".DS_Store",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "*.log",
    "*.png",
    "*.jpg",
    "*.jpeg",
    "*.gif",
    "*.ico",
    "*.svg",
    "*.webp",
    "*.mp3",
    "*.mp4",
    "*.mov",
    "*.wav",
    "*.pdf",
    "*.zip",
    "*.gz",
    "*.tar",
    "*.tgz",
    "*.rar",
    "*.7z",
    "*.dmg",
    "*.exe",
    "*.dll",
    "*.so",
    "*.dylib",
    "*.a",
    "*.o",
    "*.obj",
    "*.lib",
    "*.class",
    "*.jar",
    "*.pyc",
    "*.woff",
    "*.woff2",
    "*.ttf",
    "*.eot",
    "*.db",
    "*.sqlite",
    "*.bin",
    "*.min.js",
    "*.min.css",
    "*.map",
];

/// Ignore rules resolved for exactly one directory.
///
/// Holds the baked-in defaults plus the patterns of that directory's own
/// `.gitignore`. Nothing is inherited from parent directories.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    dir: PathBuf,
    matcher: Gitignore,
}

impl IgnoreRules {
    /// Defaults only.
    pub fn defaults(dir: &Path) -> Self {
        Self::for_directory(dir, None)
    }

    /// Defaults merged with the content of `dir/.gitignore`, when present.
    ///
    /// Invalid `.gitignore` lines are logged and skipped.
    pub fn for_directory(dir: &Path, gitignore: Option<&str>) -> Self {
        let mut builder = GitignoreBuilder::new(dir);
        for pattern in DEFAULT_IGNORE_DIRS.iter().chain(DEFAULT_IGNORE_FILES) {
            if let Err(error) = builder.add_line(None, pattern) {
                tracing::warn!(%error, pattern, "skipping built-in ignore pattern");
            }
        }

        if let Some(content) = gitignore {
            let gitignore_path = dir.join(".gitignore");
            for pattern in gitignore_patterns(content) {
                if let Err(error) = builder.add_line(Some(gitignore_path.clone()), pattern) {
                    let skipped = ContextReadError::IgnorePattern {
                        path: gitignore_path.clone(),
                        pattern: pattern.to_string(),
                        message: error.to_string(),
                    };
                    tracing::warn!(error = %skipped, "skipping ignore pattern");
                }
            }
        }

        let matcher = match builder.build() {
            Ok(matcher) => matcher,
            Err(error) => {
                tracing::warn!(%error, dir = %dir.display(), "ignore rules unavailable");
                Gitignore::empty()
            }
        };

        Self {
            dir: dir.to_path_buf(),
            matcher,
        }
    }

    /// Returns whether the entry `name` of this directory is excluded.
    pub fn is_ignored(&self, name: &str, is_dir: bool) -> bool {
        self.matcher
            .matched(self.dir.join(name), is_dir)
            .is_ignore()
    }
}

/// Patterns of a `.gitignore` file: trimmed lines, minus blanks and comments.
pub fn gitignore_patterns(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}
