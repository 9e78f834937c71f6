use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::context::ignore_rules::IgnoreRules;
use crate::error::ContextReadError;
use crate::host::{DirEntry, EntryKind, Host};

/// Deepest directory level, counted from the workspace root at 0, whose
/// entries are listed.
pub const MAX_EXPLORE_DEPTH: usize = 2;

const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// One surviving entry, in pre-order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub relative_path: PathBuf,
    pub name: String,
    pub kind: EntryKind,
    /// Depth of the directory listing this entry came from.
    pub depth: usize,
}

impl WalkEntry {
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Depth-bounded, ignore-filtered listing of a directory tree via the host.
pub struct DirectoryWalker {
    host: Arc<dyn Host>,
    max_depth: usize,
}

impl DirectoryWalker {
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self {
            host,
            max_depth: MAX_EXPLORE_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Lists `root` recursively.
    ///
    /// A directory entry is always reported; its children only when its own
    /// depth does not exceed the maximum. Listing order within a directory is
    /// the host's. Unreadable directories are logged and skipped.
    pub async fn walk(&self, root: &Path) -> Vec<WalkEntry> {
        let mut entries = Vec::new();
        self.walk_dir(root.to_path_buf(), PathBuf::new(), 0, &mut entries)
            .await;
        entries
    }

    fn walk_dir<'a>(
        &'a self,
        dir: PathBuf,
        relative_dir: PathBuf,
        depth: usize,
        out: &'a mut Vec<WalkEntry>,
    ) -> BoxFuture<'a, ()> {
        async move {
            if depth > self.max_depth {
                return;
            }

            for entry in self.filtered_entries(&dir).await {
                let path = dir.join(&entry.name);
                let relative_path = relative_dir.join(&entry.name);
                let is_directory = entry.is_directory();

                out.push(WalkEntry {
                    path: path.clone(),
                    relative_path: relative_path.clone(),
                    name: entry.name,
                    kind: entry.kind,
                    depth,
                });

                if is_directory {
                    self.walk_dir(path, relative_path, depth + 1, out).await;
                }
            }
        }
        .boxed()
    }

    /// Lists `dir` and drops entries matched by that directory's rules.
    async fn filtered_entries(&self, dir: &Path) -> Vec<DirEntry> {
        let entries = match self.host.read_directory(dir).await {
            Ok(entries) => entries,
            Err(source) => {
                let skipped = ContextReadError::ListDirectory {
                    path: dir.to_path_buf(),
                    source,
                };
                tracing::warn!(error = %skipped, "skipping directory");
                return Vec::new();
            }
        };

        let gitignore = self.read_gitignore(dir, &entries).await;
        let rules = IgnoreRules::for_directory(dir, gitignore.as_deref());

        entries
            .into_iter()
            .filter(|entry| !rules.is_ignored(&entry.name, entry.is_directory()))
            .collect()
    }

    async fn read_gitignore(&self, dir: &Path, entries: &[DirEntry]) -> Option<String> {
        let has_gitignore = entries
            .iter()
            .any(|entry| entry.name == GITIGNORE_FILE_NAME && !entry.is_directory());
        if !has_gitignore {
            return None;
        }

        let path = dir.join(GITIGNORE_FILE_NAME);
        match self.host.read_file(&path).await {
            Ok(content) => Some(content),
            Err(source) => {
                let skipped = ContextReadError::ReadFile { path, source };
                tracing::warn!(error = %skipped, "using default ignore rules");
                None
            }
        }
    }
}
