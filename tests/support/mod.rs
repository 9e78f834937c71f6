#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use assist_pipeline::{
    DirEntry, Host, HostError, HostNotification, HostRequest, HostResponse,
};
use async_trait::async_trait;

/// In-memory host: a file tree plus a record of everything sent to it.
#[derive(Default)]
pub struct FakeHost {
    state: Mutex<FakeHostState>,
}

#[derive(Default)]
struct FakeHostState {
    roots: Vec<PathBuf>,
    /// Directory listings in insertion order.
    directories: BTreeMap<PathBuf, Vec<DirEntry>>,
    files: BTreeMap<PathBuf, String>,
    unreadable: HashSet<PathBuf>,
    notifications: Vec<HostNotification>,
    requests: Vec<HostRequest>,
    call_results: VecDeque<Result<HostResponse, HostError>>,
    listed: Vec<PathBuf>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host with one workspace root at `/work`.
    pub fn with_root() -> Self {
        let host = Self::new();
        host.add_root("/work");
        host
    }

    pub fn add_root(&self, root: impl Into<PathBuf>) {
        let root = root.into();
        let mut state = lock_unpoisoned(&self.state);
        state.directories.entry(root.clone()).or_default();
        state.roots.push(root);
    }

    /// Adds a file, creating every missing parent directory entry.
    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = path.as_ref().to_path_buf();
        let mut state = lock_unpoisoned(&self.state);
        state.link_parents(&path, false);
        state.files.insert(path, content.to_string());
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut state = lock_unpoisoned(&self.state);
        state.link_parents(&path, true);
        state.directories.entry(path).or_default();
    }

    /// Makes reads of `path` fail, as a permission error would.
    pub fn make_unreadable(&self, path: impl AsRef<Path>) {
        lock_unpoisoned(&self.state)
            .unreadable
            .insert(path.as_ref().to_path_buf());
    }

    /// Queues the outcome of the next `call`. Unscripted calls succeed.
    pub fn push_call_result(&self, result: Result<HostResponse, HostError>) {
        lock_unpoisoned(&self.state).call_results.push_back(result);
    }

    pub fn notifications(&self) -> Vec<HostNotification> {
        lock_unpoisoned(&self.state).notifications.clone()
    }

    pub fn requests(&self) -> Vec<HostRequest> {
        lock_unpoisoned(&self.state).requests.clone()
    }

    /// Directories listed so far, in call order.
    pub fn listed(&self) -> Vec<PathBuf> {
        lock_unpoisoned(&self.state).listed.clone()
    }
}

impl FakeHostState {
    fn link_parents(&mut self, path: &Path, is_dir: bool) {
        let mut child = path.to_path_buf();
        let mut child_is_dir = is_dir;
        while let Some(parent) = child.parent().map(Path::to_path_buf) {
            if parent.as_os_str().is_empty() {
                break;
            }
            let Some(name) = child.file_name().and_then(|name| name.to_str()) else {
                break;
            };
            let entries = self.directories.entry(parent.clone()).or_default();
            if !entries.iter().any(|entry| entry.name == name) {
                entries.push(if child_is_dir {
                    DirEntry::directory(name)
                } else {
                    DirEntry::file(name)
                });
            }
            if self.roots.contains(&parent) {
                break;
            }
            child = parent;
            child_is_dir = true;
        }
    }
}

#[async_trait]
impl Host for FakeHost {
    async fn read_directory(&self, path: &Path) -> Result<Vec<DirEntry>, HostError> {
        let mut state = lock_unpoisoned(&self.state);
        state.listed.push(path.to_path_buf());
        if state.unreadable.contains(path) {
            return Err(permission_denied("reading directory", path));
        }
        state
            .directories
            .get(path)
            .cloned()
            .ok_or_else(|| not_found("reading directory", path))
    }

    async fn read_file(&self, path: &Path) -> Result<String, HostError> {
        let state = lock_unpoisoned(&self.state);
        if state.unreadable.contains(path) {
            return Err(permission_denied("reading file", path));
        }
        state
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found("reading file", path))
    }

    async fn list_workspace_roots(&self) -> Result<Vec<PathBuf>, HostError> {
        Ok(lock_unpoisoned(&self.state).roots.clone())
    }

    fn notify(&self, notification: HostNotification) {
        lock_unpoisoned(&self.state).notifications.push(notification);
    }

    async fn call(&self, request: HostRequest) -> Result<HostResponse, HostError> {
        let mut state = lock_unpoisoned(&self.state);
        state.requests.push(request);
        state
            .call_results
            .pop_front()
            .unwrap_or(Ok(HostResponse::Dispatched))
    }
}

fn permission_denied(operation: &'static str, path: &Path) -> HostError {
    HostError::io(
        operation,
        path,
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
    )
}

fn not_found(operation: &'static str, path: &Path) -> HostError {
    HostError::io(
        operation,
        path,
        std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
    )
}

pub fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
