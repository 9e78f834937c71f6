//! Filesystem-backed host for running the pipeline outside an editor.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use assist_pipeline::config::DEFAULT_RUN_TIMEOUT_SEC;
use assist_pipeline::{
    DirEntry, Host, HostError, HostEvent, HostNotification, HostRequest, HostResponse, StreamId,
};
use async_trait::async_trait;
use tokio::sync::mpsc;
use wait_timeout::ChildExt;

const DEFAULT_MAX_OUTPUT_BYTES: usize = 100 * 1024;

/// Result of a terminal block run by [`LocalHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRun {
    pub command: String,
    pub ok: bool,
    pub output: String,
}

/// Host over the local filesystem rooted at one workspace directory.
///
/// Applies write straight to disk and complete immediately; the previous
/// content is kept until the diff is accepted or rejected.
pub struct LocalHost {
    workspace_root: PathBuf,
    current_file: Option<PathBuf>,
    run_timeout: Duration,
    max_output_bytes: usize,
    events: mpsc::UnboundedSender<HostEvent>,
    /// Pre-apply content per written file; `None` when the file was created.
    backups: Mutex<HashMap<PathBuf, Option<String>>>,
    runs: Mutex<Vec<CommandRun>>,
    clipboard: Mutex<Option<String>>,
}

impl LocalHost {
    /// Returns the host and the receiving end of its inbound event channel.
    pub fn new(
        workspace_root: impl AsRef<Path>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<HostEvent>), HostError> {
        let workspace_root = workspace_root.as_ref();
        let canonical_root = workspace_root
            .canonicalize()
            .map_err(|error| HostError::io("resolving workspace root", workspace_root, error))?;
        if !canonical_root.is_dir() {
            return Err(HostError::rejected(
                "open_workspace",
                format!("{} is not a directory", canonical_root.display()),
            ));
        }

        let (events, receiver) = mpsc::unbounded_channel();
        let host = Self {
            workspace_root: canonical_root,
            current_file: None,
            run_timeout: Duration::from_secs(DEFAULT_RUN_TIMEOUT_SEC),
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
            events,
            backups: Mutex::new(HashMap::new()),
            runs: Mutex::new(Vec::new()),
            clipboard: Mutex::new(None),
        };
        Ok((host, receiver))
    }

    #[must_use]
    pub fn with_current_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.current_file = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_output_bytes(mut self, max_output_bytes: usize) -> Self {
        self.max_output_bytes = max_output_bytes;
        self
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Terminal runs so far, oldest first.
    pub fn command_runs(&self) -> Vec<CommandRun> {
        lock_unpoisoned(&self.runs).clone()
    }

    pub fn clipboard(&self) -> Option<String> {
        lock_unpoisoned(&self.clipboard).clone()
    }

    /// Files with an unreviewed apply.
    pub fn pending_diffs(&self) -> Vec<PathBuf> {
        let mut paths: Vec<_> = lock_unpoisoned(&self.backups).keys().cloned().collect();
        paths.sort();
        paths
    }

    fn apply_text(&self, stream_id: StreamId, filepath: &str, text: &str) -> Result<(), HostError> {
        let path = self.resolve_write_path(filepath)?;
        let previous = match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(error) if error.kind() == io::ErrorKind::NotFound => None,
            Err(error) => return Err(HostError::io("reading file", &path, error)),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|error| HostError::io("creating directory", parent, error))?;
        }
        fs::write(&path, text).map_err(|error| HostError::io("writing file", &path, error))?;

        // A second apply before review keeps the oldest content as the backup.
        lock_unpoisoned(&self.backups)
            .entry(path.clone())
            .or_insert(previous);
        tracing::info!(%stream_id, path = %path.display(), "applied code block");

        if self
            .events
            .send(HostEvent::ApplyCompleted { stream_id })
            .is_err()
        {
            tracing::debug!(%stream_id, "no listener for apply completion");
        }
        Ok(())
    }

    fn review_diff(&self, filepath: Option<&str>, keep: bool) -> Result<(), HostError> {
        let path = self.review_target(filepath)?;
        let Some(previous) = lock_unpoisoned(&self.backups).remove(&path) else {
            tracing::debug!(path = %path.display(), "no pending diff");
            return Ok(());
        };
        if keep {
            return Ok(());
        }

        match previous {
            Some(content) => fs::write(&path, content)
                .map_err(|error| HostError::io("restoring file", &path, error)),
            None => fs::remove_file(&path)
                .map_err(|error| HostError::io("removing file", &path, error)),
        }
    }

    fn review_target(&self, filepath: Option<&str>) -> Result<PathBuf, HostError> {
        match filepath {
            Some(filepath) => self.resolve_write_path(filepath),
            None => self.current_file_path("review_diff"),
        }
    }

    fn current_file_path(&self, event: &'static str) -> Result<PathBuf, HostError> {
        let current = self
            .current_file
            .as_ref()
            .ok_or_else(|| HostError::rejected(event, "no current file is open"))?;
        self.resolve_write_path(&current.to_string_lossy())
    }

    fn run_command(&self, command: &str) -> CommandRun {
        let mut child = match Command::new("bash")
            .arg("-lc")
            .arg(command)
            .current_dir(&self.workspace_root)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(error) => {
                return CommandRun {
                    command: command.to_string(),
                    ok: false,
                    output: format!("failed to launch bash: {error}"),
                };
            }
        };

        // Drained while waiting so a chatty command cannot fill the pipe and stall.
        let stdout_reader = spawn_pipe_reader(child.stdout.take());
        let stderr_reader = spawn_pipe_reader(child.stderr.take());

        let timeout = self.run_timeout;
        let (timed_out, status) = match child.wait_timeout(timeout) {
            Ok(Some(status)) => (false, Some(status)),
            Ok(None) => {
                let _ = child.kill();
                (true, child.wait().ok())
            }
            Err(error) => {
                let _ = child.kill();
                return CommandRun {
                    command: command.to_string(),
                    ok: false,
                    output: format!("failed waiting for bash: {error}"),
                };
            }
        };

        let stdout = join_pipe_reader(stdout_reader);
        let stderr = join_pipe_reader(stderr_reader);
        let status_label = match (timed_out, status) {
            (true, _) => format!("timeout after {}s", timeout.as_secs_f64()),
            (false, Some(status)) => format_exit_status(status),
            (false, None) => "unknown".to_string(),
        };
        let output = truncate_to_byte_limit(
            format!(
                "status: {status_label}\nstdout:\n{}\nstderr:\n{}",
                String::from_utf8_lossy(&stdout),
                String::from_utf8_lossy(&stderr)
            ),
            self.max_output_bytes,
        );

        CommandRun {
            command: command.to_string(),
            ok: !timed_out && status.is_some_and(|status| status.success()),
            output,
        }
    }

    fn resolve_write_path(&self, path: &str) -> Result<PathBuf, HostError> {
        if path.trim().is_empty() {
            return Err(HostError::rejected("resolve_path", "path must not be empty"));
        }

        let candidate = {
            let path = Path::new(path);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                self.workspace_root.join(path)
            }
        };
        let parent = candidate.parent().ok_or_else(|| {
            HostError::rejected(
                "resolve_path",
                format!("{} has no parent directory", candidate.display()),
            )
        })?;

        let anchor = canonicalize_existing_ancestor(parent)?;
        if !anchor.starts_with(&self.workspace_root) {
            return Err(HostError::rejected(
                "resolve_path",
                format!("path escapes workspace root: {}", candidate.display()),
            ));
        }
        Ok(candidate)
    }
}

#[async_trait]
impl Host for LocalHost {
    async fn read_directory(&self, path: &Path) -> Result<Vec<DirEntry>, HostError> {
        let listing =
            fs::read_dir(path).map_err(|error| HostError::io("reading directory", path, error))?;

        let mut entries = Vec::new();
        for entry in listing {
            let entry = entry.map_err(|error| HostError::io("reading directory", path, error))?;
            let Ok(name) = entry.file_name().into_string() else {
                tracing::debug!(path = %entry.path().display(), "skipping non UTF-8 name");
                continue;
            };
            let is_dir = entry
                .file_type()
                .map_err(|error| HostError::io("reading file type", entry.path(), error))?
                .is_dir();
            entries.push(if is_dir {
                DirEntry::directory(name)
            } else {
                DirEntry::file(name)
            });
        }
        entries.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(entries)
    }

    async fn read_file(&self, path: &Path) -> Result<String, HostError> {
        fs::read_to_string(path).map_err(|error| HostError::io("reading file", path, error))
    }

    async fn list_workspace_roots(&self) -> Result<Vec<PathBuf>, HostError> {
        Ok(vec![self.workspace_root.clone()])
    }

    fn notify(&self, notification: HostNotification) {
        let event = notification.event_name();
        let result = match notification {
            HostNotification::ApplyToFile {
                stream_id,
                filepath,
                text,
            } => match filepath {
                Some(filepath) => self.apply_text(stream_id, &filepath, &text),
                None => self
                    .current_file_path(event)
                    .and_then(|path| self.apply_text(stream_id, &path.to_string_lossy(), &text)),
            },
            HostNotification::AcceptDiff { filepath } => self.review_diff(filepath.as_deref(), true),
            HostNotification::RejectDiff { filepath } => {
                self.review_diff(filepath.as_deref(), false)
            }
            HostNotification::RunCommand { command } => {
                let run = self.run_command(&command);
                tracing::info!(command = %run.command, ok = run.ok, "terminal block finished");
                lock_unpoisoned(&self.runs).push(run);
                Ok(())
            }
            HostNotification::CopyText { text } => {
                *lock_unpoisoned(&self.clipboard) = Some(text);
                Ok(())
            }
            other => {
                let payload = serde_json::to_string(&other).unwrap_or_default();
                tracing::info!(event, %payload, "host notification");
                Ok(())
            }
        };

        if let Err(error) = result {
            tracing::warn!(event, %error, "host notification failed");
        }
    }

    async fn call(&self, request: HostRequest) -> Result<HostResponse, HostError> {
        match request {
            HostRequest::ApplyToCurrentFile { stream_id, text } => {
                let path = self.current_file_path("apply_to_current_file")?;
                self.apply_text(stream_id, &path.to_string_lossy(), &text)?;
                Ok(HostResponse::Dispatched)
            }
            HostRequest::CopyText { text } => {
                *lock_unpoisoned(&self.clipboard) = Some(text);
                Ok(HostResponse::Dispatched)
            }
        }
    }
}

fn spawn_pipe_reader<R>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let Some(mut pipe) = pipe else {
            return Vec::new();
        };

        let mut bytes = Vec::new();
        let _ = pipe.read_to_end(&mut bytes);
        bytes
    })
}

fn join_pipe_reader(reader: thread::JoinHandle<Vec<u8>>) -> Vec<u8> {
    reader.join().unwrap_or_default()
}

fn truncate_to_byte_limit(content: String, max_bytes: usize) -> String {
    if content.len() <= max_bytes {
        return content;
    }

    let mut cutoff = max_bytes;
    while cutoff > 0 && !content.is_char_boundary(cutoff) {
        cutoff -= 1;
    }

    let mut truncated = content[..cutoff].to_string();
    truncated.push_str("\n[truncated]");
    truncated
}

fn canonicalize_existing_ancestor(path: &Path) -> Result<PathBuf, HostError> {
    for ancestor in path.ancestors() {
        if ancestor.exists() {
            return ancestor
                .canonicalize()
                .map_err(|error| HostError::io("resolving path", ancestor, error));
        }
    }

    Err(HostError::rejected(
        "resolve_path",
        format!("no existing ancestor for {}", path.display()),
    ))
}

fn format_exit_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit_code={code}"),
        None => "exit_code=terminated_by_signal".to_string(),
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
