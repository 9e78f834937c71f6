use std::fs;
use std::io::Write;
use std::path::Path;

use assist_pipeline::{
    parse_invocation, ApplyStatus, AssistantSession, BlockHandle, BlockKind, ChunkStream,
    CodeSelection, HostEvent, Invocation,
};
use futures_util::StreamExt;
use tokio::sync::mpsc;

pub const USAGE: &str = "usage: assistant [--apply] <command> [input...]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub apply: bool,
    pub invocation: Invocation,
}

/// Parses process arguments, program name excluded. A leading `/` on the
/// command name is optional.
pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs, String> {
    let mut apply = false;
    let mut words = Vec::new();
    for arg in args {
        if words.is_empty() && arg == "--apply" {
            apply = true;
        } else {
            words.push(arg);
        }
    }

    let line = words.join(" ");
    let line = line.trim();
    if line.is_empty() {
        return Err(USAGE.to_string());
    }

    let invocation = match line.strip_prefix('/') {
        Some(_) => parse_invocation(line),
        None => parse_invocation(&format!("/{line}")),
    }
    .ok_or_else(|| USAGE.to_string())?;

    Ok(CliArgs { apply, invocation })
}

/// Reads the highlighted code from `path`, labelled relative to the workspace
/// when possible.
pub fn selection_from_file(path: &Path, workspace_root: &Path) -> Result<CodeSelection, String> {
    let text = fs::read_to_string(path)
        .map_err(|error| format!("Failed to read selection {}: {error}", path.display()))?;
    let label = path
        .canonicalize()
        .ok()
        .and_then(|canonical| {
            canonical
                .strip_prefix(workspace_root)
                .ok()
                .map(|relative| relative.to_path_buf())
        })
        .unwrap_or_else(|| path.to_path_buf());

    Ok(CodeSelection {
        filepath: Some(label.display().to_string()),
        text,
    })
}

/// Writes every chunk to `out` as it arrives and returns the whole response.
///
/// A stream failure ends the response; chunks already written stay written.
pub async fn stream_to(out: &mut impl Write, mut stream: ChunkStream) -> Result<String, String> {
    let mut response = String::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|error| error.to_string())?;
        out.write_all(chunk.as_bytes())
            .and_then(|()| out.flush())
            .map_err(|error| format!("Failed to write output: {error}"))?;
        response.push_str(&chunk);
    }
    Ok(response)
}

pub fn describe_blocks(handles: &[BlockHandle]) -> String {
    handles
        .iter()
        .map(|handle| {
            let block = handle.block();
            let kind = match handle.kind() {
                BlockKind::Terminal => "terminal",
                BlockKind::FileEdit => "file-edit",
            };
            format!(
                "[{}] {kind} language={} file={}",
                block.index,
                block.language.as_deref().unwrap_or("-"),
                block.filepath.as_deref().unwrap_or("-"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Applies every block in order and accepts each completed diff.
///
/// File edits without a path are skipped. Returns one report line per block.
pub fn apply_all(
    session: &AssistantSession,
    handles: &[BlockHandle],
    events: &mut mpsc::UnboundedReceiver<HostEvent>,
) -> Vec<String> {
    let controller = session.controller();
    let mut report = Vec::new();

    for handle in handles {
        let index = handle.block().index;
        if let Err(error) = controller.apply(handle) {
            report.push(format!("[{index}] skipped: {error}"));
            continue;
        }
        if handle.kind().is_terminal() {
            report.push(format!("[{index}] ran command"));
            continue;
        }

        while let Ok(event) = events.try_recv() {
            if let Err(error) = controller.handle_host_event(event) {
                tracing::warn!(%error, "unexpected host event");
            }
        }

        let line = match controller.status(handle) {
            ApplyStatus::Done => match controller.accept(handle) {
                Ok(()) => format!("[{index}] applied {}", handle.filepath().unwrap_or("-")),
                Err(error) => format!("[{index}] accept failed: {error}"),
            },
            status => format!("[{index}] waiting for host ({status})"),
        };
        report.push(line);
    }

    report
}
