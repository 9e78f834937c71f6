use std::sync::Arc;

use apply_store::{ApplySession, ApplyStatus, ApplyStore, StreamId};

use crate::apply::blocks::{extract_code_blocks, CodeBlock};
use crate::apply::classify::{classify_block, terminal_command, BlockKind};
use crate::apply::copy::CopyIndicator;
use crate::apply::cursor::ApplyCursor;
use crate::error::ApplyError;
use crate::host::{Host, HostCapabilities, HostEvent, HostNotification, HostRequest};

/// A rendered code block and its memoized apply identity.
#[derive(Debug, Clone)]
pub struct BlockHandle {
    stream_id: StreamId,
    block: CodeBlock,
    kind: BlockKind,
    copy: CopyIndicator,
}

impl BlockHandle {
    pub fn stream_id(&self) -> StreamId {
        self.stream_id
    }

    pub fn block(&self) -> &CodeBlock {
        &self.block
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn filepath(&self) -> Option<&str> {
        self.block.filepath.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.block.text
    }

    pub fn copy_indicator(&self) -> &CopyIndicator {
        &self.copy
    }
}

/// What an "apply next" action ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyNextOutcome {
    /// No block sits at the cursor; nothing happened.
    NoTarget,
    /// The target was a terminal block and its command was sent to the host.
    RanCommand,
    /// The target's session was already streaming or done.
    AlreadyActive(ApplyStatus),
    /// The host accepted the apply; the session is streaming.
    Dispatched,
}

/// Drives the per-block apply lifecycle through the host.
pub struct ApplyController {
    host: Arc<dyn Host>,
    store: Arc<ApplyStore>,
    cursor: Arc<ApplyCursor>,
    capabilities: HostCapabilities,
}

impl ApplyController {
    pub fn new(host: Arc<dyn Host>, store: Arc<ApplyStore>, cursor: Arc<ApplyCursor>) -> Self {
        Self {
            host,
            store,
            cursor,
            capabilities: HostCapabilities::default(),
        }
    }

    #[must_use]
    pub fn with_capabilities(mut self, capabilities: HostCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn store(&self) -> &Arc<ApplyStore> {
        &self.store
    }

    pub fn cursor(&self) -> &Arc<ApplyCursor> {
        &self.cursor
    }

    /// Gives a block its stream id and, for file edits, a `closed` session.
    pub fn mount(&self, block: CodeBlock) -> Result<BlockHandle, ApplyError> {
        let kind = classify_block(block.language.as_deref(), &block.text);
        let stream_id = StreamId::new();

        if kind == BlockKind::FileEdit {
            self.store.register(ApplySession::closed(
                stream_id,
                block.filepath.clone(),
                block.text.clone(),
            ))?;
        }

        Ok(BlockHandle {
            stream_id,
            block,
            kind,
            copy: CopyIndicator::new(),
        })
    }

    /// Mounts every code block of a model response, in document order.
    pub fn mount_response(&self, response: &str) -> Result<Vec<BlockHandle>, ApplyError> {
        extract_code_blocks(response)
            .into_iter()
            .map(|block| self.mount(block))
            .collect()
    }

    /// Re-renders a response that is still streaming in.
    ///
    /// Blocks that already have a handle keep their stream id while their
    /// text and session record follow the new content. New blocks are
    /// mounted and blocks that disappeared are unmounted.
    pub fn update_response(
        &self,
        handles: &mut Vec<BlockHandle>,
        response: &str,
    ) -> Result<(), ApplyError> {
        let blocks = extract_code_blocks(response);
        let count = blocks.len();
        for (position, block) in blocks.into_iter().enumerate() {
            match handles.get_mut(position) {
                Some(handle) => self.refresh(handle, block)?,
                None => handles.push(self.mount(block)?),
            }
        }

        if handles.len() > count {
            for handle in handles.drain(count..) {
                self.unmount(handle);
            }
        }
        Ok(())
    }

    fn refresh(&self, handle: &mut BlockHandle, block: CodeBlock) -> Result<(), ApplyError> {
        let kind = classify_block(block.language.as_deref(), &block.text);
        match (handle.kind, kind) {
            (BlockKind::FileEdit, BlockKind::FileEdit) => {
                self.store.update_content(
                    &handle.stream_id,
                    block.filepath.clone(),
                    block.text.clone(),
                )?;
            }
            (BlockKind::Terminal, BlockKind::FileEdit) => {
                self.store.register(ApplySession::closed(
                    handle.stream_id,
                    block.filepath.clone(),
                    block.text.clone(),
                ))?;
            }
            (BlockKind::FileEdit, BlockKind::Terminal) => {
                self.store.evict(&handle.stream_id);
            }
            (BlockKind::Terminal, BlockKind::Terminal) => {}
        }

        handle.block = block;
        handle.kind = kind;
        Ok(())
    }

    /// Releases the block's session once the block is no longer displayed.
    pub fn unmount(&self, handle: BlockHandle) {
        self.store.evict(&handle.stream_id);
    }

    pub fn status(&self, handle: &BlockHandle) -> ApplyStatus {
        self.store.status(&handle.stream_id)
    }

    /// Click-to-apply. Fire-and-forget: the session is `streaming` as soon as
    /// the notification is sent.
    pub fn apply(&self, handle: &BlockHandle) -> Result<(), ApplyError> {
        if handle.kind.is_terminal() {
            self.run_command(handle);
            return Ok(());
        }

        let Some(filepath) = handle.block.filepath.clone() else {
            return Err(ApplyError::NoFileTarget);
        };

        // The host may confirm before `notify` returns.
        self.store
            .transition(&handle.stream_id, ApplyStatus::Streaming)?;
        self.host.notify(HostNotification::ApplyToFile {
            stream_id: handle.stream_id,
            filepath: Some(filepath),
            text: handle.block.text.clone(),
        });
        Ok(())
    }

    /// Keyboard-shortcut apply of the block at the cursor, into the host's
    /// current file.
    ///
    /// The cursor advances exactly once whenever a block was targeted, even
    /// when the host call fails. A failed call leaves the session `closed`.
    pub async fn apply_next(&self, handles: &[BlockHandle]) -> Result<ApplyNextOutcome, ApplyError> {
        let Some(index) = self.cursor.claim(handles.len()) else {
            return Ok(ApplyNextOutcome::NoTarget);
        };
        let handle = &handles[index];
        tracing::debug!(index, stream_id = %handle.stream_id, "apply next");

        if handle.kind.is_terminal() {
            self.run_command(handle);
            return Ok(ApplyNextOutcome::RanCommand);
        }

        let status = self.status(handle);
        if status != ApplyStatus::Closed {
            return Ok(ApplyNextOutcome::AlreadyActive(status));
        }

        let request = HostRequest::ApplyToCurrentFile {
            stream_id: handle.stream_id,
            text: handle.block.text.clone(),
        };
        if let Err(error) = self.host.call(request).await {
            tracing::warn!(%error, stream_id = %handle.stream_id, "apply to current file failed");
            return Err(error.into());
        }

        self.store
            .transition(&handle.stream_id, ApplyStatus::Streaming)?;
        Ok(ApplyNextOutcome::Dispatched)
    }

    /// Handles an inbound host event. Unknown or out-of-order ids are logged
    /// and rejected without touching the store.
    pub fn handle_host_event(&self, event: HostEvent) -> Result<ApplySession, ApplyError> {
        match event {
            HostEvent::ApplyCompleted { stream_id } => self
                .store
                .transition(&stream_id, ApplyStatus::Done)
                .map_err(|error| {
                    tracing::warn!(%error, "ignoring apply completion");
                    ApplyError::from(error)
                }),
        }
    }

    /// Keeps the host's diff. The session closes optimistically.
    pub fn accept(&self, handle: &BlockHandle) -> Result<(), ApplyError> {
        self.store.transition(&handle.stream_id, ApplyStatus::Closed)?;
        self.host.notify(HostNotification::AcceptDiff {
            filepath: handle.block.filepath.clone(),
        });
        Ok(())
    }

    /// Discards the host's diff. The session closes optimistically.
    pub fn reject(&self, handle: &BlockHandle) -> Result<(), ApplyError> {
        self.store.transition(&handle.stream_id, ApplyStatus::Closed)?;
        self.host.notify(HostNotification::RejectDiff {
            filepath: handle.block.filepath.clone(),
        });
        Ok(())
    }

    pub fn insert_at_cursor(&self, handle: &BlockHandle) {
        self.host.notify(HostNotification::InsertAtCursor {
            text: handle.block.text.clone(),
        });
    }

    pub fn show_file(&self, handle: &BlockHandle) -> Result<(), ApplyError> {
        let filepath = handle
            .block
            .filepath
            .clone()
            .ok_or(ApplyError::NoFileTarget)?;
        self.host.notify(HostNotification::ShowFile { filepath });
        Ok(())
    }

    /// Copies the block text and raises its "copied" indicator.
    ///
    /// Hosts flagged with `request_clipboard` get an awaited request; the
    /// indicator stays down if that request fails.
    pub async fn copy(&self, handle: &BlockHandle) -> Result<(), ApplyError> {
        let text = handle.block.text.clone();
        if self.capabilities.request_clipboard {
            self.host.call(HostRequest::CopyText { text }).await?;
        } else {
            self.host.notify(HostNotification::CopyText { text });
        }
        handle.copy.mark_copied();
        Ok(())
    }

    fn run_command(&self, handle: &BlockHandle) {
        let command = terminal_command(&handle.block.text).to_string();
        tracing::info!(%command, "dispatching terminal block");
        self.host.notify(HostNotification::RunCommand { command });
    }
}
