//! Code-block apply pipeline.
//!
//! Blocks are extracted from a model response, classified as terminal or
//! file-edit, and mounted on an [`ApplyController`]. File-edit blocks get a
//! session in the shared [`apply_store::ApplyStore`] that moves
//! `closed → streaming → done → closed` as the user applies and the host
//! confirms. Terminal blocks go straight to the host's terminal.

mod blocks;
mod classify;
mod controller;
mod copy;
mod cursor;

pub use blocks::{extract_code_blocks, CodeBlock};
pub use classify::{
    classify_block, terminal_command, BlockKind, COMMON_TERMINAL_COMMANDS, TERMINAL_LANGUAGES,
};
pub use controller::{ApplyController, ApplyNextOutcome, BlockHandle};
pub use copy::{CopyIndicator, COPIED_INDICATOR_DURATION};
pub use cursor::ApplyCursor;
