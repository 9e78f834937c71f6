//! Command-line front end for the assist pipeline.
//!
//! ## Usage
//!
//! `assistant <command> [input...]` runs one command (`edit`, `comment`,
//! `onboard`), streams its output to stdout, then lists the code blocks of
//! the response with their classification. `--apply` additionally applies
//! every block: file edits are written and accepted, terminal blocks run.
//!
//! ## Environment
//!
//! - `ASSIST_PROVIDER`: chat model provider, `mock` (default) is the only one.
//! - `ASSIST_WORKSPACE`: workspace root; defaults to the current directory.
//! - `ASSIST_CURRENT_FILE`: target of applies without a file path.
//! - `ASSIST_SELECTION_FILE`: file whose content is the highlighted code for
//!   `edit` and `comment`.
//! - `ASSIST_LOG`: log filter directives, falling back to `RUST_LOG`.
//! - `ASSIST_RUN_TIMEOUT_SEC`: terminal block timeout, default 30.
//! - `ASSIST_REQUEST_CLIPBOARD=1`: copy through a host request.

pub mod cli;
pub mod host;
pub mod providers;
