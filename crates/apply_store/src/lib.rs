//! Observable store of per-code-block apply sessions.
//!
//! One store lives for one assistant session. Every mutation replaces a whole
//! record keyed by its [`StreamId`]; observers receive full snapshots.

mod error;
mod schema;
mod store;

pub use error::ApplyStoreError;
pub use schema::{ApplySession, ApplyStatus, StreamId};
pub use store::{ApplyStore, StoreSnapshot};
