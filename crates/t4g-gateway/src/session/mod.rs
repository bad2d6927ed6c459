//! Session snapshot model and its single writer.

mod snapshot;
mod store;

pub use snapshot::{SessionGeneration, SessionSnapshot, SessionStatus};
pub use store::SessionStore;
