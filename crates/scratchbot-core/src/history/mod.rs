//! Chat sessions and their persistence.
//!
//! The whole session list is written as one JSON snapshot after every change;
//! there is no incremental log.

pub mod session;
pub mod store;

pub use session::{find_session, sort_by_last_modified_desc, Session, NEW_SESSION_TITLE};
pub use store::{PersistedHistory, SessionStore};
