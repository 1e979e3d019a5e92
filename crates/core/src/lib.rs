//! StayNest core types and utilities
//!
//! Domain records exchanged with the booking API, persisted client storage,
//! the session holder and the route guard shared by every front end.

pub mod error;
pub mod identity;
pub mod routes;
pub mod session;
pub mod storage;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult};
pub use identity::{Role, SessionUser, decode_access_token};
pub use routes::{Navigation, Route, RouteGuard};
pub use session::Session;
pub use storage::{Credentials, FileStore, KeyValueStore, MemoryStore, keys, load_json, save_json};
