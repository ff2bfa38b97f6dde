pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod notify;
pub mod session;
pub mod ui;

pub use api::{ApiClient, ApiResponse, RequestContext};
pub use error::{ApiError, Result};
pub use session::{MemorySessionStore, NoSession, SessionAccessor, SessionSnapshot};
