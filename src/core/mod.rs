//! Core types - pure abstractions shared across the codebase.

mod link;
mod request;
mod state;

pub use link::LinkKind;
pub use request::{DEFAULT_TARGET, PendingRequest, ResolvedContent, parse_payload};
pub use state::{is_shutdown, register_shutdown, setup_shutdown_handler};
