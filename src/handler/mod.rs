//! Request handling module
//!
//! `router` dispatches each request into the API handlers or the static
//! responder; handlers are independent and share no in-memory state.

mod api;
mod router;
mod static_files;

pub use router::{handle_request, BoxError};
