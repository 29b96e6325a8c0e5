// src/clients/mod.rs
// Client side access to the game service
//
// - common: request/response structures and HTTP helpers
// - error: error taxonomy surfaced to the views
// - session: session token storage
// - api_client: the REST client itself

pub mod common;
pub mod error;
pub mod session;
pub mod api_client;

#[cfg(test)]
pub mod test_server;

pub use api_client::ApiClient;
pub use error::ApiError;
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
