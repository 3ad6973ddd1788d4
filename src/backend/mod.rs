//! Backend adapters: REST endpoints, the realtime socket, and the lenient
//! decoding both rely on.

pub mod auth;
pub mod chats;
pub mod client;
pub mod decode;
pub mod error;
pub mod images;
pub mod lenient;
pub mod projects;
pub mod realtime;

pub use client::ApiClient;
pub use error::ApiError;
pub use images::ImageLoader;
pub use realtime::WsChatChannel;

/// Returns the backend module name for smoke checks.
pub fn module_name() -> &'static str {
    "backend"
}
