//! Web front end: task page rendering and the HTTP server.

pub mod render;
mod server;

pub use render::PageRenderer;
pub use server::{ServerHandle, TaskListServer, build_router, start_server};
