//! HTTP server implementation
//!
//! Rate limiting wraps every route; the auth guards wrap protected resources.

pub mod middleware;
pub mod routes;

pub mod builder;
pub mod server;
pub mod state;


pub use builder::{ServerBuilder, run_server};
pub use server::HttpServer;
pub use state::AppState;
