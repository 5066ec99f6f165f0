//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, catch-all handler)
//!     → request.rs (request ID)
//!     → routing::Dispatcher (first route whose prefix the URI contains)
//!     → static_files.rs + sniff.rs   (dir routes)
//!     → proxy.rs                     (api routes)
//!     → response.rs (404 / 502 bodies)
//!     → Send to client
//! ```

pub mod proxy;
pub mod request;
pub mod response;
pub mod server;
pub mod sniff;
pub mod static_files;

pub use request::X_REQUEST_ID;
pub use server::HttpServer;
