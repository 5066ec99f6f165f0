//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Request bound for an `api` route:
//!     → headers.rs (strip hop-by-hop, add X-Forwarded-For, inject route headers)
//!     → Forward to backend
//! Backend response:
//!     → headers.rs (strip hop-by-hop)
//!     → Stream to client
//! ```
//!
//! # Design Decisions
//! - Injected headers are appended, never replacing client values
//! - Connection-scoped headers never cross the proxy

pub mod headers;
