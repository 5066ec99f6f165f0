//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     RouteSpecs (types[], paths[], targets[], headers[])
//!     → table.rs (validate, create dirs, bind headers)
//!     → headers.rs (parse 'name:v1;v2' specs)
//!     → Freeze as immutable RouteTable
//!
//! Incoming Request (request URI)
//!     → matcher.rs (does the URI contain the prefix?)
//!     → dispatcher.rs (first matching route in configuration order)
//!     → Return: Dispatch::Matched(route) or Dispatch::NoRoute
//! ```

pub mod dispatcher;
pub mod headers;
pub mod matcher;
pub mod table;

pub use dispatcher::{Dispatch, Dispatcher};
pub use table::{Route, RouteKind, RouteTable, RouteTarget};
