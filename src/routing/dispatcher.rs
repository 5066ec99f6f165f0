//! Route lookup.
//!
//! # Responsibilities
//! - Hold the frozen route table
//! - Select the route for a request URI
//! - Return the matched route or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (shared across requests without locks)
//! - Containment matching: a route matches when its prefix occurs anywhere
//!   in the request URI, not only at the start
//! - First match in configuration order wins, not the longest prefix
//! - O(n) scan (acceptable for typical route counts)

use crate::routing::matcher::ContainmentMatcher;
use crate::routing::table::{Route, RouteTable};

/// Outcome of selecting a route for a request.
#[derive(Debug, Clone, Copy)]
pub enum Dispatch<'a> {
    /// The first configured route whose prefix the URI contains.
    Matched(&'a Route),
    /// No route matched; the caller answers 404.
    NoRoute,
}

impl<'a> Dispatch<'a> {
    pub fn route(&self) -> Option<&'a Route> {
        match self {
            Dispatch::Matched(route) => Some(route),
            Dispatch::NoRoute => None,
        }
    }
}

/// Selects routes for inbound requests.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    table: RouteTable,
}

impl Dispatcher {
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    /// Find the first route whose prefix is contained in `request_uri`.
    pub fn dispatch(&self, request_uri: &str) -> Dispatch<'_> {
        self.table
            .iter()
            .find(|route| ContainmentMatcher::new(route.prefix()).matches(request_uri))
            .map_or(Dispatch::NoRoute, Dispatch::Matched)
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::table::RouteTarget;
    use axum::http::HeaderMap;
    use std::path::PathBuf;

    fn backend(prefix: &str, authority: &'static str) -> Route {
        Route::new(
            prefix,
            RouteTarget::Backend {
                authority: authority.parse().unwrap(),
                headers: HeaderMap::new(),
            },
        )
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(RouteTable::from_routes(vec![
            Route::new("/static", RouteTarget::Directory(PathBuf::from("./assets"))),
            backend("/api", "api:1"),
            backend("/api/v1", "v1:1"),
        ]))
    }

    #[test]
    fn test_first_match_wins_over_longer_prefix() {
        let d = dispatcher();
        let route = d.dispatch("/api/v1/users").route().unwrap();
        assert_eq!(route.prefix(), "/api");
    }

    #[test]
    fn test_containment_not_anchored() {
        let d = dispatcher();
        let route = d.dispatch("/app/static/logo.png").route().unwrap();
        assert_eq!(route.prefix(), "/static");

        let route = d.dispatch("/search?next=/api").route().unwrap();
        assert_eq!(route.prefix(), "/api");
    }

    #[test]
    fn test_no_route() {
        let d = dispatcher();
        assert!(matches!(d.dispatch("/index.html"), Dispatch::NoRoute));
        assert!(matches!(d.dispatch("/"), Dispatch::NoRoute));
    }
}
