//! Route matching logic.
//!
//! # Design Decisions
//! - Containment, not anchoring: the prefix may occur anywhere in the URI
//! - Case-sensitive byte comparison over path and query
//! - No regex to guarantee O(n) matching

/// Matches a request URI against one route prefix.
#[derive(Debug, Clone, Copy)]
pub struct ContainmentMatcher<'a> {
    prefix: &'a str,
}

impl<'a> ContainmentMatcher<'a> {
    pub fn new(prefix: &'a str) -> Self {
        Self { prefix }
    }

    /// Returns true if `request_uri` contains the prefix.
    pub fn matches(&self, request_uri: &str) -> bool {
        request_uri.contains(self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_prefix_matches() {
        assert!(ContainmentMatcher::new("/api").matches("/api/users"));
    }

    #[test]
    fn test_contained_prefix_matches() {
        let m = ContainmentMatcher::new("/static");
        assert!(m.matches("/app/static/logo.png"));
        assert!(m.matches("/search?from=/static"));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(!ContainmentMatcher::new("/api").matches("/API/users"));
        assert!(!ContainmentMatcher::new("/api").matches("/ap"));
    }
}
