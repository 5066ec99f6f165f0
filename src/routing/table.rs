//! Route table construction.
//!
//! # Responsibilities
//! - Validate the positional route arrays
//! - Prepare static directories (created on first run)
//! - Bind header specs to `api` routes in encounter order
//! - Freeze the result as an ordered, immutable [`RouteTable`]

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use axum::http::uri::Authority;
use axum::http::HeaderMap;

use crate::config::RouteSpecs;
use crate::error::ConfigError;
use crate::routing::headers::parse_header_spec;

/// Route kind as written on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// `dir`: serve files from a local directory.
    StaticDirectory,
    /// `api`: forward to a backend host.
    ReverseProxy,
}

impl RouteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKind::StaticDirectory => "dir",
            RouteKind::ReverseProxy => "api",
        }
    }
}

impl FromStr for RouteKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dir" => Ok(RouteKind::StaticDirectory),
            "api" => Ok(RouteKind::ReverseProxy),
            other => Err(ConfigError::InvalidKind(other.to_string())),
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific payload of a route.
#[derive(Debug, Clone)]
pub enum RouteTarget {
    /// Filesystem root of a `dir` route.
    Directory(PathBuf),
    /// Backend of an `api` route with the headers appended to every request.
    Backend {
        authority: Authority,
        headers: HeaderMap,
    },
}

/// An immutable prefix → target binding.
#[derive(Debug, Clone)]
pub struct Route {
    prefix: String,
    target: RouteTarget,
}

impl Route {
    pub fn new(prefix: impl Into<String>, target: RouteTarget) -> Self {
        Self {
            prefix: prefix.into(),
            target,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn target(&self) -> &RouteTarget {
        &self.target
    }

    pub fn kind(&self) -> RouteKind {
        match self.target {
            RouteTarget::Directory(_) => RouteKind::StaticDirectory,
            RouteTarget::Backend { .. } => RouteKind::ReverseProxy,
        }
    }

    /// Injected headers; always empty for `dir` routes.
    pub fn injected_headers(&self) -> Option<&HeaderMap> {
        match &self.target {
            RouteTarget::Backend { headers, .. } => Some(headers),
            RouteTarget::Directory(_) => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            RouteTarget::Directory(root) => write!(f, "dir {} => {}", self.prefix, root.display()),
            RouteTarget::Backend { authority, headers } => write!(
                f,
                "api {} => {} ({} injected header value(s))",
                self.prefix,
                authority,
                headers.len()
            ),
        }
    }
}

/// Ordered routes. Insertion order is configuration order and matching is
/// first-match, so order is significant.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Validate the raw route arrays and build the table.
    pub fn build(specs: &RouteSpecs) -> Result<Self, ConfigError> {
        let RouteSpecs {
            types,
            paths,
            targets,
            headers,
        } = specs;

        if types.len() != paths.len() || paths.len() != targets.len() {
            return Err(ConfigError::LengthMismatch {
                types: types.len(),
                paths: paths.len(),
                targets: targets.len(),
            });
        }
        if types.is_empty() {
            return Err(ConfigError::NoRoutes);
        }

        let mut seen = HashSet::with_capacity(paths.len());
        let mut routes = Vec::with_capacity(paths.len());
        // Header specs advance only on `api` routes, independent of the route index.
        let mut header_cursor = 0;

        for (index, ((kind, prefix), target)) in types.iter().zip(paths).zip(targets).enumerate() {
            let kind: RouteKind = kind.parse()?;

            if prefix.is_empty() {
                return Err(ConfigError::EmptyPrefix(index));
            }
            if !seen.insert(prefix.as_str()) {
                return Err(ConfigError::DuplicatePrefix(prefix.clone()));
            }
            if target.trim().is_empty() {
                return Err(ConfigError::EmptyTarget(prefix.clone()));
            }

            let target = match kind {
                RouteKind::StaticDirectory => {
                    let root = PathBuf::from(target);
                    ensure_dir(&root)?;
                    RouteTarget::Directory(root)
                }
                RouteKind::ReverseProxy => {
                    let authority = parse_backend(target)?;
                    let headers = match headers.get(header_cursor) {
                        Some(spec) => {
                            header_cursor += 1;
                            parse_header_spec(spec)?
                        }
                        None => HeaderMap::new(),
                    };
                    RouteTarget::Backend { authority, headers }
                }
            };

            routes.push(Route::new(prefix.clone(), target));
        }

        if header_cursor < headers.len() {
            return Err(ConfigError::UnboundHeaders(headers.len() - header_cursor));
        }

        Ok(Self { routes })
    }

    /// Build a table from already validated routes.
    pub fn from_routes(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Make sure `dir` exists as a directory, creating it recursively if absent.
fn ensure_dir(dir: &Path) -> Result<(), ConfigError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ConfigError::NotADirectory(dir.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(dir = %dir.display(), "dir not found, creating it");
            fs::create_dir_all(dir).map_err(|source| ConfigError::Directory {
                path: dir.to_path_buf(),
                source,
            })
        }
        Err(source) => Err(ConfigError::Directory {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Parse a `host:port` (or bare host) backend target.
fn parse_backend(target: &str) -> Result<Authority, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidBackend {
        target: target.to_string(),
        reason: reason.to_string(),
    };

    if target.contains("://") {
        return Err(invalid("scheme is not allowed, use host:port"));
    }
    let authority = Authority::from_str(target).map_err(|e| invalid(&e.to_string()))?;
    if authority.as_str().contains('@') {
        return Err(invalid("credentials are not allowed"));
    }
    Ok(authority)
}
