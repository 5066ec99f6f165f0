//! Static file serving for `dir` routes.
//!
//! # Responsibilities
//! - Map the request path onto the route directory
//! - Refuse directories (no listings) and paths escaping the root
//! - Read the file and sniff its content type from the payload

use std::path::{Component, Path, PathBuf};

use axum::body::Body;
use axum::http::{header, Response};
use axum::response::IntoResponse;

use crate::error::NotFoundError;
use crate::http::response;
use crate::http::sniff::detect_content_type;

/// A file read from a `dir` route.
#[derive(Debug)]
pub struct StaticFile {
    pub content: Vec<u8>,
    pub content_type: &'static str,
}

/// Strip `prefix` from the front of `uri_path` and percent-decode the rest.
///
/// When the prefix only occurs later in the path the whole path is kept.
pub fn relative_path(prefix: &str, uri_path: &str) -> String {
    let rest = uri_path.strip_prefix(prefix).unwrap_or(uri_path);
    match urlencoding::decode(rest) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => rest.to_string(),
    }
}

/// Join a relative request path onto the route root.
pub fn resolve_path(root: &Path, relative: &str) -> PathBuf {
    root.join(relative.trim_start_matches('/'))
}

fn escapes_root(relative: &str) -> bool {
    Path::new(relative)
        .components()
        .any(|c| matches!(c, Component::ParentDir))
}

/// Read the file at `path`.
pub async fn read_file(path: &Path) -> Result<StaticFile, NotFoundError> {
    let meta = match tokio::fs::metadata(path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(NotFoundError::PathNotFound)
        }
        Err(e) => return Err(e.into()),
    };
    if meta.is_dir() {
        return Err(NotFoundError::IsDirectory);
    }

    let content = tokio::fs::read(path).await?;
    let content_type = detect_content_type(&content);
    Ok(StaticFile {
        content,
        content_type,
    })
}

/// Serve `uri_path` from `root`, answering 404 with the error text on failure.
///
/// The request method is not consulted: every method reads the file.
pub async fn serve(root: &Path, prefix: &str, uri: &str, uri_path: &str) -> Response<Body> {
    let relative = relative_path(prefix, uri_path);
    let path = resolve_path(root, &relative);
    let path_str = path.display().to_string();

    let result = if escapes_root(&relative) {
        Err(NotFoundError::Traversal)
    } else {
        read_file(&path).await
    };

    match result {
        Ok(file) => {
            tracing::debug!(
                uri = %uri,
                path = %path_str,
                bytes = file.content.len(),
                content_type = file.content_type,
                "Serving static file"
            );
            (
                [(header::CONTENT_TYPE, file.content_type)],
                file.content,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(uri = %uri, path = %path_str, error = %e, "Static lookup failed");
            response::not_found(uri, &path_str, e)
        }
    }
}
