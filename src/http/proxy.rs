//! Reverse proxying for `api` routes.
//!
//! # Responsibilities
//! - Rewrite scheme to `http` and authority to the route backend
//! - Forward the full original path and query unchanged
//! - Append the route's injected headers
//! - Stream the backend response back without buffering
//!
//! # Design Decisions
//! - No retries, no circuit breaking: one attempt per request
//! - Transport failures answer 502; backend statuses pass through untouched

use std::net::SocketAddr;

use axum::body::Body;
use axum::http::uri::{Authority, Scheme};
use axum::http::{header, HeaderMap, Request, Response, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;

use crate::error::UpstreamError;
use crate::security::headers::{append_forwarded_for, inject, strip_hop_by_hop};

/// HTTP client shared by every proxy route.
pub type ProxyClient = Client<HttpConnector, Body>;

pub fn build_client() -> ProxyClient {
    Client::builder(TokioExecutor::new()).build(HttpConnector::new())
}

/// Point `uri` at `authority` over plain HTTP, keeping path and query.
pub fn rewrite_uri(uri: &Uri, authority: &Authority) -> Result<Uri, UpstreamError> {
    let mut parts = uri.clone().into_parts();
    parts.scheme = Some(Scheme::HTTP);
    parts.authority = Some(authority.clone());
    if parts.path_and_query.is_none() {
        parts.path_and_query = Some(axum::http::uri::PathAndQuery::from_static("/"));
    }
    Ok(Uri::from_parts(parts)?)
}

/// Prepare the outbound request: new URI, forwarding headers, injected headers.
pub fn prepare_request(
    request: Request<Body>,
    authority: &Authority,
    injected: &HeaderMap,
    client_addr: Option<SocketAddr>,
) -> Result<Request<Body>, UpstreamError> {
    let (mut parts, body) = request.into_parts();

    parts.uri = rewrite_uri(&parts.uri, authority)?;
    // The client derives Host from the rewritten authority.
    parts.headers.remove(header::HOST);
    strip_hop_by_hop(&mut parts.headers);
    if let Some(addr) = client_addr {
        append_forwarded_for(&mut parts.headers, addr.ip());
    }
    inject(&mut parts.headers, injected);

    Ok(Request::from_parts(parts, body))
}

/// Forward `request` to `authority` and stream the response back.
pub async fn forward(
    client: &ProxyClient,
    request: Request<Body>,
    authority: &Authority,
    injected: &HeaderMap,
    client_addr: Option<SocketAddr>,
) -> Result<Response<Body>, UpstreamError> {
    let outbound = prepare_request(request, authority, injected, client_addr)?;

    tracing::debug!(
        backend = %authority,
        uri = %outbound.uri(),
        "Forwarding request"
    );

    let response = client.request(outbound).await?;
    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);

    Ok(Response::from_parts(parts, Body::new(body)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Method};

    #[test]
    fn test_rewrite_keeps_path_and_query() {
        let uri: Uri = "/api/v1/users?page=2".parse().unwrap();
        let authority: Authority = "backend.example:8888".parse().unwrap();

        let rewritten = rewrite_uri(&uri, &authority).unwrap();
        assert_eq!(
            rewritten.to_string(),
            "http://backend.example:8888/api/v1/users?page=2"
        );
    }

    #[test]
    fn test_rewrite_replaces_absolute_authority() {
        let uri: Uri = "https://client.example/api/x".parse().unwrap();
        let authority: Authority = "backend:80".parse().unwrap();

        let rewritten = rewrite_uri(&uri, &authority).unwrap();
        assert_eq!(rewritten.to_string(), "http://backend:80/api/x");
    }

    #[test]
    fn test_prepare_request_appends_injected_headers() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/users")
            .header(header::HOST, "edge.local")
            .header("token", "client-token")
            .header(header::CONNECTION, "close")
            .body(Body::empty())
            .unwrap();

        let mut injected = HeaderMap::new();
        injected.append("token", HeaderValue::from_static("abc123"));

        let client: SocketAddr = "192.0.2.7:5000".parse().unwrap();
        let outbound = prepare_request(
            request,
            &"backend.example:8888".parse().unwrap(),
            &injected,
            Some(client),
        )
        .unwrap();

        assert_eq!(outbound.method(), Method::POST);
        assert_eq!(outbound.uri().to_string(), "http://backend.example:8888/api/v1/users");
        assert!(outbound.headers().get(header::HOST).is_none());
        assert!(outbound.headers().get(header::CONNECTION).is_none());
        assert_eq!(outbound.headers()["x-forwarded-for"], "192.0.2.7");

        let tokens: Vec<_> = outbound
            .headers()
            .get_all("token")
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(tokens, vec!["client-token", "abc123"]);
    }
}
