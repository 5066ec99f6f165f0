//! Injected header specifications.
//!
//! A spec has the form `name:value1;value2;...`. Each spec binds to exactly
//! one `api` route and every value is appended to the outbound request.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::error::ConfigError;

/// Parse one `name:value1;value2` spec into a header map holding every value
/// under the same name, in spec order.
pub fn parse_header_spec(spec: &str) -> Result<HeaderMap, ConfigError> {
    let malformed = |reason: &str| ConfigError::MalformedHeader {
        spec: spec.to_string(),
        reason: reason.to_string(),
    };

    let (name, values) = spec
        .split_once(':')
        .ok_or_else(|| malformed("expected 'name:value'"))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(malformed("empty header name"));
    }
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| malformed("invalid header name"))?;

    let mut headers = HeaderMap::new();
    for value in values.split(';').map(str::trim).filter(|v| !v.is_empty()) {
        let value = HeaderValue::from_str(value).map_err(|_| malformed("invalid header value"))?;
        headers.append(name.clone(), value);
    }

    if headers.is_empty() {
        return Err(malformed("no header values"));
    }
    Ok(headers)
}
