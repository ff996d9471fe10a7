use http::Uri;
use std::net::{IpAddr, Ipv6Addr};

#[derive(Debug, thiserror::Error)]
pub enum UriRewriteError {
    #[error("uri `{0}` has no authority")]
    MissingAuthority(String),
    #[error(transparent)]
    Invalid(#[from] http::Error),
}

/// Whether `host` is a literal IPv4 or IPv6 address. Bracketed IPv6 hosts,
/// as returned by [`Uri::host`], are accepted.
pub fn is_ip_literal(host: &str) -> bool {
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    host.parse::<IpAddr>().is_ok()
}

/// Replaces the host, keeping scheme, port, path and query.
pub fn uri_with_host(uri: &Uri, host: &str) -> Result<Uri, UriRewriteError> {
    rebuild(uri, format_authority(host, uri.port_u16()), None)
}

/// Replaces the port, keeping scheme, host, path and query.
pub fn uri_with_port(uri: &Uri, port: u16) -> Result<Uri, UriRewriteError> {
    let host = uri
        .host()
        .ok_or_else(|| UriRewriteError::MissingAuthority(uri.to_string()))?;
    rebuild(uri, format_authority(host, Some(port)), None)
}

/// Replaces the path, keeping the query.
pub fn uri_with_path(uri: &Uri, path: &str) -> Result<Uri, UriRewriteError> {
    let authority = uri
        .authority()
        .map(|authority| authority.as_str().to_string())
        .ok_or_else(|| UriRewriteError::MissingAuthority(uri.to_string()))?;

    let mut path_and_query = String::with_capacity(path.len() + 1);
    if !path.starts_with('/') {
        path_and_query.push('/');
    }
    path_and_query.push_str(path);
    if let Some(query) = uri.query() {
        path_and_query.push('?');
        path_and_query.push_str(query);
    }

    rebuild(uri, authority, Some(path_and_query))
}

/// Renders `scheme://host[:port][path]`. A root path is left out.
pub fn uri_to_target_string(uri: &Uri) -> String {
    let scheme = uri.scheme_str().unwrap_or("http");
    let authority = uri.authority().map(|a| a.as_str()).unwrap_or_default();

    match uri.path() {
        "" | "/" => format!("{scheme}://{authority}"),
        path => format!("{scheme}://{authority}{path}"),
    }
}

fn format_authority(host: &str, port: Option<u16>) -> String {
    let host = if host.parse::<Ipv6Addr>().is_ok() {
        format!("[{host}]")
    } else {
        host.to_string()
    };

    match port {
        Some(port) => format!("{host}:{port}"),
        None => host,
    }
}

fn rebuild(
    uri: &Uri,
    authority: String,
    path_and_query: Option<String>,
) -> Result<Uri, UriRewriteError> {
    let path_and_query = match path_and_query {
        Some(path_and_query) => path_and_query,
        None => uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string()),
    };

    Ok(Uri::builder()
        .scheme(uri.scheme_str().unwrap_or("http"))
        .authority(authority)
        .path_and_query(path_and_query)
        .build()?)
}
