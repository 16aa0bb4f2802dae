//! Shared utility functions for perf-server

use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::{Extensions, HeaderMap, header};

/// Source address recorded with a submission.
///
/// Behind a proxy: first `X-Forwarded-For` entry, then `X-Real-IP`, then
/// the `for=` node of the first RFC 7239 `Forwarded` element. Otherwise (or as fallback) the peer `ip:port`, or `unknown`.
pub fn client_addr(headers: &HeaderMap, extensions: &Extensions, behind_proxy: bool) -> String {
    if behind_proxy {
        if let Some(forwarded) = headers.get("x-forwarded-for")
            && let Ok(val) = forwarded.to_str()
            && let Some(first) = val.split(',').next()
        {
            let ip = first.trim();
            if !ip.is_empty() {
                return ip.to_owned();
            }
        }

        if let Some(real_ip) = headers.get("x-real-ip")
            && let Ok(val) = real_ip.to_str()
        {
            let ip = val.trim();
            if !ip.is_empty() {
                return ip.to_owned();
            }
        }

        if let Some(forwarded) = headers.get(header::FORWARDED)
            && let Ok(val) = forwarded.to_str()
            && let Some(ip) = forwarded_for(val)
        {
            return ip.to_owned();
        }
    }

    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

/// `for=` node of the first element of a `Forwarded` header value
fn forwarded_for(value: &str) -> Option<&str> {
    value
        .split(',')
        .next()?
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("for"))
        .map(|(_, node)| node.trim().trim_matches('"'))
        .filter(|node| !node.is_empty())
}
