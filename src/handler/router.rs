//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method and route checks, conversion
//! into an [`IncomingRequest`], dispatch to the echo handler and access logging.

use crate::config::AppState;
use crate::echo::{self, EchoError, IncomingRequest};
use crate::http;
use crate::logger::{self, AccessLogEntry, HandlerLog};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::header::{HeaderName, HeaderValue, HOST, REFERER, USER_AGENT};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Local};

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let arrived_at = Local::now();
    let server_name = state.config.http.server_name.as_str();

    let response = if req.uri().path() != state.config.server.route {
        http::build_404_response(server_name)
    } else if req.method() != Method::GET {
        logger::log_warning(&format!("Method not allowed: {}", req.method()));
        http::build_405_response(server_name)
    } else {
        let result = match incoming_request(&req) {
            Ok(incoming) => echo::handle(&incoming, &HandlerLog).await,
            Err(e) => echo::fault_response(&e, &HandlerLog),
        };
        http::build_result_response(result, server_name)
    };

    if state.config.logging.access_log {
        let entry = access_entry(&req, &response, peer_addr, arrived_at, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Build the handler's view of a wire request
///
/// Origin-form targets are made absolute with the `Host` header (or
/// `localhost` when it is missing).
pub fn incoming_request<B>(req: &Request<B>) -> Result<IncomingRequest, EchoError> {
    let uri = req.uri();
    let url = if uri.scheme().is_some() && uri.authority().is_some() {
        uri.to_string()
    } else {
        let host = match req.headers().get(HOST) {
            Some(value) => header_text(&HOST, value)?,
            None => "localhost",
        };
        let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());
        format!("http://{host}{path_and_query}")
    };

    req.headers()
        .iter()
        .try_fold(
            IncomingRequest::from_url(url),
            |incoming, (name, value)| -> Result<IncomingRequest, EchoError> {
                Ok(incoming.with_header(name.as_str(), header_text(name, value)?))
            },
        )
}

/// Header value as text; any valid UTF-8 is accepted, other bytes are a fault
fn header_text<'a>(name: &HeaderName, value: &'a HeaderValue) -> Result<&'a str, EchoError> {
    std::str::from_utf8(value.as_bytes()).map_err(|_| {
        EchoError::MalformedRequest(format!("header '{name}' is not valid UTF-8"))
    })
}

fn access_entry<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    arrived_at: DateTime<Local>,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
        arrived_at,
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
