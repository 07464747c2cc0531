//! Echo response document and the transport-neutral HTTP result

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::EchoError;
use super::request::IncomingRequest;
use super::timing::Timing;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const HEADER_PROCESSING_MS: &str = "X-Processing-Time-Ms";
pub const HEADER_PROCESSING_SECONDS: &str = "X-Processing-Time-Seconds";

/// Body of a successful echo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoResponse {
    pub message: String,
    pub timing: Timing,
    pub request_details: RequestDetails,
}

/// Copy of the request metadata, exactly as received
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDetails {
    pub headers: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
}

impl RequestDetails {
    pub fn from_request(request: &IncomingRequest) -> Self {
        Self {
            headers: request.headers().clone(),
            query: request.query_map(),
        }
    }
}

/// Builder for [`EchoResponse`]; the timing block is supplied last, once the clock has stopped
#[derive(Debug, Clone)]
pub struct EchoResponseBuilder {
    name: String,
    delay_seconds: u64,
    details: RequestDetails,
}

impl EchoResponseBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            delay_seconds: 0,
            details: RequestDetails::default(),
        }
    }

    #[must_use]
    pub const fn delay_seconds(mut self, seconds: u64) -> Self {
        self.delay_seconds = seconds;
        self
    }

    #[must_use]
    pub fn request_details(mut self, request: &IncomingRequest) -> Self {
        self.details = RequestDetails::from_request(request);
        self
    }

    pub fn build(self, timing: Timing) -> EchoResponse {
        EchoResponse {
            message: compose_message(&self.name, self.delay_seconds),
            timing,
            request_details: self.details,
        }
    }
}

/// Greeting line, with a wait clause when a delay was applied
pub fn compose_message(name: &str, delay_seconds: u64) -> String {
    if delay_seconds == 0 {
        return format!("Hello, {name}! Here's everything about your request:");
    }
    let plural = if delay_seconds == 1 { "" } else { "s" };
    format!(
        "Hello, {name}! I waited {delay_seconds} second{plural} as requested. \
         Here's everything about your request:"
    )
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'static str,
    details: &'a str,
}

/// Status, headers and body produced by the handler, independent of any HTTP library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResult {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResult {
    /// 200 with the pretty-printed echo document and timing headers
    pub fn echo(response: &EchoResponse) -> Result<Self, EchoError> {
        let body = serde_json::to_string_pretty(response)?;
        Ok(Self {
            status: 200,
            headers: vec![
                ("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string()),
                (
                    HEADER_PROCESSING_MS.to_string(),
                    response.timing.millis_header(),
                ),
                (
                    HEADER_PROCESSING_SECONDS.to_string(),
                    response.timing.seconds_header(),
                ),
            ],
            body,
        })
    }

    /// 500 with `{"error": "Internal server error", "details": ...}`
    pub fn internal_error(details: &str) -> Self {
        let body = serde_json::to_string(&ErrorBody {
            error: "Internal server error",
            details,
        })
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        Self {
            status: 500,
            headers: vec![("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string())],
            body,
        }
    }

    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
