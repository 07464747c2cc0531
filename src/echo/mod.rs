//! Request echo handler
//!
//! Turns one [`IncomingRequest`] into one [`HttpResult`]: optionally waits the
//! number of seconds given in the `d` query parameter, then returns a JSON
//! document describing the request together with timing information.
//!
//! The handler holds no state between invocations. Every fault is caught at
//! [`handle`] and reported as a 500 JSON document; nothing propagates to the
//! host.

pub mod delay;
pub mod error;
pub mod request;
pub mod response;
pub mod timing;

pub use delay::DelayParam;
pub use error::EchoError;
pub use request::IncomingRequest;
pub use response::{EchoResponse, EchoResponseBuilder, HttpResult, RequestDetails};
pub use timing::{Stopwatch, Timing};

/// Name greeted when the `name` query parameter is missing or empty
pub const DEFAULT_NAME: &str = "world";

/// Destination for the handler's diagnostic lines
pub trait LogSink: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Handle one request
pub async fn handle(request: &IncomingRequest, log: &dyn LogSink) -> HttpResult {
    match process(request, log).await {
        Ok(result) => result,
        Err(e) => fault_response(&e, log),
    }
}

/// Log a fault and build the 500 document for it
///
/// Also used by the host when a wire request cannot be turned into an
/// [`IncomingRequest`] in the first place.
pub fn fault_response(err: &EchoError, log: &dyn LogSink) -> HttpResult {
    log.error(&format!("Error in function: {err}"));
    HttpResult::internal_error(&err.to_string())
}

async fn process(request: &IncomingRequest, log: &dyn LogSink) -> Result<HttpResult, EchoError> {
    let stopwatch = Stopwatch::start();
    log.info(&format!(
        "Http function processed request for url \"{}\"",
        request.url()
    ));

    let path = request.path()?;
    log.info(&format!("Full URL: {}", request.url()));
    log.info(&format!("Pathname: {path}"));

    let name = request
        .query_param("name")
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_NAME);

    let raw_delay = request.query_param("d");
    let delay = DelayParam::parse(raw_delay);
    if delay == DelayParam::Ignored {
        log.info(&format!(
            "Ignoring delay value {:?}, not a non-negative integer",
            raw_delay.unwrap_or_default()
        ));
    }
    if delay.is_active() {
        log.info(&format!("Applying delay of {} seconds", delay.seconds()));
        tokio::time::sleep(delay.duration()).await;
    }

    let builder = EchoResponseBuilder::new(name)
        .delay_seconds(delay.seconds())
        .request_details(request);

    let timing = stopwatch.stop(delay.seconds());
    log.info(&format!("Request inspection completed for: {name}"));
    log.info(&format!(
        "Total processing time: {}ms ({}s) - Delay applied: {}s",
        timing.processing_time_ms,
        timing.seconds_header(),
        timing.delay_applied_seconds
    ));

    HttpResult::echo(&builder.build(timing))
}

#[cfg(test)]
mod tests {
    use super::response::{HEADER_PROCESSING_MS, HEADER_PROCESSING_SECONDS};
    use super::*;
    use serde_json::Value;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct CapturingLog {
        info: Mutex<Vec<String>>,
        error: Mutex<Vec<String>>,
    }

    impl LogSink for CapturingLog {
        fn info(&self, message: &str) {
            self.info.lock().unwrap().push(message.to_string());
        }

        fn error(&self, message: &str) {
            self.error.lock().unwrap().push(message.to_string());
        }
    }

    fn body(result: &HttpResult) -> Value {
        serde_json::from_str(&result.body).unwrap()
    }

    #[tokio::test]
    async fn test_no_query_answers_immediately() {
        let log = CapturingLog::default();
        let req = IncomingRequest::from_url("http://localhost:7071/api/httptrigger");

        let started = Instant::now();
        let result = handle(&req, &log).await;
        assert!(started.elapsed() < Duration::from_millis(500));

        assert_eq!(result.status, 200);
        let json = body(&result);
        assert_eq!(
            json["message"],
            "Hello, world! Here's everything about your request:"
        );
        assert_eq!(json["timing"]["delayAppliedSeconds"], 0);
        assert_eq!(json["requestDetails"]["query"], serde_json::json!({}));
        assert!(log.error.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_timing_header_matches_body() {
        let log = CapturingLog::default();
        let req = IncomingRequest::from_url("http://h/api/httptrigger?name=Zed");
        let result = handle(&req, &log).await;
        let json = body(&result);

        let header_ms: u64 = result.header(HEADER_PROCESSING_MS).unwrap().parse().unwrap();
        assert_eq!(json["timing"]["processingTimeMs"].as_u64(), Some(header_ms));

        let header_secs: f64 = result
            .header(HEADER_PROCESSING_SECONDS)
            .unwrap()
            .parse()
            .unwrap();
        let body_secs = json["timing"]["processingTimeSeconds"].as_f64().unwrap();
        assert!((header_secs - body_secs).abs() < 1e-9);
        assert_eq!(result.header("Content-Type"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_single_second_delay() {
        let log = CapturingLog::default();
        let req = IncomingRequest::from_url("http://h/api/httptrigger?d=1");

        let started = Instant::now();
        let result = handle(&req, &log).await;
        assert!(started.elapsed() >= Duration::from_secs(1));

        let json = body(&result);
        let message = json["message"].as_str().unwrap();
        assert!(message.contains("I waited 1 second as requested."));
        assert_eq!(json["timing"]["delayAppliedSeconds"], 1);
        assert!(json["timing"]["processingTimeMs"].as_u64().unwrap() >= 1000);
        assert!(log
            .info
            .lock()
            .unwrap()
            .iter()
            .any(|l| l == "Applying delay of 1 seconds"));
    }

    #[tokio::test]
    async fn test_two_second_delay_with_name() {
        let log = CapturingLog::default();
        let req = IncomingRequest::from_url("http://h/api/httptrigger?name=Ann&d=2");

        let started = Instant::now();
        let result = handle(&req, &log).await;
        assert!(started.elapsed() >= Duration::from_secs(2));

        assert_eq!(result.status, 200);
        let json = body(&result);
        assert!(json["message"]
            .as_str()
            .unwrap()
            .starts_with("Hello, Ann! I waited 2 seconds as requested."));
        assert_eq!(json["timing"]["delayAppliedSeconds"], 2);
    }

    #[tokio::test]
    async fn test_zero_delay_has_no_wait_clause() {
        let log = CapturingLog::default();
        let req = IncomingRequest::from_url("http://h/api/httptrigger?d=0");
        let json = body(&handle(&req, &log).await);
        assert_eq!(
            json["message"],
            "Hello, world! Here's everything about your request:"
        );
        assert_eq!(json["timing"]["delayAppliedSeconds"], 0);
    }

    #[tokio::test]
    async fn test_invalid_delay_is_normalised_to_zero() {
        let log = CapturingLog::default();
        let req = IncomingRequest::from_url("http://h/api/httptrigger?d=abc");

        let started = Instant::now();
        let result = handle(&req, &log).await;
        assert!(started.elapsed() < Duration::from_millis(500));

        assert_eq!(result.status, 200);
        let json = body(&result);
        assert_eq!(
            json["message"],
            "Hello, world! Here's everything about your request:"
        );
        assert_eq!(json["timing"]["delayAppliedSeconds"], 0);
        assert_eq!(json["requestDetails"]["query"]["d"], "abc");
        assert!(log
            .info
            .lock()
            .unwrap()
            .iter()
            .any(|l| l.starts_with("Ignoring delay value \"abc\"")));
    }

    #[tokio::test]
    async fn test_negative_delay_is_normalised_to_zero() {
        let log = CapturingLog::default();
        let req = IncomingRequest::from_url("http://h/api/httptrigger?d=-5");
        let json = body(&handle(&req, &log).await);
        assert_eq!(json["timing"]["delayAppliedSeconds"], 0);
        assert!(!json["message"].as_str().unwrap().contains("waited"));
    }

    #[tokio::test]
    async fn test_empty_name_falls_back_to_default() {
        let log = CapturingLog::default();
        let req = IncomingRequest::from_url("http://h/api/httptrigger?name=");
        let json = body(&handle(&req, &log).await);
        assert_eq!(
            json["message"],
            "Hello, world! Here's everything about your request:"
        );
    }

    #[tokio::test]
    async fn test_headers_and_query_echoed_unmodified() {
        let log = CapturingLog::default();
        let req = IncomingRequest::from_url("http://h/api/httptrigger?name=Ann&extra=a%26b")
            .with_header("x-test", "abc")
            .with_header("user-agent", "curl/8.0");
        let json = body(&handle(&req, &log).await);

        assert_eq!(
            json["requestDetails"]["headers"],
            serde_json::json!({"user-agent": "curl/8.0", "x-test": "abc"})
        );
        assert_eq!(
            json["requestDetails"]["query"],
            serde_json::json!({"name": "Ann", "extra": "a&b"})
        );
    }

    #[tokio::test]
    async fn test_path_does_not_change_behaviour() {
        let log = CapturingLog::default();
        let a = handle(&IncomingRequest::from_url("http://h/api/httptrigger?name=X"), &log).await;
        let b = handle(&IncomingRequest::from_url("http://h/elsewhere?name=X"), &log).await;
        assert_eq!(body(&a)["message"], body(&b)["message"]);
        assert!(log.info.lock().unwrap().iter().any(|l| l == "Pathname: /elsewhere"));
    }

    #[tokio::test]
    async fn test_malformed_url_yields_500() {
        let log = CapturingLog::default();
        let req = IncomingRequest::from_url("/api/httptrigger?name=Ann");
        let result = handle(&req, &log).await;

        assert_eq!(result.status, 500);
        assert_eq!(result.header("Content-Type"), Some("application/json"));
        assert_eq!(
            result.body,
            r#"{"error":"Internal server error","details":"Invalid URL: relative URL without a base"}"#
        );
        let errors = log.error.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("relative URL without a base"));
    }

    #[test]
    fn test_fault_response_logs_and_builds_500() {
        let log = CapturingLog::default();
        let err = EchoError::MalformedRequest("header 'x-bin' is not valid UTF-8".to_string());
        let result = fault_response(&err, &log);
        let json = body(&result);
        assert_eq!(json["error"], "Internal server error");
        assert_eq!(
            json["details"],
            "Malformed request: header 'x-bin' is not valid UTF-8"
        );
        assert_eq!(log.error.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delays_do_not_block_each_other() {
        let log = CapturingLog::default();
        let a = IncomingRequest::from_url("http://h/api/httptrigger?d=1&name=A");
        let b = IncomingRequest::from_url("http://h/api/httptrigger?d=1&name=B");

        let started = Instant::now();
        let (ra, rb) = tokio::join!(handle(&a, &log), handle(&b, &log));
        let elapsed = started.elapsed();

        assert_eq!(ra.status, 200);
        assert_eq!(rb.status, 200);
        assert!(elapsed >= Duration::from_secs(1));
        assert!(elapsed < Duration::from_millis(1900));
    }
}
