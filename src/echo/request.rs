//! Structured request handed to the echo handler
//!
//! The host fills this in from the wire request; the handler only reads it.

use std::collections::BTreeMap;

use url::form_urlencoded;
use url::Url;

use super::error::EchoError;

/// Request metadata the echo handler works from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomingRequest {
    url: String,
    headers: BTreeMap<String, String>,
    query: Vec<(String, String)>,
}

impl IncomingRequest {
    /// Create a request from its URL, taking query parameters from the URL's query string
    ///
    /// The URL is not validated here; the handler reports an unparsable URL
    /// as an internal fault when it processes the request.
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let query = url
            .split_once('?')
            .map(|(_, rest)| {
                let rest = rest.split_once('#').map_or(rest, |(q, _)| q);
                form_urlencoded::parse(rest.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();

        Self {
            url,
            headers: BTreeMap::new(),
            query,
        }
    }

    /// Add a header; a repeated name (any casing) is folded into one `", "`-joined value
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        let existing = self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name));
        match existing {
            Some((_, current)) => {
                current.push_str(", ");
                current.push_str(&value);
            }
            None => {
                self.headers.insert(name, value);
            }
        }
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub const fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Query parameters in order of appearance, repeats included
    #[cfg(test)]
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// First value for a query parameter
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Query parameters as a mapping; the last value wins for repeated names
    pub fn query_map(&self) -> BTreeMap<String, String> {
        self.query.iter().cloned().collect()
    }

    /// Path component of the request URL
    pub fn path(&self) -> Result<String, EchoError> {
        let parsed = Url::parse(&self.url)?;
        Ok(parsed.path().to_string())
    }
}
