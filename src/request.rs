//! Read-only request projection handed to the detection engine
//!
//! The host tool implements [`RequestView`] over its own request type.
//! [`HttpRequest`] is an owned implementation used by the CLI and tests; it
//! can be built by hand or parsed from raw HTTP/1.x bytes.

use std::borrow::Cow;

use url::form_urlencoded;

/// One header as received
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// What the engine may look at in a request
///
/// Missing data is always empty, never an error.
pub trait RequestView {
    /// Headers in the order they were received; names may repeat
    fn headers(&self) -> Vec<Header<'_>>;

    /// Full request URL
    fn url(&self) -> &str;

    /// Body decoded as text
    fn body(&self) -> Cow<'_, str>;

    /// Request method, used for audit records only
    fn method(&self) -> &str {
        ""
    }

    /// First value of the named header (case-insensitive), or `""`
    fn header_value(&self, name: &str) -> &str {
        self.headers()
            .into_iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value)
            .unwrap_or("")
    }

    /// Query string with percent and `+` escapes decoded
    fn query(&self) -> String {
        decode_query(self.url())
    }
}

/// Decode the query component of a URL
///
/// Returns `""` when there is no query. Pairs are re-joined with `&`.
pub fn decode_query(url: &str) -> String {
    let before_fragment = url.split('#').next().unwrap_or("");
    let Some((_, raw)) = before_fragment.split_once('?') else {
        return String::new();
    };

    form_urlencoded::parse(raw.as_bytes())
        .map(|(key, value)| {
            if value.is_empty() {
                key.into_owned()
            } else {
                format!("{}={}", key, value)
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// An owned HTTP request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Create a request with no headers and an empty body
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Append a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replace the body
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Parse raw HTTP/1.x request bytes
    ///
    /// Parsing is lenient: a malformed request line yields empty method and
    /// URL, header lines without a colon are dropped, and whatever follows the
    /// first blank line is the body. Origin-form targets are joined with the
    /// `Host` header to give a full URL.
    pub fn parse(raw: &[u8]) -> Self {
        let (head, body) = split_head(raw);
        let head = String::from_utf8_lossy(head);
        let mut lines = head.lines();

        let request_line = lines.next().unwrap_or("");
        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap_or("").to_string();
        let target = parts.next().unwrap_or("").to_string();

        let headers: Vec<(String, String)> = lines
            .filter_map(|line| {
                let (name, value) = line.split_once(':')?;
                Some((name.trim().to_string(), value.trim().to_string()))
            })
            .collect();

        let mut request = Self {
            method,
            url: String::new(),
            headers,
            body: body.to_vec(),
        };
        request.url = absolute_url(&target, request.header_value("Host"));
        request
    }
}

impl RequestView for HttpRequest {
    fn headers(&self) -> Vec<Header<'_>> {
        self.headers
            .iter()
            .map(|(name, value)| Header { name, value })
            .collect()
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn body(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    fn method(&self) -> &str {
        &self.method
    }
}

/// Split at the first blank line, accepting CRLF or bare LF
fn split_head(raw: &[u8]) -> (&[u8], &[u8]) {
    if let Some(pos) = find(raw, b"\r\n\r\n") {
        return (&raw[..pos], &raw[pos + 4..]);
    }
    if let Some(pos) = find(raw, b"\n\n") {
        return (&raw[..pos], &raw[pos + 2..]);
    }
    (raw, &[])
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn absolute_url(target: &str, host: &str) -> String {
    if target.is_empty() {
        return String::new();
    }
    if url::Url::parse(target).is_ok() || host.is_empty() || !target.starts_with('/') {
        return target.to_string();
    }
    format!("http://{}{}", host, target)
}
