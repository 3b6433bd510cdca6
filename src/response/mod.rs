//! HTTP responses.
pub mod status;

/// An HTTP response.
///
/// Handlers build one with the `with_*` methods, the server adds its own
/// headers and frames it with [`to_bytes`](Response::to_bytes), or
/// [`head_bytes`](Response::head_bytes) when answering a HEAD request.
///
/// # Example
/// ```
/// use pingd::response::RawResponse;
///
/// let response = RawResponse::text(200, "OK").with_header("Cache-Control", "no-store");
///
/// assert_eq!(response.reason(), "OK");
/// assert_eq!(response.header("cache-control"), Some("no-store"));
/// assert!(response.head_bytes().ends_with(b"Content-Length: 2\r\n\r\n"));
/// assert!(response.to_bytes().ends_with(b"\r\n\r\nOK"));
/// ```
#[derive(Debug)]
pub struct Response<T> {
    pub status_code: u16,
    headers: Vec<(String, String)>,
    pub body: Option<T>,
}

pub type RawResponse = Response<Vec<u8>>;

impl<T> Response<T> {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            headers: vec![],
            body: None,
        }
    }
    /// Reason phrase for the status code.
    pub fn reason(&self) -> &'static str {
        status::reason(self.status_code).unwrap_or("Unknown")
    }
    /// Value of the first header with this name, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
    pub fn with_header(mut self, header: &str, value: &str) -> Self {
        self.headers.push((header.to_string(), value.to_string()));
        self
    }
    pub fn with_body(mut self, body: T) -> Self {
        self.body = Some(body);
        self
    }
    /// Keep status and headers, drop the body.
    pub fn into_raw(self) -> RawResponse {
        Response {
            status_code: self.status_code,
            headers: self.headers,
            body: None,
        }
    }
}

impl Response<Vec<u8>> {
    /// Plain text response, `text/plain; charset=utf-8`.
    pub fn text(status_code: u16, text: &str) -> Self {
        Self::new(status_code)
            .with_header("Content-Type", "text/plain; charset=utf-8")
            .with_body(text.as_bytes().to_vec())
    }
    pub fn content_length(&self) -> usize {
        self.body.as_ref().map_or(0, Vec::len)
    }
    /// Status line and headers. *Content-Length* is set from the body, and
    /// left out when there is none.
    pub fn head_bytes(&self) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {} {}\r\n", self.status_code, self.reason());
        for (header, value) in &self.headers {
            head.push_str(&format!("{}: {}\r\n", header, value));
        }
        match self.content_length() {
            0 => (),
            n => head.push_str(&format!("Content-Length: {}\r\n", n)),
        }
        head.push_str("\r\n");
        head.into_bytes()
    }
    /// The complete response.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.head_bytes();
        if let Some(body) = &self.body {
            bytes.extend_from_slice(body);
        }
        bytes
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_response_bytes() {
        let response = RawResponse::new(500)
            .with_header("Connection", "close")
            .with_body(b"foobar!".to_vec());

        assert_eq!(
            &response.to_bytes()[..],
            &b"HTTP/1.1 500 Internal Server Error\r\nConnection: close\r\nContent-Length: 7\r\n\r\nfoobar!"[..]
        );
    }

    #[test]
    fn test_head_bytes_omit_body() {
        let response = RawResponse::text(200, "OK");
        assert_eq!(
            &response.head_bytes()[..],
            &b"HTTP/1.1 200 OK\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: 2\r\n\r\n"[..]
        );
    }

    #[test]
    fn test_response_without_body_has_no_content_length() {
        assert_eq!(
            &RawResponse::new(404).to_bytes()[..],
            &b"HTTP/1.1 404 Not Found\r\n\r\n"[..]
        );
    }

    #[test]
    fn test_unregistered_status() {
        let response: Response<String> = Response::new(599).with_body("x".to_string());
        assert_eq!(response.reason(), "Unknown");
        assert_eq!(response.into_raw().body, None);
    }
}
