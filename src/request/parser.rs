use std::collections::HashMap;
use std::io::{self, Read};
use std::str;

use thiserror::Error;

use crate::request::{Header, Method, Request};

/// Largest accepted request head: request line, headers and blank line.
pub const MAX_HEAD_SIZE: usize = 8 * 1024;

const READ_CHUNK_SIZE: usize = 1024;

/// Reads HTTP/1.x requests from a stream.
///
/// The head is read in chunks until the blank line that ends it, up to
/// `max_head_size` bytes, then the body is read up to *Content-Length*.
/// Lines may end in CRLF or a bare LF. Bytes received past the end of a
/// request are kept for the next call to `parse`.
pub struct RequestParser<R> {
    stream: R,
    buffer: Vec<u8>,
    max_head_size: usize,
}

/// Owned request line and headers, so the buffer can be drained after
/// parsing.
struct Head {
    method: Method,
    path: String,
    query: String,
    fragment: String,
    headers: HashMap<Header, String>,
    content_length: usize,
}

impl<R: Read> RequestParser<R> {
    pub fn new(stream: R) -> Self {
        Self::with_max_head_size(stream, MAX_HEAD_SIZE)
    }
    pub fn with_max_head_size(stream: R, max_head_size: usize) -> Self {
        Self {
            stream,
            buffer: Vec::with_capacity(READ_CHUNK_SIZE),
            max_head_size,
        }
    }
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.stream
    }
    pub fn into_inner(self) -> R {
        self.stream
    }

    /// Parse the next request in the stream.
    pub fn parse(&mut self) -> Result<Request<Vec<u8>>> {
        let head_size = self.read_head()?;
        let head = parse_head(&self.buffer[..head_size]);
        self.buffer.drain(..head_size);
        let head = head?;
        let body = match head.content_length {
            0 => None,
            n => Some(self.body(head_size, n)?),
        };
        Ok(Request {
            method: head.method,
            path: head.path,
            query: head.query,
            fragment: head.fragment,
            headers: head.headers,
            body,
            content_length: head.content_length,
        })
    }

    /// Fill the buffer until it holds a complete head, return its size.
    fn read_head(&mut self) -> Result<usize> {
        let mut chunk = [0; READ_CHUNK_SIZE];
        loop {
            if let Some(end) = head_end(&self.buffer) {
                if end > self.max_head_size {
                    break;
                }
                return Ok(end);
            }
            if self.buffer.len() >= self.max_head_size {
                break;
            }
            let read_size = match self.stream.read(&mut chunk) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if read_size == 0 {
                return Err(RequestParserError::new(
                    self.buffer.len(),
                    "unexpected end of input",
                ));
            }
            self.buffer.extend_from_slice(&chunk[..read_size]);
        }
        Err(RequestParserError::new(
            self.max_head_size,
            "request head too large",
        ))
    }

    /// Take `content_length` bytes, buffered ones first. `position` is the
    /// offset of the body in the request.
    fn body(&mut self, position: usize, content_length: usize) -> Result<Vec<u8>> {
        let buffered = self.buffer.len().min(content_length);
        let mut body: Vec<u8> = self.buffer.drain(..buffered).collect();
        let missing = (content_length - body.len()) as u64;
        self.stream.by_ref().take(missing).read_to_end(&mut body)?;
        if body.len() < content_length {
            return Err(RequestParserError::new(
                position + body.len(),
                &format!("expected {} more bytes", content_length - body.len()),
            ));
        }
        Ok(body)
    }
}

/// Size of the head in `buffer`, including the blank line, if complete.
fn head_end(buffer: &[u8]) -> Option<usize> {
    buffer
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == b'\n')
        .find_map(|(i, _)| match &buffer[i + 1..] {
            [b'\n', ..] => Some(i + 2),
            [b'\r', b'\n', ..] => Some(i + 3),
            _ => None,
        })
}

/// Lines of the head with their offsets, line endings stripped.
fn lines(head: &str) -> impl Iterator<Item = (usize, &str)> {
    head.split_inclusive('\n').scan(0_usize, |offset, line| {
        let start = *offset;
        *offset += line.len();
        let line = line.strip_suffix('\n').unwrap_or(line);
        Some((start, line.strip_suffix('\r').unwrap_or(line)))
    })
}

/// RFC 7230 `tchar`, the alphabet of methods and header names.
fn is_token(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

fn parse_head(head: &[u8]) -> Result<Head> {
    let head = str::from_utf8(head).map_err(|e| {
        RequestParserError::new(e.valid_up_to(), "request head is not valid utf-8")
    })?;
    let mut lines = lines(head);
    let (method, target) = match lines.next() {
        Some((offset, line)) => request_line(offset, line)?,
        None => return Err(RequestParserError::new(0, "missing request line")),
    };
    let (path, query, fragment) = split_target(target);

    let mut headers: HashMap<Header, String> = HashMap::new();
    let mut content_length = 0;
    for (offset, line) in lines.take_while(|(_, line)| !line.is_empty()) {
        let (name, value) = header(offset, line)?;
        if name == Header::new("content-length") {
            if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
                return Err(RequestParserError::new(offset, "invalid content-length"));
            }
            content_length = value
                .parse()
                .map_err(|_| RequestParserError::new(offset, "invalid content-length"))?;
        }
        headers
            .entry(name)
            .and_modify(|joined| {
                joined.push_str(", ");
                joined.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    Ok(Head {
        method,
        path,
        query,
        fragment,
        headers,
        content_length,
    })
}

/// `method SP request-target SP HTTP-version`, any run of spaces or tabs
/// separating the parts.
fn request_line(offset: usize, line: &str) -> Result<(Method, &str)> {
    let mut parts = line
        .split(|c: char| c == ' ' || c == '\t')
        .filter(|part| !part.is_empty());
    let (method, target, version) = match (parts.next(), parts.next(), parts.next(), parts.next())
    {
        (Some(method), Some(target), Some(version), None) => (method, target, version),
        _ => return Err(RequestParserError::new(offset, "malformed request line")),
    };
    if !method.bytes().all(is_token) {
        return Err(RequestParserError::new(offset, "invalid HTTP method"));
    }
    if !target.starts_with('/') {
        return Err(RequestParserError::new(offset, "expected path starting with /"));
    }
    if target.bytes().any(|b| b.is_ascii_control()) {
        return Err(RequestParserError::new(
            offset,
            "control character in request target",
        ));
    }
    if version != "HTTP/1.1" && version != "HTTP/1.0" {
        return Err(RequestParserError::new(offset, "unsupported HTTP version"));
    }
    Ok((Method::from(method), target))
}

/// Split a target at the first `#`, then the path at the first `?`, so both
/// the query and the fragment may contain `?`.
fn split_target(target: &str) -> (String, String, String) {
    let (rest, fragment) = target.split_once('#').unwrap_or((target, ""));
    let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
    (path.to_string(), query.to_string(), fragment.to_string())
}

fn header(offset: usize, line: &str) -> Result<(Header, &str)> {
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| RequestParserError::new(offset, "expected ':' in header"))?;
    if name.is_empty() || !name.bytes().all(is_token) {
        return Err(RequestParserError::new(offset, "invalid header name"));
    }
    Ok((
        Header::new(name),
        value.trim_matches(|c: char| c == ' ' || c == '\t'),
    ))
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("error parsing request at position {position}: {reason}")]
pub struct RequestParserError {
    position: usize,
    reason: String,
}

impl RequestParserError {
    pub fn new(position: usize, reason: &str) -> Self {
        Self {
            position,
            reason: reason.to_string(),
        }
    }
}

impl From<io::Error> for RequestParserError {
    fn from(err: io::Error) -> Self {
        RequestParserError::new(0, &err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RequestParserError>;

#[cfg(test)]
mod test {
    use super::*;

    fn parse(bytes: &[u8]) -> Result<Request<Vec<u8>>> {
        RequestParser::new(bytes).parse()
    }

    fn target(request: &Request<Vec<u8>>) -> (&str, &str, &str) {
        (&request.path, &request.query, &request.fragment)
    }

    #[test]
    fn test_parser_get_ping() {
        let request = parse(b"GET /ping?verbose=1#top HTTP/1.1\r\nHost: localhost\r\n\r\n").unwrap();
        assert_eq!(request.method, Method::GET);
        assert_eq!(target(&request), ("/ping", "verbose=1", "top"));
        assert_eq!(request.header("host"), Some(&"localhost".to_string()));
        assert_eq!(request.body, None);
        assert_eq!(request.content_length, 0);
    }

    #[test]
    fn test_parser_http_10_without_headers() {
        let request = parse(b"GET /health HTTP/1.0\r\n\r\n").unwrap();
        assert_eq!(target(&request), ("/health", "", ""));
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_parser_post() {
        let request =
            parse(b"POST /health HTTP/1.1\r\nHost: localhost\r\nContent-Length: 3\r\n\r\nfoo")
                .unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body, Some(b"foo".to_vec()));
        assert_eq!(request.content_length, 3);
    }

    #[test]
    fn test_parser_extension_method() {
        let request = parse(b"PROPFIND /health HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.method, Method::Other("PROPFIND".to_string()));
        assert!(parse(b"GE(T /health HTTP/1.1\r\n\r\n").is_err());
    }

    #[test]
    fn test_parser_request_targets() {
        let request = parse(b"GET /ping?ids[]=1&q=a|b&o={} HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(target(&request), ("/ping", "ids[]=1&q=a|b&o={}", ""));

        let request = parse(b"GET /ping?next=/a?b#x?y HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(target(&request), ("/ping", "next=/a?b", "x?y"));

        let request = parse(b"GET /a:b;c@d!$&'()*+,=%20 HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.path, "/a:b;c@d!$&'()*+,=%20");
    }

    #[test]
    fn test_parser_bare_lf() {
        let request = parse(b"GET /health HTTP/1.1\nHost: localhost\n\n").unwrap();
        assert_eq!(request.path, "/health");
        assert_eq!(request.header("host"), Some(&"localhost".to_string()));

        let request = parse(b"POST /health HTTP/1.1\r\nContent-Length: 2\n\r\nok").unwrap();
        assert_eq!(request.body, Some(b"ok".to_vec()));
    }

    #[test]
    fn test_parser_header_values() {
        let request = parse(
            b"GET / HTTP/1.1\r\nAccept:text/html\r\nX-Tag: a \t\r\nx-tag: b\r\n\r\n",
        )
        .unwrap();
        assert_eq!(request.header("accept"), Some(&"text/html".to_string()));
        assert_eq!(request.header("X-Tag"), Some(&"a, b".to_string()));
    }

    #[test]
    fn test_parser_malformed_request_lines() {
        assert_eq!(
            parse(b"FOO").unwrap_err(),
            RequestParserError::new(3, "unexpected end of input")
        );
        assert_eq!(
            parse(b"not http at all\r\n\r\n").unwrap_err(),
            RequestParserError::new(0, "malformed request line")
        );
        assert!(parse(b"GET ping HTTP/1.1\r\n\r\n").is_err());
        assert!(parse(b"GET /ping HTTP/2.0\r\n\r\n").is_err());
        assert!(parse(b"GET /ping\x01 HTTP/1.1\r\n\r\n").is_err());
    }

    #[test]
    fn test_parser_malformed_headers() {
        assert_eq!(
            parse(b"GET / HTTP/1.1\r\nno colon\r\n\r\n").unwrap_err(),
            RequestParserError::new(16, "expected ':' in header")
        );
        assert!(parse(b"GET / HTTP/1.1\r\nHost : localhost\r\n\r\n").is_err());
        assert!(parse(b"GET / HTTP/1.1\r\n folded: value\r\n\r\n").is_err());
    }

    #[test]
    fn test_parser_invalid_content_length() {
        assert!(parse(b"POST / HTTP/1.1\r\nContent-Length: abc\r\n\r\n").is_err());
        assert!(parse(b"POST / HTTP/1.1\r\nContent-Length: +3\r\n\r\nfoo").is_err());
    }

    #[test]
    fn test_parser_content_length_too_long() {
        assert_eq!(
            parse(b"GET / HTTP/1.1\r\nHost: localhost\r\nContent-Length: 10\r\n\r\nfoo")
                .unwrap_err(),
            RequestParserError::new(58, "expected 7 more bytes")
        );
    }

    #[test]
    fn test_parser_head_too_large() {
        let mut request = b"GET / HTTP/1.1\r\n".to_vec();
        request.extend(b"X-Padding: ".iter().chain(&[b'a'; 64]));
        request.extend(b"\r\n\r\n");
        let mut parser = RequestParser::with_max_head_size(&request[..], 32);
        assert_eq!(
            parser.parse().unwrap_err(),
            RequestParserError::new(32, "request head too large")
        );
        assert!(RequestParser::new(&request[..]).parse().is_ok());
    }

    #[test]
    fn test_parser_keeps_pipelined_request() {
        let stream = &b"POST /a HTTP/1.1\r\nContent-Length: 1\r\n\r\nxGET /b HTTP/1.1\r\n\r\n"[..];
        let mut parser = RequestParser::new(stream);
        let first = parser.parse().unwrap();
        assert_eq!(first.path, "/a");
        assert_eq!(first.body, Some(b"x".to_vec()));
        let second = parser.parse().unwrap();
        assert_eq!(second.path, "/b");
        assert!(parser.parse().is_err());
    }
}
