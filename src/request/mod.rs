//! HTTP request and parser.
use std::collections::HashMap;
use std::fmt;

pub use header::*;

pub mod header;
pub mod parser;

/// An HTTP Request.
///
/// Only `method` and `path` take part in routing; `query` and `fragment`
/// are kept for handlers that want them.
#[derive(Debug, Clone, PartialEq)]
pub struct Request<T> {
    pub method: Method,
    pub path: String,
    pub query: String,
    pub fragment: String,
    pub headers: HashMap<Header, String>,
    pub body: Option<T>,
    pub content_length: usize,
}

pub type RawRequest = Request<Vec<u8>>;

impl<T> Default for Request<T> {
    fn default() -> Self {
        Self {
            method: Method::GET,
            path: "/".to_string(),
            query: "".to_string(),
            fragment: "".to_string(),
            headers: vec![(Header::new("Host"), "localhost".to_string())]
                .into_iter()
                .collect(),
            body: None,
            content_length: 0,
        }
    }
}

impl<T> Request<T> {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            ..Self::default()
        }
    }
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(Header::new(name), value.to_string());
        self
    }
    pub fn header(&self, name: &str) -> Option<&String> {
        self.headers.get(&Header::new(name))
    }
}

/// Request method. Names other than the standard ones are kept verbatim
/// in `Other`; methods are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    PATCH,
    DELETE,
    CONNECT,
    OPTIONS,
    TRACE,
    Other(String),
}

impl Method {
    pub fn as_str(&self) -> &str {
        match self {
            Self::GET => "GET",
            Self::HEAD => "HEAD",
            Self::POST => "POST",
            Self::PUT => "PUT",
            Self::PATCH => "PATCH",
            Self::DELETE => "DELETE",
            Self::CONNECT => "CONNECT",
            Self::OPTIONS => "OPTIONS",
            Self::TRACE => "TRACE",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for Method {
    fn from(name: &str) -> Self {
        match name {
            "GET" => Self::GET,
            "HEAD" => Self::HEAD,
            "POST" => Self::POST,
            "PUT" => Self::PUT,
            "PATCH" => Self::PATCH,
            "DELETE" => Self::DELETE,
            "CONNECT" => Self::CONNECT,
            "OPTIONS" => Self::OPTIONS,
            "TRACE" => Self::TRACE,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
