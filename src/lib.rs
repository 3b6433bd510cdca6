//! A small HTTP service answering `GET /ping` and `/health`, plus a YAML
//! [decoder](crate::content::yaml::decode) producing untyped mappings.
//! * Multi-threaded [TCP server](crate::server::tcp::TcpServer) driven by an explicit [`Config`]
//! * Method and exact path [request routing](crate::router::Router)
//! * [JSON](crate::content::json) and [YAML](crate::content::yaml) bodies with `serde`
//! * Dynamically typed [values](crate::content::value::Value)
//!
//! # Example
//! ```
//! use pingd::io::MemoryStream;
//! use pingd::prelude::*;
//! use pingd::server::StreamServer;
//!
//! let stream = MemoryStream::new(b"GET /ping HTTP/1.1\r\nAccept: */*\r\n\r\n");
//! let mut server = StreamServer::new(stream, pingd::app::routes());
//! Server::<()>::serve_one(&mut server).unwrap();
//!
//! let written = server.into_inner().into_output();
//! let response = std::str::from_utf8(&written).unwrap();
//! assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
//! assert!(response.ends_with(r#"{"message":"pong"}"#));
//!
//! let mapping = pingd::decode(b"service: pingd\nports: [8080]\n").unwrap();
//! assert_eq!(mapping["service"].as_str(), Some("pingd"));
//! ```
#[cfg(feature = "json")]
pub mod app;
pub mod config;
pub mod content;
pub mod handler;
pub mod io;
pub mod prelude;
pub mod recovery;
pub mod request;
pub mod response;
pub mod router;
pub mod runner;
pub mod server;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub use crate::config::Config;
pub use crate::content::mediatypes::*;
pub use crate::content::value::{Mapping, Number, Value};
#[cfg(feature = "yaml")]
pub use crate::content::yaml::{decode, DecodeError};
pub use crate::content::{Deserialize, MediaType, SerializationError, Serialize};
pub use crate::handler::{Handler, RawResult, Res};
pub use crate::request::{Header, Method, RawRequest, Request};
pub use crate::response::{RawResponse, Response};
pub use crate::server::Server;
