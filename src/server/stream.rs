//! HTTP server over any byte stream.
use std::io::{Read, Write};

use log::error;

use crate::{
    handler::Handler,
    request::{parser::RequestParser, Method},
    response::Response,
    server::{server_name, Server, ServerError},
};

/// Serve HTTP requests over a generic stream. The stream is kept open and
/// each call to `serve_one` answers the next request on it.
///
/// # Example
/// ```
/// use pingd::prelude::*;
/// use pingd::io::MemoryStream;
/// use pingd::server::StreamServer;
///
/// fn handle_hello(_req: RawRequest, _: &mut ()) -> RawResult {
///     Ok(Response::new(200).with_body(b"Hello!".to_vec()))
/// }
///
/// let stream = MemoryStream::new(b"GET / HTTP/1.1\r\nHost:localhost\r\n\r\n");
/// let mut server = StreamServer::new(stream, handle_hello);
/// Server::<()>::serve_one(&mut server).unwrap();
///
/// assert_eq!(
///     std::str::from_utf8(&server.into_inner().into_output()).unwrap(),
///     &format!(
///       "HTTP/1.1 200 OK\r\n\
///        Server: pingd::StreamServer/{}\r\n\
///        Connection: keep-alive\r\n\
///        Content-Length: 6\r\n\
///        \r\n\
///        Hello!", pingd::VERSION
///     )
/// );
/// ```
pub struct StreamServer<H, S> {
    handler: H,
    parser: RequestParser<S>,
}

impl<H, S: Read> StreamServer<H, S> {
    pub fn new(stream: S, handler: H) -> Self {
        Self {
            handler,
            parser: RequestParser::new(stream),
        }
    }
    pub fn into_inner(self) -> S {
        self.parser.into_inner()
    }
}

impl<H, S, C> Server<C> for StreamServer<H, S>
where
    C: Default,
    H: Handler<Vec<u8>, Vec<u8>, Vec<u8>, C>,
    S: Read + Write,
{
    fn serve_one(&mut self) -> Result<(), ServerError> {
        let (head_only, response) = match self.parser.parse() {
            Ok(request) => (
                request.method == Method::HEAD,
                self.handler.handle(request, &mut C::default()),
            ),
            Err(e) => {
                error!("{}", e);
                (false, Err(Response::new(400)))
            }
        };
        let response = response
            .unwrap_or_else(|response| response)
            .with_header("Server", &server_name("StreamServer"))
            .with_header("Connection", "keep-alive");
        let bytes = if head_only {
            response.head_bytes()
        } else {
            response.to_bytes()
        };
        let stream = self.parser.get_mut();
        stream.write_all(&bytes)?;
        stream.flush()?;
        Ok(())
    }
}
