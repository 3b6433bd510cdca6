//! TCP HTTP server.
use std::io::prelude::*;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::*;

use crate::{
    config::Config,
    handler::Handler,
    recovery,
    request::{parser::RequestParser, Method},
    response::Response,
    runner::Runner,
    server::{server_name, Server, ServerError},
};

/// A single or multi-threaded TCP server, one request per connection.
pub struct TcpServer<H> {
    listener: TcpListener,
    runner: Runner,
    handler: Arc<H>,
    timeout: Option<Duration>,
    request_logging: bool,
    recovery: bool,
}

impl<H> TcpServer<H> {
    /// Bind `config.bind_addr` and create a server for `handler`.
    ///
    /// Fails only if the address cannot be bound.
    pub fn new(config: &Config, handler: H) -> Result<Self, std::io::Error> {
        Ok(Self {
            listener: TcpListener::bind(&config.bind_addr)?,
            runner: Runner::new(config.threads),
            handler: Arc::new(handler),
            timeout: config.timeout,
            request_logging: config.enable_request_logging,
            recovery: config.enable_recovery,
        })
    }
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }
}

impl<H, C> Server<C> for TcpServer<H>
where
    C: 'static + std::fmt::Debug + Default,
    H: 'static + Handler<Vec<u8>, Vec<u8>, Vec<u8>, C>,
{
    /// Accept one connection and serve its request on the runner.
    fn serve_one(&mut self) -> Result<(), ServerError> {
        let (mut stream, addr) = self.listener.accept()?;
        debug!("accepted connection from {:?}", addr);
        stream.set_read_timeout(self.timeout)?;
        stream.set_write_timeout(self.timeout)?;
        let handler = self.handler.clone();
        let request_logging = self.request_logging;
        let recover = self.recovery;
        self.runner.run(move || {
            let start = Instant::now();
            let mut context = C::default();
            trace!("CONTEXT {:?}", &context);
            debug!("parsing request");
            let mut parser = RequestParser::new(&mut stream);
            let response;
            let path;
            let method;
            let content_length;
            let head_only;
            match parser.parse() {
                Ok(request) => {
                    debug!("done parsing request");
                    trace!("REQUEST {:?}", &request);
                    content_length = request.content_length;
                    path = request.path.clone();
                    method = request.method.to_string();
                    head_only = request.method == Method::HEAD;
                    debug!("running request handler");
                    response = if recover {
                        recovery::recover(&path, || handler.handle(request, &mut context))
                    } else {
                        handler.handle(request, &mut context)
                    };
                }
                Err(e) => {
                    error!("{}", e);
                    response = Err(Response::new(400));
                    path = "<none>".to_string();
                    method = "<none>".to_string();
                    content_length = 0;
                    head_only = false;
                }
            };
            let (variant, response) = match response {
                Ok(response) => ("Ok", response),
                Err(response) => ("Err", response),
            };
            let response = response
                .with_header("Server", &server_name("TcpServer"))
                .with_header("Connection", "close");
            trace!("CONTEXT: {:?}", &context);
            trace!("RESPONSE: {:?}", &response);
            if request_logging {
                info!(
                    "{:?} - {}ms - {} {} {} ({} bytes) -> {} {} {} ({} bytes)",
                    std::thread::current().id(),
                    start.elapsed().as_millis(),
                    addr,
                    method,
                    path,
                    content_length,
                    variant,
                    response.status_code,
                    response.reason(),
                    response.content_length(),
                );
            }
            debug!("writing response");
            let bytes = if head_only {
                response.head_bytes()
            } else {
                response.to_bytes()
            };
            if let Err(e) = stream
                .write_all(&bytes)
                .and_then(|_| stream.flush())
            {
                error!("IO error: {}", e);
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::handler::RawResult;
    use crate::request::{Method, RawRequest};
    use crate::router::Router;
    use std::io::Read;
    use std::net::TcpStream;
    use std::thread;

    fn router() -> Router<Vec<u8>, Vec<u8>, Vec<u8>, ()> {
        Router::new()
            .with_method_route(Method::GET, "/hello", |_: RawRequest, _: &mut ()| -> RawResult {
                Ok(Response::new(200).with_body(b"hello".to_vec()))
            })
            .with_route("/panic", |_: RawRequest, _: &mut ()| -> RawResult {
                panic!("handler failure")
            })
            .with_route("/text", |_: RawRequest, _: &mut ()| -> RawResult {
                Ok(Response::text(200, "OK"))
            })
    }

    fn config(threads: usize) -> Config {
        Config::default()
            .with_bind_addr("127.0.0.1:0")
            .with_threads(threads)
            .with_timeout(Some(Duration::from_secs(5)))
    }

    fn exchange(addr: SocketAddr, request: &[u8]) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(request).unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    /// Serve `requests.len()` connections on a background thread.
    fn serve(config: Config, requests: &[&[u8]]) -> Vec<String> {
        let mut server = TcpServer::new(&config, router()).unwrap();
        let addr = server.local_addr().unwrap();
        let n = requests.len();
        let serving = thread::spawn(move || {
            for _ in 0..n {
                Server::<()>::serve_one(&mut server).unwrap();
            }
        });
        let responses = requests
            .iter()
            .map(|request| exchange(addr, request))
            .collect();
        serving.join().unwrap();
        responses
    }

    #[test]
    fn test_tcp_exchange() {
        let responses = serve(
            config(2),
            &[
                b"GET /hello HTTP/1.1\r\nHost: localhost\r\n\r\n",
                b"GET /nope HTTP/1.1\r\nHost: localhost\r\n\r\n",
                b"garbage\r\n\r\n",
            ],
        );
        assert!(responses[0].starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(responses[0].contains("Connection: close\r\n"));
        assert!(responses[0].ends_with("\r\n\r\nhello"));
        assert!(responses[1].starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(responses[2].starts_with("HTTP/1.1 400 Bad Request\r\n"));
    }

    #[test]
    fn test_tcp_recovery() {
        let responses = serve(
            config(1),
            &[
                b"GET /panic HTTP/1.1\r\n\r\n",
                b"GET /hello HTTP/1.1\r\n\r\n",
            ],
        );
        assert!(responses[0].starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
        assert!(responses[1].starts_with("HTTP/1.1 200 OK\r\n"));
    }

    #[test]
    fn test_tcp_without_recovery_drops_connection() {
        let responses = serve(
            config(2).with_recovery(false),
            &[
                b"GET /panic HTTP/1.1\r\n\r\n",
                b"GET /hello HTTP/1.1\r\n\r\n",
            ],
        );
        assert_eq!(responses[0], "");
        assert!(responses[1].starts_with("HTTP/1.1 200 OK\r\n"));
    }

    #[test]
    fn test_tcp_head_sends_no_body() {
        let responses = serve(
            config(1),
            &[
                b"HEAD /text HTTP/1.1\r\n\r\n",
                b"GET /text HTTP/1.1\r\n\r\n",
            ],
        );
        assert!(responses[0].starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(responses[0].ends_with("Content-Length: 2\r\n\r\n"));
        assert!(responses[1].ends_with("Content-Length: 2\r\n\r\nOK"));
    }

    #[test]
    fn test_bind_failure() {
        let taken = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = taken.local_addr().unwrap().to_string();
        let result = TcpServer::new(&config(1).with_bind_addr(&addr), router());
        assert!(result.is_err());
    }
}
