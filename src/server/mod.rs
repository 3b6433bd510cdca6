//! HTTP Server components.
use std::io;

use log::error;
use thiserror::Error;

pub mod stream;
pub mod tcp;

pub use stream::StreamServer;
pub use tcp::TcpServer;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("server error: io error: {0}")]
    Io(#[from] io::Error),
}

pub trait Server<C: Default> {
    /// Serve one request, must be implemented.
    fn serve_one(&mut self) -> Result<(), ServerError>;
    /// Serve requests forever (default implementation).
    fn serve_forever(&mut self) {
        loop {
            if let Err(e) = self.serve_one() {
                error!("{}", e);
            }
        }
    }
}

/// Value of the *Server* header.
pub(crate) fn server_name(kind: &str) -> String {
    format!("pingd::{}/{}", kind, crate::VERSION)
}
