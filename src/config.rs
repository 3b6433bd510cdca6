//! Server configuration.
use std::thread;
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything a [`TcpServer`](crate::server::TcpServer) needs to know
/// besides its handler. Nothing is read from the environment.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use pingd::Config;
///
/// let config = Config::default()
///     .with_bind_addr("127.0.0.1:0")
///     .with_threads(1)
///     .with_timeout(Some(Duration::from_secs(1)))
///     .with_request_logging(false);
///
/// assert_eq!(config.bind_addr, "127.0.0.1:0");
/// assert!(config.enable_recovery);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Address to listen on, such as "0.0.0.0:8080".
    pub bind_addr: String,
    /// Number of threads.
    ///   - 0: create a new thread for each request
    ///   - 1: single-threaded
    ///   - 2+: threadpool with n threads
    pub threads: usize,
    /// Socket read and write timeout.
    pub timeout: Option<Duration>,
    /// Log one line per request at info level.
    pub enable_request_logging: bool,
    /// Answer 500 when a handler panics.
    pub enable_recovery: bool,
}

fn default_threads() -> usize {
    thread::available_parallelism().map_or(4, |n| n.get())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            threads: default_threads(),
            timeout: Some(DEFAULT_TIMEOUT),
            enable_request_logging: true,
            enable_recovery: true,
        }
    }
}

impl Config {
    pub fn with_bind_addr(mut self, bind_addr: &str) -> Self {
        self.bind_addr = bind_addr.to_string();
        self
    }
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
    pub fn with_request_logging(mut self, enable: bool) -> Self {
        self.enable_request_logging = enable;
        self
    }
    pub fn with_recovery(mut self, enable: bool) -> Self {
        self.enable_recovery = enable;
        self
    }
}
