use std::process;

use log::{error, info};

use pingd::server::{Server, TcpServer};
use pingd::Config;

fn main() {
    if let Err(e) = stderrlog::new()
        .module("pingd")
        .verbosity(2)
        .timestamp(stderrlog::Timestamp::Millisecond)
        .init()
    {
        eprintln!("failed to initialize logging: {}", e);
    }

    let config = Config::default();
    info!("Server starting on {}", config.bind_addr);
    let mut server = match TcpServer::new(&config, pingd::app::routes()) {
        Ok(server) => server,
        Err(e) => {
            error!("failed to bind {}: {}", config.bind_addr, e);
            process::exit(1);
        }
    };
    Server::<()>::serve_forever(&mut server);
}
