//! factlog HTTP server.
//!
//! Serves the read-path routes over a storage engine. The in-memory engine
//! backs this binary; production deployments plug a persistent engine into
//! the same contract.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use factlog::engine::MemoryEngine;
use factlog::transport;

/// Server configuration.
struct Config {
    /// Address to bind to.
    addr: SocketAddr,
    /// Log at debug level.
    debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:49110".parse().expect("default addr"),
            debug: false,
        }
    }
}

fn parse_args() -> Config {
    let args: Vec<String> = std::env::args().collect();
    let mut config = Config::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--host" | "-H" => {
                if i + 1 < args.len() {
                    let port = config.addr.port();
                    let host: std::net::IpAddr = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("error: invalid host address: {}", args[i + 1]);
                        std::process::exit(1);
                    });
                    config.addr = SocketAddr::new(host, port);
                    i += 2;
                } else {
                    eprintln!("error: --host requires a value");
                    std::process::exit(1);
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    let port: u16 = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("error: invalid port number: {}", args[i + 1]);
                        std::process::exit(1);
                    });
                    config.addr.set_port(port);
                    i += 2;
                } else {
                    eprintln!("error: --port requires a value");
                    std::process::exit(1);
                }
            }
            "--debug" => {
                config.debug = true;
                i += 1;
            }
            "--help" | "-h" => {
                println!("factlog-server - factlog HTTP server");
                println!();
                println!("USAGE:");
                println!("    factlog-server [OPTIONS]");
                println!();
                println!("OPTIONS:");
                println!("    -H, --host <ADDR>    Address to bind [default: 127.0.0.1]");
                println!("    -p, --port <PORT>    Port to listen on [default: 49110]");
                println!("        --debug          Enable debug logging");
                println!("    -h, --help           Print help information");
                std::process::exit(0);
            }
            arg => {
                eprintln!("error: unknown argument: {arg}");
                std::process::exit(1);
            }
        }
    }

    config
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args();

    let default_level = if config.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("factlog server v{}", factlog::VERSION);

    let engine = Arc::new(MemoryEngine::new());

    transport::serve(engine, config.addr).await?;

    info!("shut down");
    Ok(())
}
