//! pingpong Server Binary
//!
//! Opens the configured counter store and serves it over HTTP.

use clap::{Parser, ValueEnum};
use pingpong::config::FileWriteMode;
use pingpong::network::Server;
use pingpong::{store, Config, PingPong};
use tracing_subscriber::{fmt, EnvFilter};

/// Counter store selection
#[derive(ValueEnum, Clone, Copy, Debug)]
enum BackendArg {
    Memory,
    File,
    Database,
}

/// pingpong Server
#[derive(Parser, Debug)]
#[command(name = "pingpong-server")]
#[command(about = "Ping/pong counter service")]
#[command(version)]
struct Args {
    /// Counter store
    #[arg(short, long, value_enum, env = "COUNTER_BACKEND", default_value = "memory")]
    backend: BackendArg,

    /// Counter file for the file backend
    #[arg(long, env = "COUNTER_FILE", default_value = "./pingpong_count.txt")]
    counter_file: String,

    /// Rewrite the counter file in place instead of via temp file + rename
    #[arg(long)]
    in_place: bool,

    /// SQLite database for the database backend
    #[arg(long, env = "DATABASE_PATH", default_value = "./pingpong.db")]
    database: String,

    /// Listen port (binds 0.0.0.0)
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Maximum requests in flight before new ones get 503
    #[arg(short, long, default_value = "1024")]
    max_requests: usize,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value = "10000")]
    request_timeout_ms: u64,

    /// Database connection pool size
    #[arg(long, default_value = "8")]
    pool_size: usize,
}

#[tokio::main]
async fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pingpong=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("pingpong server v{}", pingpong::VERSION);

    let builder = Config::builder()
        .listen_addr(format!("0.0.0.0:{}", args.port))
        .max_concurrent_requests(args.max_requests)
        .request_timeout_ms(args.request_timeout_ms)
        .db_pool_size(args.pool_size)
        .file_write_mode(if args.in_place {
            FileWriteMode::Overwrite
        } else {
            FileWriteMode::AtomicRename
        });

    let config = match args.backend {
        BackendArg::Memory => builder.memory(),
        BackendArg::File => builder.file(&args.counter_file),
        BackendArg::Database => builder.database(&args.database),
    }
    .build();

    // A store that can't be opened is fatal: never serve from a default zero
    let store = match store::open(&config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open counter store: {}", e);
            std::process::exit(1);
        }
    };

    match store.current() {
        Ok(count) => tracing::info!("Counter starting at {}", count),
        Err(e) => {
            tracing::error!("Failed to read counter: {}", e);
            std::process::exit(1);
        }
    }

    let server = match Server::bind(config, PingPong::new(store)).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    let handle = server.shutdown_handle();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received Ctrl+C");
                handle.shutdown();
            }
            Err(e) => tracing::warn!("Failed to listen for Ctrl+C: {}", e),
        }
    });

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
