//! pingpong CLI Client
//!
//! Command-line interface for a running pingpong server.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pingpong::network::CountBody;

/// pingpong CLI
#[derive(Parser, Debug)]
#[command(name = "pingpong-cli")]
#[command(about = "CLI for the pingpong counter service")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Increment the counter and print the pong
    Ping,

    /// Print the current count
    Count,
}

async fn run(args: &Args) -> reqwest::Result<String> {
    let client = reqwest::Client::new();

    match args.command {
        Commands::Ping => {
            let url = format!("http://{}/", args.server);
            client.get(url).send().await?.error_for_status()?.text().await
        }
        Commands::Count => {
            let url = format!("http://{}/count", args.server);
            let body: CountBody = client.get(url).send().await?.error_for_status()?.json().await?;
            Ok(body.count.to_string())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
