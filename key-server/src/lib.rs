#![deny(clippy::print_stdout)]

mod config;
mod routes;

pub use config::Config;
pub use config::LoggingConfig;
pub use config::ServerConfig;
pub use config::load_config;
pub use config::resolve_listen_addr;
pub use routes::ErrorResponse;
pub use routes::KeysResponse;
pub use routes::ProcessResponse;
pub use routes::router;
pub use routes::serve;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use prompt_selector_core::SelectorEngine;
use prompt_selector_core::node_descriptor;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "prompt-selector-key-server",
    about = "Serves prompt selector nodes and their key lists over HTTP"
)]
pub struct Args {
    /// Path to a TOML config file. Defaults apply when it is absent.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Address to listen on, overriding `server.listen_addr`.
    #[arg(long, global = true)]
    pub listen: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Print the node descriptor as JSON.
    Descriptor,
}

pub async fn run_main(args: Args) -> Result<()> {
    let mut cfg = load_config(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        cfg.server.listen_addr = listen;
    }

    match args.command.unwrap_or(Command::Serve) {
        Command::Descriptor => print_descriptor(),
        Command::Serve => {
            init_tracing(&cfg.logging.level);
            let addr = resolve_listen_addr(&cfg)?;
            let engine = Arc::new(SelectorEngine::new());
            serve(engine, addr).await
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_descriptor() -> Result<()> {
    let json = serde_json::to_string_pretty(&node_descriptor())?;
    println!("{json}");
    Ok(())
}

fn init_tracing(default_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
