use anyhow::Result;
use clap::Parser;
use prompt_selector_key_server::Args;

#[tokio::main]
async fn main() -> Result<()> {
    prompt_selector_key_server::run_main(Args::parse()).await
}
