use clap::Parser;
use docchat_cli::{Cli, init_logging, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    run(Cli::parse()).await
}
