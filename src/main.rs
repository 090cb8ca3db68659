use clap::Parser;

use clinic_notify::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli::execute(cli).await
}
