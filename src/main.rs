use anyhow::Result;
use clap::Parser;
use vayu_tui::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    vayu_tui::run(cli).await
}
