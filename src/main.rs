use clap::Parser;
use isd_lite_processor::cli::{run, Cli};
use isd_lite_processor::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
