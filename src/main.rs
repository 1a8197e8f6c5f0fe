use anyhow::Result;

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    rankcheck::cli::run().await
}
