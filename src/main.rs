use anyhow::Result;

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    shopsafe::cli::run().await
}
