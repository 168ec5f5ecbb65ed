#![warn(clippy::all)]

use trivia_api::{config, run, setup_store};

#[tokio::main]
async fn main() -> Result<(), handle_errors::Error> {
    let config = config::Config::new()?;

    let store = setup_store(&config).await?;

    tracing::info!("Trivia API build ID {}", env!("CARGO_PKG_VERSION"));

    run(&config, store).await;

    Ok(())
}
