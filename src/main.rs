//! castle-feed CLI entry point
//!
//! Location-aware feed client for historic points of interest

use castle_feed::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
