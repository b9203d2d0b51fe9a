//! prop-scout CLI entry point
//!
//! Proximity ranking for property listings - CLI + web app

use prop_scout::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
