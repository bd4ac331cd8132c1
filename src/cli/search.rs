//! Search command handler
//!
//! Resolves a free-text place name through the tiered resolver.

use crate::cli::output;
use crate::config::Config;
use crate::error::Result;
use crate::geo::resolver::SearchResolver;
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Place name to search for
    pub query: String,

    /// Maximum suggestions to show
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,

    /// Output JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Ignore the configured country filter
    #[arg(long)]
    pub any_country: bool,
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    let config = Config::load()?;

    let allowed_countries = if args.any_country {
        Vec::new()
    } else {
        config.search.allowed_countries.clone()
    };
    let limit = args.limit.unwrap_or(config.search.limit);

    let resolver = SearchResolver::new(allowed_countries, limit);
    let places = resolver.suggest(&args.query).await?;

    if args.json {
        println!("{}", output::render_places_json(&places)?);
    } else {
        print!("{}", output::render_places_text(&places));
    }

    Ok(())
}
