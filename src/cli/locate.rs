//! Locate command handler
//!
//! Shows what the three-tier position acquisition produces.

use crate::cli::output;
use crate::config::Config;
use crate::error::Result;
use crate::location::{acquire, IpPositionSource, LastKnownStore};
use clap::Args;

/// Locate command arguments
#[derive(Args)]
pub struct LocateArgs {
    /// Drop the stored last-known fix first
    #[arg(long)]
    pub forget: bool,

    /// Output JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Run the locate command
pub async fn run(args: LocateArgs) -> Result<()> {
    let config = Config::load()?;
    let store = LastKnownStore::new();

    if args.forget {
        store.clear();
    }

    let acquired = acquire(
        &IpPositionSource::new(),
        &store,
        &config.fallback_anchor(),
    )
    .await;

    if args.json {
        let value = serde_json::json!({
            "label": acquired.label,
            "lat": acquired.coords.lat,
            "lng": acquired.coords.lng,
            "tier": match acquired.tier {
                crate::location::PositionTier::Live => "live",
                crate::location::PositionTier::LastKnown => "last_known",
                crate::location::PositionTier::Fallback => "fallback",
            },
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", output::render_position_text(&acquired));
    }

    Ok(())
}
