//! Output rendering for CLI commands
//!
//! Human-readable text by default, pretty JSON with `--json`.

use crate::error::Result;
use crate::feed::FeedSnapshot;
use crate::geo::ResolvedPlace;
use crate::location::{AcquiredPosition, PositionTier};

/// Render a feed snapshot as human-readable text
pub fn render_feed_text(snapshot: &FeedSnapshot) -> String {
    let mut out = String::new();

    if let Some(location) = &snapshot.location {
        let kind = if location.manual { "search" } else { "device" };
        out.push_str(&format!(
            "Feed near {} ({:.4}, {:.4}) [{}]\n",
            location.label, location.coords.lat, location.coords.lng, kind
        ));
    }
    out.push_str(&format!(
        "Category: {}  |  Page: {}  |  More: {}\n\n",
        snapshot.category,
        snapshot.page,
        if snapshot.has_more { "yes" } else { "no" }
    ));

    if snapshot.items.is_empty() {
        out.push_str("No places found here.\n");
        return out;
    }

    for place in &snapshot.items {
        out.push_str(&format!("  [{}] {}", place.id, place.name));
        if let Some(country) = &place.country {
            out.push_str(&format!(" — {}", country));
        }
        out.push_str(&format!(" ({})\n", place.category));
        if let Some(description) = &place.description {
            let description = description.trim();
            if !description.is_empty() {
                out.push_str(&format!("      {}\n", description));
            }
        }
        if !place.images.is_empty() {
            out.push_str(&format!("      {} image(s)\n", place.images.len()));
        }
    }

    out.push_str(&format!("\n{} place(s)\n", snapshot.items.len()));
    out
}

/// Render a feed snapshot as pretty JSON
pub fn render_feed_json(snapshot: &FeedSnapshot) -> Result<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Render place suggestions as human-readable text
pub fn render_places_text(places: &[ResolvedPlace]) -> String {
    if places.is_empty() {
        return "No matches.\n".to_string();
    }

    let mut out = String::new();
    for place in places {
        out.push_str(&format!(
            "  {} ({:.4}, {:.4})",
            place.display_label(),
            place.coords.lat,
            place.coords.lng
        ));
        if let Some(code) = &place.country_code {
            out.push_str(&format!(" [{}]", code));
        }
        out.push('\n');
    }
    out
}

/// Render place suggestions as pretty JSON
pub fn render_places_json(places: &[ResolvedPlace]) -> Result<String> {
    Ok(serde_json::to_string_pretty(places)?)
}

/// Render an acquired position as human-readable text
pub fn render_position_text(acquired: &AcquiredPosition) -> String {
    let tier = match acquired.tier {
        PositionTier::Live => "live",
        PositionTier::LastKnown => "last known",
        PositionTier::Fallback => "fallback",
    };
    format!(
        "{} ({:.4}, {:.4}) via {}\n",
        acquired.label, acquired.coords.lat, acquired.coords.lng, tier
    )
}
