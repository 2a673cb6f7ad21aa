//! Run the detail aggregation for one title and print the merged record.
//! Usage:
//!   cargo run --bin tmdb_details -- movie <tmdb_id>
//!   cargo run --bin tmdb_details -- tv <tmdb_id>
//!   cargo run --bin tmdb_details -- person <tmdb_id>
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use cinescope::aggregate::{Aggregator, MediaRequest};
use cinescope::models::MediaKind;
use cinescope::reviews::ReviewPanel;
use cinescope::tmdb::TmdbClient;
use dotenvy::dotenv;
use serde_json::json;
use std::env;
use std::sync::Arc;

fn usage() {
    eprintln!("Usage: cargo run --bin tmdb_details -- movie <tmdb_id>");
    eprintln!("       cargo run --bin tmdb_details -- tv <tmdb_id>");
    eprintln!("       cargo run --bin tmdb_details -- person <tmdb_id>");
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() != 2 {
        usage();
        std::process::exit(2);
    }
    let id: i32 = args[1]
        .parse()
        .with_context(|| format!("invalid TMDB id '{}'", args[1]))?;

    let aggregator = Aggregator::new(Arc::new(TmdbClient::from_env()?));

    let output = if args[0].eq_ignore_ascii_case("person") {
        let profile = aggregator.person(Some(id)).await?;
        serde_json::to_value(&profile)?
    } else {
        let kind: MediaKind = args[0].parse()?;
        let details = aggregator
            .details(MediaRequest::new(Some(id), Some(kind))?)
            .await?;
        json!({
            "details": details,
            "year": details.record.year(),
            "review_preview": ReviewPanel::new().preview(&details.reviews),
        })
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
