//! `trawl decode <identifier>` — inspect an item identifier offline.

use crate::cli::output;
use crate::engine::enrich;
use anyhow::Result;

pub fn run(identifier: &str) -> Result<()> {
    let permalink = enrich::activity_permalink(identifier);
    let epoch = enrich::decode_upload_epoch(identifier);

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "identifier": identifier,
            "permalink": permalink,
            "estimated_upload_epoch": epoch,
        }));
        return Ok(());
    }

    println!("Permalink:              {permalink}");
    match epoch {
        Some(secs) => println!("Estimated upload epoch: {secs:.3} (ordering hint, ~4s granularity)"),
        None => println!("Estimated upload epoch: identifier did not decode"),
    }
    Ok(())
}
