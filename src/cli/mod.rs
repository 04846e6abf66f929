//! CLI subcommand implementations for the trawl binary.

pub mod decode_cmd;
pub mod doctor;
pub mod output;
pub mod scrape_cmd;
