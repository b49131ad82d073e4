//! Resume ingestion: section parsing, keyword extraction, and the HTTP handlers that
//! expose parsing, keywords, scoring, and full file analysis.

pub mod handlers;
pub mod keywords;
pub mod parser;
