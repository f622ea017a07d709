//! Fetch module for page title lookups
//!
//! This module contains the core lookup logic:
//! - Fetching a single address with a bounded deadline
//! - Extracting the first `<title>` from the fetched body
//! - Fanning a batch of addresses out concurrently and joining the results
//!   back in input order

mod fetcher;
mod orchestrator;
mod parser;

pub use fetcher::{build_http_client, FetchFailure, FetchResult, Fetcher, FetcherConfig, PageTitle};
pub use orchestrator::Orchestrator;
pub use parser::{extract_title, SENTINEL_TITLE};
