//! Upstream access: transport, tier fallback and payload extraction.

mod client;
mod fallback;
mod payload;

#[cfg(test)]
mod tests;

pub use client::{HttpSourceClient, SourceClient};
pub use fallback::{FallbackFetcher, FetchedPayload, DEFAULT_REQUEST_TIMEOUT};
pub use payload::{extract_records, ExtractedRecords};
