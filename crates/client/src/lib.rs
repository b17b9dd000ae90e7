//! Client code for findlogin.
//!
//! This crate provides the HTTP fetch pipeline, credential extraction and the
//! search controller consumed by the server.

pub mod extract;
pub mod fetch;
pub mod search;

pub use extract::{
    CredentialExtractor, HtmlDocument, Marker, ScraperExtractor, StructuredDocument, extract_accounts,
    extract_credentials,
};

pub use fetch::{FetchClient, FetchConfig, FetchResponse, Fetcher, query_url};

pub use search::{QueryHandle, SearchController};
