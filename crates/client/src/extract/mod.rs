//! Credential extraction from the credential-sharing site's view page.
//!
//! ### Markup
//! - Each shared account is an `article.account` block.
//! - Inside it, the first `kbd` holds the login and the second the password.
//! - A `.success_rate` element holds the pre-formatted success rate.
//!
//! ### Degradation
//! - Missing `kbd` or `.success_rate` children yield empty strings, never errors.
//! - When an entry has several `.success_rate` elements, only the first one's
//!   text is used. The texts are not joined.
//! - A page with no account blocks yields `[]`, not a [`Error::Parse`]: the
//!   site serves such a page for a domain with no shared logins.
//! - Only a blank or markup-free document is a [`Error::Parse`].
//!
//! Records come out in document order, without sorting or deduplication.

pub mod document;

pub use document::{HtmlDocument, Marker, StructuredDocument};

use findlogin_core::{CredentialRecord, Error};

/// Stable extractor trait so the search controller is not tied to one engine.
pub trait CredentialExtractor: Send + Sync {
    /// Parse `html` and extract its credential records.
    fn extract(&self, html: &str) -> Result<Vec<CredentialRecord>, Error>;
}

/// `scraper`-backed extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperExtractor;

impl CredentialExtractor for ScraperExtractor {
    fn extract(&self, html: &str) -> Result<Vec<CredentialRecord>, Error> {
        extract_credentials(html)
    }
}

/// Extract one record per account entry of an already parsed document.
pub fn extract_accounts<D: StructuredDocument>(doc: &D) -> Vec<CredentialRecord> {
    doc.find_all(Marker::Account)
        .into_iter()
        .map(|entry| {
            let mut inputs = doc
                .find_within(entry, Marker::KeyboardInput)
                .into_iter()
                .map(|el| doc.text(el));
            let login = inputs.next().unwrap_or_default();
            let password = inputs.next().unwrap_or_default();

            let success_rate = doc
                .find_within(entry, Marker::SuccessRate)
                .into_iter()
                .next()
                .map(|el| doc.text(el))
                .unwrap_or_default();

            CredentialRecord { login, password, success_rate }
        })
        .collect()
}

/// Parse `html` and extract its credential records.
pub fn extract_credentials(html: &str) -> Result<Vec<CredentialRecord>, Error> {
    let doc = HtmlDocument::parse(html)?;
    let records = extract_accounts(&doc);
    tracing::debug!("extracted {} credential records", records.len());
    Ok(records)
}
