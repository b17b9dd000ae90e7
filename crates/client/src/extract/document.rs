//! Structural document access over `scraper`.

use std::sync::LazyLock;

use findlogin_core::Error;
use scraper::{ElementRef, Html, Selector};

static ACCOUNT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("article.account").expect("invalid selector"));
static KEYBOARD_INPUT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("kbd").expect("invalid selector"));
static SUCCESS_RATE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".success_rate").expect("invalid selector"));

/// Structural markers the extractor looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// One shared-account entry (`article.account`).
    Account,
    /// Inline keyboard-input text (`kbd`), login then password.
    KeyboardInput,
    /// Success rate label (`.success_rate`).
    SuccessRate,
}

impl Marker {
    fn selector(self) -> &'static Selector {
        match self {
            Marker::Account => &ACCOUNT,
            Marker::KeyboardInput => &KEYBOARD_INPUT,
            Marker::SuccessRate => &SUCCESS_RATE,
        }
    }
}

/// Queryable document tree.
///
/// Extraction only needs two capabilities: find the elements matching a
/// marker (document-wide or inside another element) and read an element's
/// text. Any HTML library can back this.
pub trait StructuredDocument {
    type Element<'a>: Copy
    where
        Self: 'a;

    /// All elements matching `marker`, in document order.
    fn find_all(&self, marker: Marker) -> Vec<Self::Element<'_>>;

    /// Descendants of `scope` matching `marker`, in document order.
    fn find_within<'a>(&'a self, scope: Self::Element<'a>, marker: Marker) -> Vec<Self::Element<'a>>;

    /// Concatenated text content of `element`, verbatim.
    fn text(&self, element: Self::Element<'_>) -> String;
}

/// A parsed HTML page.
#[derive(Debug)]
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parse an HTML string.
    ///
    /// Fails with [`Error::Parse`] if the source is blank or contains no
    /// markup beyond the `html`/`head`/`body` scaffolding the parser inserts
    /// on its own.
    pub fn parse(source: &str) -> Result<Self, Error> {
        if source.trim().is_empty() {
            return Err(Error::Parse("document is empty".into()));
        }

        let html = Html::parse_document(source);

        let has_markup = html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .any(|el| !matches!(el.value().name(), "html" | "head" | "body"));

        if !has_markup {
            return Err(Error::Parse("document contains no HTML markup".into()));
        }

        Ok(Self { html })
    }
}

impl StructuredDocument for HtmlDocument {
    type Element<'a> = ElementRef<'a>;

    fn find_all(&self, marker: Marker) -> Vec<ElementRef<'_>> {
        self.html.select(marker.selector()).collect()
    }

    fn find_within<'a>(&'a self, scope: ElementRef<'a>, marker: Marker) -> Vec<ElementRef<'a>> {
        scope.select(marker.selector()).collect()
    }

    fn text(&self, element: ElementRef<'_>) -> String {
        element.text().collect()
    }
}
