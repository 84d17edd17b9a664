//! Browser Automation Module
//!
//! The automation session is an external collaborator. This module defines the
//! narrow surface the oracle consumes ([`BrowserSession`]), how elements are
//! located ([`Locator`]), the bounded polling primitive ([`Poller`]) and the
//! multi-candidate [`LocatorResolver`]. [`WebDriverSession`] is the concrete
//! W3C WebDriver adapter used by the binary.

mod resolver;
mod wait;
pub mod webdriver;

pub use resolver::LocatorResolver;
pub use wait::Poller;
pub use webdriver::{WebDriverProvider, WebDriverSession};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::Result;

/// How a selector is interpreted by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Css,
    XPath,
    LinkText,
    PartialLinkText,
    TagName,
}

impl Strategy {
    /// The `using` value of the W3C "Find Element" command.
    pub fn w3c_name(&self) -> &'static str {
        match self {
            Strategy::Css => "css selector",
            Strategy::XPath => "xpath",
            Strategy::LinkText => "link text",
            Strategy::PartialLinkText => "partial link text",
            Strategy::TagName => "tag name",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Css => write!(f, "css"),
            Strategy::XPath => write!(f, "xpath"),
            Strategy::LinkText => write!(f, "link"),
            Strategy::PartialLinkText => write!(f, "partial_link"),
            Strategy::TagName => write!(f, "tag"),
        }
    }
}

/// A strategy + selector pair identifying a UI element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    pub strategy: Strategy,
    pub selector: String,
}

impl Locator {
    pub fn new(strategy: Strategy, selector: impl Into<String>) -> Self {
        Self {
            strategy,
            selector: selector.into(),
        }
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(Strategy::Css, selector)
    }

    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, selector)
    }

    /// XPath locator matching any element whose text contains one of `needles`,
    /// optionally restricted to a tag.
    pub fn containing_text(tag: Option<&str>, needles: &[&str]) -> Self {
        let predicate = needles
            .iter()
            .map(|n| format!("contains(., {})", xpath_literal(n)))
            .collect::<Vec<_>>()
            .join(" or ");
        Self::xpath(format!("//{}[{}]", tag.unwrap_or("*"), predicate))
    }
}

/// Quote `s` as an XPath 1.0 string literal. XPath has no escapes, so text
/// holding both quote kinds is spliced together with `concat()`.
fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        format!("'{}'", s)
    } else if !s.contains('"') {
        format!("\"{}\"", s)
    } else {
        let parts: Vec<String> = s
            .split('\'')
            .map(|part| format!("'{}'", part))
            .collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy, self.selector)
    }
}

/// Opaque handle to an element in the live page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef(pub String);

impl ElementRef {
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Why a single lookup attempt found nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Miss {
    Absent,
    Stale,
    InvalidSelector,
}

/// Outcome of one element lookup. Expected misses are values, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(ElementRef),
    NotFound(Miss),
}

impl Lookup {
    pub fn found(self) -> Option<ElementRef> {
        match self {
            Lookup::Found(el) => Some(el),
            Lookup::NotFound(_) => None,
        }
    }
}

/// The browser operations the prediction oracle needs.
///
/// Implementations report expected lookup misses through [`Lookup`] and a
/// stale element through `is_displayed == false`; an `Err` means the session
/// itself is in trouble.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Load `url` and block until the driver reports the page loaded.
    async fn navigate(&self, url: &str) -> Result<()>;

    async fn find_element(&self, locator: &Locator) -> Result<Lookup>;

    async fn is_displayed(&self, element: &ElementRef) -> Result<bool>;

    async fn tag_name(&self, element: &ElementRef) -> Result<String>;

    async fn text(&self, element: &ElementRef) -> Result<String>;

    async fn clear(&self, element: &ElementRef) -> Result<()>;

    async fn click(&self, element: &ElementRef) -> Result<()>;

    async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()>;

    async fn current_url(&self) -> Result<String>;

    /// Full rendered page content.
    async fn page_source(&self) -> Result<String>;

    /// Release the underlying session. Called exactly once by the owner.
    async fn quit(&self) -> Result<()>;
}

#[async_trait]
impl<S: BrowserSession + ?Sized> BrowserSession for Arc<S> {
    async fn navigate(&self, url: &str) -> Result<()> {
        (**self).navigate(url).await
    }

    async fn find_element(&self, locator: &Locator) -> Result<Lookup> {
        (**self).find_element(locator).await
    }

    async fn is_displayed(&self, element: &ElementRef) -> Result<bool> {
        (**self).is_displayed(element).await
    }

    async fn tag_name(&self, element: &ElementRef) -> Result<String> {
        (**self).tag_name(element).await
    }

    async fn text(&self, element: &ElementRef) -> Result<String> {
        (**self).text(element).await
    }

    async fn clear(&self, element: &ElementRef) -> Result<()> {
        (**self).clear(element).await
    }

    async fn click(&self, element: &ElementRef) -> Result<()> {
        (**self).click(element).await
    }

    async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()> {
        (**self).send_keys(element, text).await
    }

    async fn current_url(&self) -> Result<String> {
        (**self).current_url().await
    }

    async fn page_source(&self) -> Result<String> {
        (**self).page_source().await
    }

    async fn quit(&self) -> Result<()> {
        (**self).quit().await
    }
}

/// Supplies fresh automation sessions. Creation flags and driver installation
/// live behind this seam.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    type Session: BrowserSession;

    async fn open(&self) -> Result<Self::Session>;
}
