//! Locator Resolver
//!
//! Tries an ordered list of candidate locators against the live page on every
//! polling pass. First candidate that is both present and visible wins.

use std::time::Duration;
use tracing::{debug, trace};

use super::wait::{Poller, DEFAULT_POLL_INTERVAL};
use super::{BrowserSession, ElementRef, Locator, Lookup};
use crate::error::{MetamorphError, Result};

pub struct LocatorResolver<'s, S: ?Sized> {
    session: &'s S,
    interval: Duration,
}

impl<'s, S: BrowserSession + ?Sized> LocatorResolver<'s, S> {
    pub fn new(session: &'s S) -> Self {
        Self {
            session,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Poll `locators` in priority order until one yields a visible element.
    ///
    /// Fails with [`MetamorphError::NoMatchingElement`] once `timeout` elapses.
    pub async fn resolve(&self, locators: &[Locator], timeout: Duration) -> Result<ElementRef> {
        let poller = Poller::new(self.interval, timeout);
        match poller.until("visible element", || self.attempt(locators)).await {
            Ok(element) => Ok(element),
            Err(MetamorphError::Timeout { .. }) => {
                debug!("No visible element for {} locator(s) after {:?}", locators.len(), timeout);
                Err(MetamorphError::NoMatchingElement {
                    locators: locators.to_vec(),
                    timeout,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// One pass over every candidate.
    async fn attempt(&self, locators: &[Locator]) -> Result<Option<ElementRef>> {
        for locator in locators {
            match self.session.find_element(locator).await? {
                Lookup::Found(element) => {
                    if self.session.is_displayed(&element).await? {
                        trace!("Resolved {} to element {}", locator, element.id());
                        return Ok(Some(element));
                    }
                    trace!("{} present but hidden", locator);
                }
                Lookup::NotFound(miss) => {
                    trace!("{} missed: {:?}", locator, miss);
                }
            }
        }
        Ok(None)
    }
}
