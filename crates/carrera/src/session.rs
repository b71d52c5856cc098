//! Session: one live browser plus the suite's wait discipline.
//!
//! The session owns a [`Driver`] handle and a [`WaitPolicy`] and exposes
//! the interaction primitives every page object is built from. All
//! primitives are best-effort and non-throwing: a failure degrades to a
//! logged warning and a falsy/empty return, so callers treat "not found"
//! as a first-class outcome rather than an exception path. Scenario gates,
//! not primitives, decide fatality.

use crate::driver::Driver;
use crate::locator::Locator;
use crate::wait::{Condition, WaitOutcome, WaitPolicy};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Driver handle + wait policy, shared by composition with every page
/// object. A page object borrows the session and therefore cannot outlive
/// the browser it wraps.
pub struct Session {
    driver: Box<dyn Driver>,
    waits: WaitPolicy,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("waits", &self.waits)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Wrap a driver with the given wait policy
    #[must_use]
    pub fn new(driver: Box<dyn Driver>, waits: WaitPolicy) -> Self {
        Self { driver, waits }
    }

    /// The wait policy in force
    #[must_use]
    pub const fn waits(&self) -> WaitPolicy {
        self.waits
    }

    /// Borrow the underlying driver
    #[must_use]
    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    /// Evaluate a condition once. Driver errors count as unsatisfied.
    async fn check(&self, condition: &Condition) -> Option<Value> {
        let checked = match condition {
            Condition::Present(locator) => match self.driver.count(locator).await {
                Ok(n) if n > 0 => Ok(Some(json!(n))),
                Ok(_) => Ok(None),
                Err(e) => Err(e),
            },
            Condition::Clickable(locator) => match self.driver.is_clickable(locator).await {
                Ok(true) => Ok(Some(Value::Bool(true))),
                Ok(false) => Ok(None),
                Err(e) => Err(e),
            },
            Condition::Invisible(locator) => match self.driver.is_visible(locator).await {
                Ok(false) => Ok(Some(Value::Bool(true))),
                Ok(true) => Ok(None),
                Err(e) => Err(e),
            },
            Condition::TextEquals { locator, expected } => {
                match self.driver.text(locator).await {
                    Ok(Some(text)) if text.trim() == expected.as_str() => {
                        Ok(Some(Value::String(text)))
                    }
                    Ok(_) => Ok(None),
                    Err(e) => Err(e),
                }
            }
            Condition::CountAbove { locator, min } => match self.driver.count(locator).await {
                Ok(n) if n > *min => Ok(Some(json!(n))),
                Ok(_) => Ok(None),
                Err(e) => Err(e),
            },
            Condition::DocumentReady => match self.driver.ready_state().await {
                Ok(state) if state == "complete" => Ok(Some(Value::String(state))),
                Ok(_) => Ok(None),
                Err(e) => Err(e),
            },
        };
        match checked {
            Ok(value) => value,
            Err(err) => {
                debug!(condition = %condition.description(), %err, "condition check errored");
                None
            }
        }
    }

    /// Poll a condition until it is satisfied or the deadline passes.
    ///
    /// Never blocks past `timeout` (plus one in-flight check); never
    /// raises; the outcome carries the failure distinction instead.
    pub async fn wait_until(&self, condition: &Condition, timeout: Duration) -> WaitOutcome<Value> {
        let poll = self.waits.poll_interval();
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if let Some(value) = self.check(condition).await {
                return WaitOutcome::Found(value);
            }
            let now = tokio::time::Instant::now();
            if now >= deadline {
                warn!(
                    condition = %condition.description(),
                    timeout_ms = timeout.as_millis() as u64,
                    "wait timed out"
                );
                return WaitOutcome::TimedOut;
            }
            tokio::time::sleep(poll.min(deadline - now)).await;
        }
    }

    /// Wait with the session's default timeout
    pub async fn wait_for(&self, condition: &Condition) -> WaitOutcome<Value> {
        self.wait_until(condition, self.waits.timeout()).await
    }

    /// Wait for presence of a locator with the default timeout
    pub async fn wait_for_element(&self, locator: &Locator) -> WaitOutcome<Value> {
        self.wait_for(&Condition::Present(locator.clone())).await
    }

    /// Number of elements currently matching (0 on driver error)
    pub async fn count(&self, locator: &Locator) -> usize {
        match self.driver.count(locator).await {
            Ok(n) => n,
            Err(err) => {
                debug!(%locator, %err, "count failed");
                0
            }
        }
    }

    /// Wait for clickability, then click: native input first, script-click
    /// fallback when the native click cannot be delivered. Returns whether
    /// any click landed.
    pub async fn click(&self, locator: &Locator) -> bool {
        let clickable = self
            .wait_for(&Condition::Clickable(locator.clone()))
            .await;
        if !clickable.is_found() {
            warn!(%locator, "unable to interact with element");
            return false;
        }
        match self.driver.click(locator).await {
            Ok(()) => {
                info!(%locator, "element activated");
                true
            }
            Err(err) => {
                warn!(%locator, %err, "using alternative click method");
                match self.driver.script_click(locator).await {
                    Ok(()) => true,
                    Err(err) => {
                        warn!(%locator, %err, "script click failed");
                        false
                    }
                }
            }
        }
    }

    /// Script-click without the clickability gate (fallback navigation
    /// paths use this directly)
    pub async fn script_click(&self, locator: &Locator) -> bool {
        match self.driver.script_click(locator).await {
            Ok(()) => true,
            Err(err) => {
                warn!(%locator, %err, "script click failed");
                false
            }
        }
    }

    /// Script-click the match at `index` (heuristic fallbacks over link
    /// scans use this)
    pub async fn script_click_nth(&self, locator: &Locator, index: usize) -> bool {
        match self.driver.script_click_nth(locator, index).await {
            Ok(()) => true,
            Err(err) => {
                warn!(%locator, index, %err, "script click failed");
                false
            }
        }
    }

    /// Resolve and smooth-scroll an element to viewport center; logged
    /// no-op when absent.
    pub async fn scroll_into_view(&self, locator: &Locator) {
        if !self.wait_for_element(locator).await.is_found() {
            warn!(%locator, "cannot scroll to element");
            return;
        }
        match self.driver.scroll_into_view(locator).await {
            Ok(()) => debug!(%locator, "viewport adjusted"),
            Err(err) => warn!(%locator, %err, "cannot scroll to element"),
        }
    }

    /// Trimmed text of an element, empty string when absent
    pub async fn element_text(&self, locator: &Locator) -> String {
        if !self.wait_for_element(locator).await.is_found() {
            return String::new();
        }
        match self.driver.text(locator).await {
            Ok(Some(text)) => text.trim().to_string(),
            Ok(None) => String::new(),
            Err(err) => {
                debug!(%locator, %err, "text read failed");
                String::new()
            }
        }
    }

    /// Text of every match in one round trip (empty on driver error)
    pub async fn all_texts(&self, locator: &Locator) -> Vec<String> {
        match self.driver.all_texts(locator).await {
            Ok(texts) => texts,
            Err(err) => {
                warn!(%locator, %err, "bulk text extraction failed");
                Vec::new()
            }
        }
    }

    /// Poll until the element's trimmed text equals `expected`. On timeout
    /// the actual text is captured and logged for diagnosis.
    pub async fn wait_for_text_equals(
        &self,
        locator: &Locator,
        expected: &str,
        timeout: Duration,
    ) -> bool {
        let outcome = self
            .wait_until(
                &Condition::TextEquals {
                    locator: locator.clone(),
                    expected: expected.to_string(),
                },
                timeout,
            )
            .await;
        if outcome.is_found() {
            info!(%locator, expected, "text value verified");
            return true;
        }
        let actual = self.element_text(locator).await;
        warn!(%locator, expected, actual, "text mismatch");
        false
    }

    /// Inject a value into a form control after a clickability wait
    pub async fn set_value(&self, locator: &Locator, value: &str) -> bool {
        if !self
            .wait_for(&Condition::Clickable(locator.clone()))
            .await
            .is_found()
        {
            warn!(%locator, "control not available for input");
            return false;
        }
        match self.driver.set_value(locator, value).await {
            Ok(()) => true,
            Err(err) => {
                warn!(%locator, %err, "value injection failed");
                false
            }
        }
    }

    /// Wait for document.readyState == "complete" with the default timeout
    pub async fn document_ready(&self) -> bool {
        let ready = self.wait_for(&Condition::DocumentReady).await;
        if ready.is_found() {
            debug!("page rendering complete");
            true
        } else {
            warn!("page loading timed out");
            false
        }
    }

    /// Best-effort dismissal of a consent banner or similar overlay.
    ///
    /// Absence is not an error, and calling twice with no banner present
    /// must not error either time.
    pub async fn dismiss_if_clickable(&self, locator: &Locator, timeout: Duration) -> bool {
        let clickable = self
            .wait_until(&Condition::Clickable(locator.clone()), timeout)
            .await;
        if !clickable.is_found() {
            info!(%locator, "no dismissable prompt detected");
            return false;
        }
        match self.driver.click(locator).await {
            Ok(()) => {
                info!(%locator, "prompt dismissed");
                true
            }
            Err(err) => {
                warn!(%locator, %err, "prompt dismissal failed");
                false
            }
        }
    }

    /// Navigate the active window; failure is logged and reported falsy
    pub async fn navigate(&self, url: &str) -> bool {
        match self.driver.navigate(url).await {
            Ok(()) => true,
            Err(err) => {
                warn!(url, %err, "navigation failed");
                false
            }
        }
    }

    /// Title of the active document ("" on driver error)
    pub async fn title(&self) -> String {
        match self.driver.title().await {
            Ok(title) => title,
            Err(err) => {
                warn!(%err, "title read failed");
                String::new()
            }
        }
    }

    /// URL of the active window ("" on driver error)
    pub async fn current_url(&self) -> String {
        match self.driver.current_url().await {
            Ok(url) => url,
            Err(err) => {
                warn!(%err, "url read failed");
                String::new()
            }
        }
    }

    /// If more than one window is open, switch to the newest and report
    /// true; otherwise leave the context alone.
    pub async fn switch_to_latest_window(&self) -> bool {
        let handles = match self.driver.window_handles().await {
            Ok(handles) => handles,
            Err(err) => {
                warn!(%err, "window enumeration failed");
                return false;
            }
        };
        if handles.len() < 2 {
            return false;
        }
        let newest = handles[handles.len() - 1].clone();
        match self.driver.switch_to_window(&newest).await {
            Ok(()) => {
                info!(handle = %newest, "switched to new window");
                true
            }
            Err(err) => {
                warn!(%err, "window switch failed");
                false
            }
        }
    }

    /// PNG screenshot of the active window, None on failure
    pub async fn screenshot(&self) -> Option<Vec<u8>> {
        match self.driver.screenshot().await {
            Ok(data) => Some(data),
            Err(err) => {
                warn!(%err, "screenshot failed");
                None
            }
        }
    }

    /// Best-effort browser teardown
    pub async fn close(&self) {
        if let Err(err) = self.driver.close().await {
            warn!(%err, "browser teardown reported an error");
        }
    }
}
