//! Scriptable mock driver for tests.
//!
//! Implements the full [`Driver`] capability surface over an in-memory
//! page model: elements keyed by locator, windows, click effects, and an
//! action journal tests assert against. State is shared behind an `Arc`,
//! so a cloned handle kept by the test observes everything the session
//! did.
//!
//! Mock fidelity matters here: the journey tests in `tests/` run the real
//! page objects and scenario against this driver, so its semantics track
//! the CDP implementation (absent → `NotFound`, obscured →
//! `NotInteractable`, script clicks bypass reachability).

use crate::driver::Driver;
use crate::locator::Locator;
use crate::result::{CarreraError, CarreraResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One locator's worth of fake DOM state.
#[derive(Debug, Clone)]
pub struct MockElement {
    /// Text of each matching instance (count = len)
    pub instances: Vec<String>,
    /// Rendered with non-zero size
    pub visible: bool,
    /// Accepts clicks
    pub clickable: bool,
    /// Native clicks bounce (overlay in the way); script clicks still land
    pub obscured: bool,
    /// Number of probes before the element reports present (lazy render)
    pub latency: u32,
}

impl MockElement {
    /// A visible, clickable element with the given text
    #[must_use]
    pub fn labeled(text: impl Into<String>) -> Self {
        Self {
            instances: vec![text.into()],
            visible: true,
            clickable: true,
            obscured: false,
            latency: 0,
        }
    }

    /// A visible element with one instance per text
    #[must_use]
    pub fn with_instances<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            instances: texts.into_iter().map(Into::into).collect(),
            visible: true,
            clickable: true,
            obscured: false,
            latency: 0,
        }
    }

    /// Mark the element hidden
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Mark the element present but unclickable
    #[must_use]
    pub const fn unclickable(mut self) -> Self {
        self.clickable = false;
        self
    }

    /// Native clicks fail; script clicks succeed
    #[must_use]
    pub const fn obscured(mut self) -> Self {
        self.obscured = true;
        self
    }

    /// Element only reports present after `probes` visibility/count checks
    #[must_use]
    pub const fn appearing_after(mut self, probes: u32) -> Self {
        self.latency = probes;
        self
    }
}

/// Everything the session did to the mock, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEvent {
    /// Navigation to a URL
    Navigated(String),
    /// Native input click
    NativeClick(Locator),
    /// Script-driven click
    ScriptClick(Locator),
    /// Scroll-into-view
    Scrolled(Locator),
    /// Value injection
    ValueSet(Locator, String),
    /// Window switch
    SwitchedWindow(String),
    /// Browser teardown
    Closed,
}

/// State mutation applied when a locator is successfully clicked.
#[derive(Debug, Clone)]
pub enum ClickEffect {
    /// Change the active window URL
    SetUrl(String),
    /// Change the active window title
    SetTitle(String),
    /// Add or replace an element
    Insert(Locator, MockElement),
    /// Remove an element
    Remove(Locator),
    /// Open a new window at the given URL (active window unchanged)
    OpenWindow(String),
}

#[derive(Debug, Clone)]
struct MockWindow {
    url: String,
    title: String,
}

#[derive(Debug, Default)]
struct MockState {
    windows: Vec<MockWindow>,
    active: usize,
    ready_state: String,
    elements: HashMap<Locator, MockElement>,
    click_effects: HashMap<Locator, Vec<ClickEffect>>,
    script_results: HashMap<String, Value>,
    titles_by_url: HashMap<String, String>,
    journal: Vec<MockEvent>,
}

/// Scriptable in-memory [`Driver`].
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    state: Arc<Mutex<MockState>>,
}

impl MockDriver {
    /// Create a mock with one blank window
    #[must_use]
    pub fn new() -> Self {
        let driver = Self::default();
        {
            let mut state = driver.state.lock().unwrap();
            state.windows.push(MockWindow {
                url: "about:blank".to_string(),
                title: String::new(),
            });
            state.ready_state = "complete".to_string();
        }
        driver
    }

    /// Set the active window title
    pub fn set_title(&self, title: impl Into<String>) {
        let mut state = self.state.lock().unwrap();
        let active = state.active;
        state.windows[active].title = title.into();
    }

    /// Set the active window URL
    pub fn set_url(&self, url: impl Into<String>) {
        let mut state = self.state.lock().unwrap();
        let active = state.active;
        state.windows[active].url = url.into();
    }

    /// Title to adopt when navigation reaches `url`
    pub fn title_for(&self, url: impl Into<String>, title: impl Into<String>) {
        let mut state = self.state.lock().unwrap();
        state.titles_by_url.insert(url.into(), title.into());
    }

    /// Set document.readyState
    pub fn set_ready_state(&self, ready: impl Into<String>) {
        self.state.lock().unwrap().ready_state = ready.into();
    }

    /// Add or replace an element
    pub fn insert(&self, locator: Locator, element: MockElement) {
        self.state.lock().unwrap().elements.insert(locator, element);
    }

    /// Remove an element
    pub fn remove(&self, locator: &Locator) {
        self.state.lock().unwrap().elements.remove(locator);
    }

    /// Register effects applied when `locator` is clicked (either way)
    pub fn on_click(&self, locator: Locator, effects: Vec<ClickEffect>) {
        self.state.lock().unwrap().click_effects.insert(locator, effects);
    }

    /// Canned result for an exact script string
    pub fn script_result(&self, script: impl Into<String>, value: Value) {
        self.state
            .lock()
            .unwrap()
            .script_results
            .insert(script.into(), value);
    }

    /// Everything recorded so far
    #[must_use]
    pub fn journal(&self) -> Vec<MockEvent> {
        self.state.lock().unwrap().journal.clone()
    }

    /// Whether any click (native or script) landed on the locator
    #[must_use]
    pub fn was_clicked(&self, locator: &Locator) -> bool {
        self.journal().iter().any(|event| {
            matches!(event, MockEvent::NativeClick(l) | MockEvent::ScriptClick(l) if l == locator)
        })
    }

    /// Whether a script click specifically landed on the locator
    #[must_use]
    pub fn was_script_clicked(&self, locator: &Locator) -> bool {
        self.journal()
            .iter()
            .any(|event| matches!(event, MockEvent::ScriptClick(l) if l == locator))
    }

    /// Number of scroll-into-view calls on the locator
    #[must_use]
    pub fn scroll_count(&self, locator: &Locator) -> usize {
        self.journal()
            .iter()
            .filter(|event| matches!(event, MockEvent::Scrolled(l) if l == locator))
            .count()
    }

    /// Probe an element, honoring render latency. Returns a clone once
    /// the element reports present.
    fn probe(&self, locator: &Locator) -> Option<MockElement> {
        let mut state = self.state.lock().unwrap();
        let element = state.elements.get_mut(locator)?;
        if element.latency > 0 {
            element.latency -= 1;
            return None;
        }
        Some(element.clone())
    }

    fn apply_effects(&self, locator: &Locator) {
        let effects = {
            let state = self.state.lock().unwrap();
            state.click_effects.get(locator).cloned().unwrap_or_default()
        };
        let mut state = self.state.lock().unwrap();
        for effect in effects {
            match effect {
                ClickEffect::SetUrl(url) => {
                    let active = state.active;
                    state.windows[active].url = url;
                }
                ClickEffect::SetTitle(title) => {
                    let active = state.active;
                    state.windows[active].title = title;
                }
                ClickEffect::Insert(target, element) => {
                    state.elements.insert(target, element);
                }
                ClickEffect::Remove(target) => {
                    state.elements.remove(&target);
                }
                ClickEffect::OpenWindow(url) => {
                    state.windows.push(MockWindow {
                        url,
                        title: String::new(),
                    });
                }
            }
        }
    }

    fn record(&self, event: MockEvent) {
        self.state.lock().unwrap().journal.push(event);
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn navigate(&self, url: &str) -> CarreraResult<()> {
        self.record(MockEvent::Navigated(url.to_string()));
        let mut state = self.state.lock().unwrap();
        let active = state.active;
        if let Some(title) = state.titles_by_url.get(url).cloned() {
            state.windows[active].title = title;
        }
        state.windows[active].url = url.to_string();
        Ok(())
    }

    async fn title(&self) -> CarreraResult<String> {
        let state = self.state.lock().unwrap();
        Ok(state.windows[state.active].title.clone())
    }

    async fn current_url(&self) -> CarreraResult<String> {
        let state = self.state.lock().unwrap();
        Ok(state.windows[state.active].url.clone())
    }

    async fn ready_state(&self) -> CarreraResult<String> {
        Ok(self.state.lock().unwrap().ready_state.clone())
    }

    async fn evaluate(&self, script: &str) -> CarreraResult<Value> {
        let state = self.state.lock().unwrap();
        Ok(state.script_results.get(script).cloned().unwrap_or(Value::Null))
    }

    async fn count(&self, locator: &Locator) -> CarreraResult<usize> {
        Ok(self.probe(locator).map_or(0, |el| el.instances.len()))
    }

    async fn text(&self, locator: &Locator) -> CarreraResult<Option<String>> {
        Ok(self
            .probe(locator)
            .and_then(|el| el.instances.first().map(|s| s.trim().to_string())))
    }

    async fn all_texts(&self, locator: &Locator) -> CarreraResult<Vec<String>> {
        Ok(self.probe(locator).map(|el| el.instances).unwrap_or_default())
    }

    async fn is_visible(&self, locator: &Locator) -> CarreraResult<bool> {
        Ok(self.probe(locator).is_some_and(|el| el.visible))
    }

    async fn is_clickable(&self, locator: &Locator) -> CarreraResult<bool> {
        Ok(self.probe(locator).is_some_and(|el| el.visible && el.clickable))
    }

    async fn click(&self, locator: &Locator) -> CarreraResult<()> {
        self.record(MockEvent::NativeClick(locator.clone()));
        let Some(element) = self.probe(locator) else {
            return Err(CarreraError::NotFound {
                locator: locator.to_string(),
            });
        };
        if !element.visible || !element.clickable || element.obscured {
            return Err(CarreraError::NotInteractable {
                locator: locator.to_string(),
            });
        }
        self.apply_effects(locator);
        Ok(())
    }

    async fn script_click(&self, locator: &Locator) -> CarreraResult<()> {
        self.record(MockEvent::ScriptClick(locator.clone()));
        if self.probe(locator).is_none() {
            return Err(CarreraError::NotFound {
                locator: locator.to_string(),
            });
        }
        self.apply_effects(locator);
        Ok(())
    }

    async fn script_click_nth(&self, locator: &Locator, index: usize) -> CarreraResult<()> {
        self.record(MockEvent::ScriptClick(locator.clone()));
        let within_bounds = self
            .probe(locator)
            .is_some_and(|el| index < el.instances.len());
        if !within_bounds {
            return Err(CarreraError::NotFound {
                locator: format!("{locator}[{index}]"),
            });
        }
        self.apply_effects(locator);
        Ok(())
    }

    async fn scroll_into_view(&self, locator: &Locator) -> CarreraResult<()> {
        self.record(MockEvent::Scrolled(locator.clone()));
        if self.probe(locator).is_none() {
            return Err(CarreraError::NotFound {
                locator: locator.to_string(),
            });
        }
        Ok(())
    }

    async fn set_value(&self, locator: &Locator, value: &str) -> CarreraResult<()> {
        if self.probe(locator).is_none() {
            return Err(CarreraError::NotFound {
                locator: locator.to_string(),
            });
        }
        self.record(MockEvent::ValueSet(locator.clone(), value.to_string()));
        Ok(())
    }

    async fn window_handles(&self) -> CarreraResult<Vec<String>> {
        let state = self.state.lock().unwrap();
        Ok((0..state.windows.len()).map(|i| format!("window-{i}")).collect())
    }

    async fn switch_to_window(&self, handle: &str) -> CarreraResult<()> {
        let index: usize = handle
            .strip_prefix("window-")
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| CarreraError::WindowSwitch {
                message: format!("unknown handle '{handle}'"),
            })?;
        let mut state = self.state.lock().unwrap();
        if index >= state.windows.len() {
            return Err(CarreraError::WindowSwitch {
                message: format!("no window at index {index}"),
            });
        }
        state.active = index;
        state.journal.push(MockEvent::SwitchedWindow(handle.to_string()));
        Ok(())
    }

    async fn screenshot(&self) -> CarreraResult<Vec<u8>> {
        Ok(vec![])
    }

    async fn close(&self) -> CarreraResult<()> {
        self.record(MockEvent::Closed);
        Ok(())
    }
}
