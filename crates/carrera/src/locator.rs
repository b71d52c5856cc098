//! Locator abstraction for element selection.
//!
//! A [`Locator`] is a strategy + selector-string pair identifying zero or
//! more DOM elements. Locators are immutable once defined and owned by the
//! page object that declares them. Each locator compiles to an in-page
//! JavaScript query expression the driver evaluates, so one resolution
//! strategy serves CSS, XPath, and id lookups alike.

use std::fmt;

/// Selector strategy for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// CSS selector (e.g., "button.primary")
    Css(String),
    /// XPath selector
    XPath(String),
    /// Element id (document.getElementById)
    Id(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::XPath(selector.into())
    }

    /// Create an id selector
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// JavaScript expression resolving to the first matching element or null
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelector({s:?})"),
            Self::XPath(s) => {
                format!("document.evaluate({s:?}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue")
            }
            Self::Id(id) => format!("document.getElementById({id:?})"),
        }
    }

    /// JavaScript expression resolving to an array of all matching elements
    #[must_use]
    pub fn to_all_query(&self) -> String {
        match self {
            Self::Css(s) => format!("Array.from(document.querySelectorAll({s:?}))"),
            Self::XPath(s) => format!(
                "(function() {{ const r = document.evaluate({s:?}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); const out = []; for (let i = 0; i < r.snapshotLength; i++) {{ out.push(r.snapshotItem(i)); }} return out; }})()"
            ),
            Self::Id(id) =>

                format!("(function() {{ const el = document.getElementById({id:?}); return el ? [el] : []; }})()"),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css={s}"),
            Self::XPath(s) => write!(f, "xpath={s}"),
            Self::Id(s) => write!(f, "id={s}"),
        }
    }
}

/// A locator for finding and interacting with elements.
///
/// Thin and transient: pairs a [`Selector`] with the query builders the
/// session needs. No element handle is retained between uses; every
/// operation re-resolves against the live DOM.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    selector: Selector,
}

impl Locator {
    /// Create a locator from a selector
    #[must_use]
    pub const fn new(selector: Selector) -> Self {
        Self { selector }
    }

    /// Create a CSS locator
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(Selector::css(selector))
    }

    /// Create an XPath locator
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::new(Selector::xpath(selector))
    }

    /// Create an id locator
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::new(Selector::id(id))
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Query: count of matching elements
    #[must_use]
    pub fn to_count_query(&self) -> String {
        format!("{}.length", self.selector.to_all_query())
    }

    /// Query: trimmed text of the first match, or null
    #[must_use]
    pub fn to_text_query(&self) -> String {
        format!(
            "(function() {{ const el = {}; return el ? el.innerText.trim() : null; }})()",
            self.selector.to_query()
        )
    }

    /// Query: raw text of every match (bulk extraction, one round trip)
    #[must_use]
    pub fn to_all_texts_query(&self) -> String {
        format!("{}.map(el => el.innerText)", self.selector.to_all_query())
    }

    /// Query: whether the first match is rendered with non-zero size
    #[must_use]
    pub fn to_visible_query(&self) -> String {
        format!(
            "(function() {{ const el = {}; if (!el) return false; const r = el.getBoundingClientRect(); return r.width > 0 && r.height > 0; }})()",
            self.selector.to_query()
        )
    }

    /// Query: visible and not disabled
    #[must_use]
    pub fn to_clickable_query(&self) -> String {
        format!(
            "(function() {{ const el = {}; if (!el) return false; const r = el.getBoundingClientRect(); return r.width > 0 && r.height > 0 && !el.disabled; }})()",
            self.selector.to_query()
        )
    }

    /// Query: script-driven click on the first match
    #[must_use]
    pub fn to_click_query(&self) -> String {
        format!(
            "(function() {{ const el = {}; if (!el) return false; el.click(); return true; }})()",
            self.selector.to_query()
        )
    }

    /// Query: smooth-scroll the first match to viewport center
    #[must_use]
    pub fn to_scroll_query(&self) -> String {
        format!(
            "(function() {{ const el = {}; if (!el) return false; el.scrollIntoView({{behavior: 'smooth', block: 'center'}}); return true; }})()",
            self.selector.to_query()
        )
    }

    /// Query: direct value injection with input/change event dispatch
    #[must_use]
    pub fn to_set_value_query(&self, value: &str) -> String {
        format!(
            "(function() {{ const el = {}; if (!el) return false; el.value = {value:?}; el.dispatchEvent(new Event('input', {{bubbles: true}})); el.dispatchEvent(new Event('change', {{bubbles: true}})); return true; }})()",
            self.selector.to_query()
        )
    }

    /// Query: script-driven click on the match at `index`
    #[must_use]
    pub fn to_click_nth_query(&self, index: usize) -> String {
        format!(
            "(function() {{ const els = {}; const el = els[{index}]; if (!el) return false; el.click(); return true; }})()",
            self.selector.to_all_query()
        )
    }

    /// Query: center point plus whether the element actually receives a
    /// pointer event there (detects overlays obscuring the target), or null
    /// when absent
    #[must_use]
    pub fn to_hit_test_query(&self) -> String {
        format!(
            "(function() {{ const el = {}; if (!el) return null; const r = el.getBoundingClientRect(); const x = r.x + r.width / 2; const y = r.y + r.height / 2; const hit = document.elementFromPoint(x, y); const reachable = hit !== null && (hit === el || el.contains(hit) || hit.contains(el)); return {{x: x, y: y, reachable: reachable}}; }})()",
            self.selector.to_query()
        )
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.selector)
    }
}
