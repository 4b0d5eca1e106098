//! Element references.
//!
//! A [`Locator`] is a named selector. It is never cached: the driver resolves
//! it each time it is used, to zero, one, or many live elements.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Selector strategy for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    /// Element id (without `#`)
    Id(String),
    /// CSS selector (e.g., `a[href="#/Patient"]`)
    Css(String),
    /// Element whose own text contains the value
    Text(String),
    /// XPath expression
    XPath(String),
}

impl Selector {
    /// Create an id selector
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// CSS form, when the strategy has one
    #[must_use]
    pub fn as_css(&self) -> Option<String> {
        match self {
            Self::Id(id) => Some(format!("#{id}")),
            Self::Css(css) => Some(css.clone()),
            Self::Text(_) | Self::XPath(_) => None,
        }
    }

    /// XPath form; CSS selectors have none
    #[must_use]
    pub fn as_xpath(&self) -> Option<String> {
        match self {
            Self::XPath(expr) => Some(expr.clone()),
            Self::Text(text) => Some(format!("//*[contains(text(), {})]", xpath_literal(text))),
            Self::Id(id) => Some(format!("//*[@id={}]", xpath_literal(id))),
            Self::Css(_) => None,
        }
    }

    /// JavaScript expression evaluating to an array of matching elements
    #[must_use]
    pub fn to_all_query(&self) -> String {
        match (self.as_css(), self.as_xpath()) {
            (Some(css), _) => {
                format!("Array.from(document.querySelectorAll({}))", js_literal(&css))
            }
            (None, xpath) => format!(
                "(() => {{ const r = document.evaluate({}, document, null, \
                 XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); \
                 const out = []; for (let i = 0; i < r.snapshotLength; i++) out.push(r.snapshotItem(i)); \
                 return out; }})()",
                js_literal(&xpath.unwrap_or_default())
            ),
        }
    }

    /// JavaScript expression evaluating to the first matching element or null
    #[must_use]
    pub fn to_query(&self) -> String {
        format!("({}[0] || null)", self.to_all_query())
    }

    /// JavaScript expression evaluating to the number of matches
    #[must_use]
    pub fn to_count_query(&self) -> String {
        format!("{}.length", self.to_all_query())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Css(css) => write!(f, "css={css}"),
            Self::Text(text) => write!(f, "text={text}"),
            Self::XPath(expr) => write!(f, "xpath={expr}"),
        }
    }
}

/// A named element reference on one screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    name: String,
    selector: Selector,
}

impl Locator {
    /// Create a locator from a display name and selector
    #[must_use]
    pub fn new(name: impl Into<String>, selector: Selector) -> Self {
        Self {
            name: name.into(),
            selector,
        }
    }

    /// Locate by element id
    #[must_use]
    pub fn id(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(name, Selector::id(id))
    }

    /// Locate by CSS selector
    #[must_use]
    pub fn css(name: impl Into<String>, css: impl Into<String>) -> Self {
        Self::new(name, Selector::css(css))
    }

    /// Locate by contained text
    #[must_use]
    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name, Selector::text(text))
    }

    /// Locate by XPath
    #[must_use]
    pub fn xpath(name: impl Into<String>, expr: impl Into<String>) -> Self {
        Self::new(name, Selector::xpath(expr))
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Underlying selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.selector)
    }
}

impl From<&Locator> for Selector {
    fn from(locator: &Locator) -> Self {
        locator.selector.clone()
    }
}

/// Quote a string as a JavaScript literal
#[must_use]
pub fn js_literal(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Quote a string as an XPath 1.0 literal
fn xpath_literal(value: &str) -> String {
    if !value.contains('"') {
        format!("\"{value}\"")
    } else if !value.contains('\'') {
        format!("'{value}'")
    } else {
        let parts: Vec<String> = value.split('"').map(|p| format!("\"{p}\"")).collect();
        format!("concat({})", parts.join(", '\"', "))
    }
}
