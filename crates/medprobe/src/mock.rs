//! In-memory page model implementing [`BrowserDriver`].
//!
//! Elements are registered per [`Selector`]; a selector may map to several
//! elements for list reads. Reactions attached to clicks, key presses,
//! hovers, and selections mutate the model, which is how tests script the
//! application's responses (a login click reveals the admin menu, a search
//! fills the result grid, and so on).

use crate::driver::{BrowserDriver, StyleMutation};
use crate::locator::Selector;
use crate::result::{MedError, MedResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One element in the page model
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockElement {
    /// Rendered text
    pub text: String,
    /// Input value
    pub value: String,
    /// Whether the element is rendered
    pub visible: bool,
    /// Attributes
    pub attributes: HashMap<String, String>,
    /// Inline style
    pub style: HashMap<String, String>,
    /// Option labels (for `<select>`)
    pub options: Vec<String>,
}

impl MockElement {
    /// A visible element with text
    #[must_use]
    pub fn visible(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visible: true,
            ..Self::default()
        }
    }

    /// A present but hidden element
    #[must_use]
    pub fn hidden() -> Self {
        Self::default()
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set select options
    #[must_use]
    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| (*o).to_string()).collect();
        self
    }

    /// Set the input value
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

/// What fires a reaction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Click on the selector
    Click(Selector),
    /// Key press on the selector
    Key(Selector, String),
    /// Hover over the selector
    Hover(Selector),
    /// Option selected on the selector
    Select(Selector),
    /// Navigation to any URL
    Navigate,
}

type Reaction = Arc<dyn Fn(&mut MockPage) + Send + Sync>;

/// The mutable page model handed to reactions
#[derive(Default)]
pub struct MockPage {
    url: String,
    elements: HashMap<Selector, Vec<MockElement>>,
    reactions: Vec<(Trigger, Reaction)>,
    history: Vec<String>,
    style_log: Vec<(Selector, StyleMutation)>,
    pending_reverts: Vec<(Selector, Vec<(String, Option<String>)>)>,
    dialogs_armed: bool,
    dialogs: Vec<String>,
}

impl std::fmt::Debug for MockPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockPage")
            .field("url", &self.url)
            .field("elements", &self.elements.len())
            .field("reactions", &self.reactions.len())
            .field("history", &self.history.len())
            .finish()
    }
}

impl MockPage {
    /// Current URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Set the current URL
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Register (or replace) a single element
    pub fn put(&mut self, selector: impl Into<Selector>, element: MockElement) {
        let _ = self.elements.insert(selector.into(), vec![element]);
    }

    /// Register (or replace) every element matching a selector
    pub fn put_all(&mut self, selector: impl Into<Selector>, elements: Vec<MockElement>) {
        let _ = self.elements.insert(selector.into(), elements);
    }

    /// Remove every element matching a selector
    pub fn remove(&mut self, selector: impl Into<Selector>) {
        let _ = self.elements.remove(&selector.into());
    }

    /// Show the first match, creating it when absent
    pub fn show(&mut self, selector: impl Into<Selector>) {
        let list = self.elements.entry(selector.into()).or_default();
        if list.is_empty() {
            list.push(MockElement::default());
        }
        list[0].visible = true;
    }

    /// Hide every match
    pub fn hide(&mut self, selector: impl Into<Selector>) {
        if let Some(list) = self.elements.get_mut(&selector.into()) {
            for element in list {
                element.visible = false;
            }
        }
    }

    /// Replace the matches with visible elements carrying these texts
    pub fn set_texts(&mut self, selector: impl Into<Selector>, texts: &[&str]) {
        let elements = texts.iter().map(|t| MockElement::visible(*t)).collect();
        self.put_all(selector, elements);
    }

    /// Value of the first match
    #[must_use]
    pub fn value_of(&self, selector: &Selector) -> Option<String> {
        self.first(selector).map(|e| e.value.clone())
    }

    /// Inline style property of the first match
    #[must_use]
    pub fn style_of(&self, selector: &Selector, property: &str) -> Option<String> {
        self.first(selector)
            .and_then(|e| e.style.get(property).cloned())
    }

    /// Whether the first match is visible
    #[must_use]
    pub fn is_shown(&self, selector: &Selector) -> bool {
        self.first(selector).is_some_and(|e| e.visible)
    }

    /// Raise an alert/confirm dialog; recorded only when capture is armed
    pub fn raise_dialog(&mut self, message: impl Into<String>) {
        if self.dialogs_armed {
            self.dialogs.push(message.into());
        }
    }

    fn first(&self, selector: &Selector) -> Option<&MockElement> {
        self.elements.get(selector).and_then(|list| list.first())
    }

    fn first_mut(&mut self, selector: &Selector) -> MedResult<&mut MockElement> {
        self.elements
            .get_mut(selector)
            .and_then(|list| list.first_mut())
            .ok_or_else(|| MedError::interaction(selector.to_string(), "no element matches"))
    }

    fn fire(&mut self, trigger: &Trigger) {
        let matching: Vec<Reaction> = self
            .reactions
            .iter()
            .filter(|(t, _)| t == trigger)
            .map(|(_, r)| Arc::clone(r))
            .collect();
        for reaction in matching {
            reaction(self);
        }
    }
}

/// Mock driver for page-object tests
#[derive(Debug, Default)]
pub struct MockDriver {
    page: Mutex<MockPage>,
}

impl MockDriver {
    /// Create an empty page model
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockPage> {
        self.page.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register (or replace) a single element
    pub fn put(&self, selector: impl Into<Selector>, element: MockElement) -> &Self {
        self.lock().put(selector, element);
        self
    }

    /// Register (or replace) every element matching a selector
    pub fn put_all(&self, selector: impl Into<Selector>, elements: Vec<MockElement>) -> &Self {
        self.lock().put_all(selector, elements);
        self
    }

    /// Attach a reaction
    pub fn on(
        &self,
        trigger: Trigger,
        reaction: impl Fn(&mut MockPage) + Send + Sync + 'static,
    ) -> &Self {
        self.lock().reactions.push((trigger, Arc::new(reaction)));
        self
    }

    /// Read the page model
    pub fn inspect<R>(&self, f: impl FnOnce(&MockPage) -> R) -> R {
        f(&self.lock())
    }

    /// Mutate the page model directly
    pub fn update(&self, f: impl FnOnce(&mut MockPage)) {
        f(&mut self.lock());
    }

    /// Call history, e.g. `click:#login`
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    /// Check if a call with this prefix was made
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.lock().history.iter().any(|c| c.starts_with(prefix))
    }

    /// Every style mutation applied, in order
    #[must_use]
    pub fn style_log(&self) -> Vec<(Selector, StyleMutation)> {
        self.lock().style_log.clone()
    }

    /// Run the scheduled style reverts now
    pub fn flush_reverts(&self) {
        let mut page = self.lock();
        let reverts = std::mem::take(&mut page.pending_reverts);
        for (selector, previous) in reverts {
            if let Ok(element) = page.first_mut(&selector) {
                for (property, value) in previous {
                    match value {
                        Some(v) => {
                            let _ = element.style.insert(property, v);
                        }
                        None => {
                            let _ = element.style.remove(&property);
                        }
                    }
                }
            }
        }
    }

    fn record(&self, call: String) -> MutexGuard<'_, MockPage> {
        let mut page = self.lock();
        page.history.push(call);
        page
    }
}

#[async_trait]
impl BrowserDriver for MockDriver {
    async fn goto(&self, url: &str) -> MedResult<()> {
        let mut page = self.record(format!("goto:{url}"));
        page.url = url.to_string();
        page.fire(&Trigger::Navigate);
        Ok(())
    }

    async fn current_url(&self) -> MedResult<String> {
        Ok(self.lock().url.clone())
    }

    async fn count(&self, selector: &Selector) -> MedResult<usize> {
        Ok(self.lock().elements.get(selector).map_or(0, Vec::len))
    }

    async fn is_visible(&self, selector: &Selector) -> MedResult<bool> {
        Ok(self.lock().is_shown(selector))
    }

    async fn fill(&self, selector: &Selector, value: &str) -> MedResult<()> {
        let mut page = self.record(format!("fill:{selector}={value}"));
        page.first_mut(selector)?.value = value.to_string();
        Ok(())
    }

    async fn clear(&self, selector: &Selector) -> MedResult<()> {
        let mut page = self.record(format!("clear:{selector}"));
        page.first_mut(selector)?.value.clear();
        Ok(())
    }

    async fn click(&self, selector: &Selector) -> MedResult<()> {
        let mut page = self.record(format!("click:{selector}"));
        if !page.first_mut(selector)?.visible {
            return Err(MedError::interaction(selector.to_string(), "element is not visible"));
        }
        page.fire(&Trigger::Click(selector.clone()));
        Ok(())
    }

    async fn hover(&self, selector: &Selector) -> MedResult<()> {
        let mut page = self.record(format!("hover:{selector}"));
        let _ = page.first_mut(selector)?;
        page.fire(&Trigger::Hover(selector.clone()));
        Ok(())
    }

    async fn press_key(&self, selector: &Selector, key: &str) -> MedResult<()> {
        let mut page = self.record(format!("press:{selector}:{key}"));
        let _ = page.first_mut(selector)?;
        page.fire(&Trigger::Key(selector.clone(), key.to_string()));
        Ok(())
    }

    async fn inner_text(&self, selector: &Selector) -> MedResult<String> {
        let mut page = self.lock();
        Ok(page.first_mut(selector)?.text.clone())
    }

    async fn all_inner_texts(&self, selector: &Selector) -> MedResult<Vec<String>> {
        Ok(self
            .lock()
            .elements
            .get(selector)
            .map(|list| list.iter().map(|e| e.text.clone()).collect())
            .unwrap_or_default())
    }

    async fn text_content(&self, selector: &Selector) -> MedResult<Option<String>> {
        Ok(self.lock().first(selector).map(|e| e.text.clone()))
    }

    async fn attribute(&self, selector: &Selector, name: &str) -> MedResult<Option<String>> {
        let mut page = self.lock();
        Ok(page.first_mut(selector)?.attributes.get(name).cloned())
    }

    async fn select_option(&self, selector: &Selector, label: &str) -> MedResult<()> {
        let mut page = self.record(format!("select:{selector}={label}"));
        let element = page.first_mut(selector)?;
        if !element.options.iter().any(|o| o == label) {
            return Err(MedError::interaction(
                selector.to_string(),
                format!("no option labelled {label:?}"),
            ));
        }
        element.value = label.to_string();
        page.fire(&Trigger::Select(selector.clone()));
        Ok(())
    }

    async fn apply_style(&self, selector: &Selector, style: &StyleMutation) -> MedResult<()> {
        let mut page = self.lock();
        let element = page.first_mut(selector)?;
        let mut previous = Vec::with_capacity(style.properties.len());
        for (property, value) in &style.properties {
            previous.push((
                property.clone(),
                element.style.insert(property.clone(), value.clone()),
            ));
        }
        if style.revert_after.is_some() {
            page.pending_reverts.push((selector.clone(), previous));
        }
        page.style_log.push((selector.clone(), style.clone()));
        Ok(())
    }

    async fn arm_dialog_capture(&self) -> MedResult<()> {
        let mut page = self.record("arm_dialogs".to_string());
        page.dialogs_armed = true;
        page.dialogs.clear();
        Ok(())
    }

    async fn take_dialog_message(&self) -> MedResult<Option<String>> {
        Ok(self.lock().dialogs.pop())
    }

    async fn close(&self) -> MedResult<()> {
        drop(self.record("close".to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn button() -> Selector {
        Selector::id("login")
    }

    mod element_tests {
        use super::*;

        #[test]
        fn test_builders() {
            let el = MockElement::visible("OK")
                .with_attr("title", "Mark as favourite")
                .with_value("x");
            assert!(el.visible);
            assert_eq!(el.attributes.get("title").map(String::as_str), Some("Mark as favourite"));
            assert_eq!(el.value, "x");
            assert!(!MockElement::hidden().visible);
        }
    }

    mod driver_tests {
        use super::*;

        #[tokio::test]
        async fn test_click_fires_reaction() {
            let driver = MockDriver::new();
            driver.put(button(), MockElement::visible("Sign In"));
            driver.on(Trigger::Click(button()), |page| {
                page.show(Selector::css("li.dropdown-user"));
            });

            driver.click(&button()).await.unwrap();
            assert!(driver.is_visible(&Selector::css("li.dropdown-user")).await.unwrap());
            assert!(driver.was_called("click:#login"));
        }

        #[tokio::test]
        async fn test_click_missing_element_is_interaction_error() {
            let driver = MockDriver::new();
            let err = driver.click(&button()).await.unwrap_err();
            assert!(err.is_interaction());
        }

        #[tokio::test]
        async fn test_click_hidden_element_fails() {
            let driver = MockDriver::new();
            driver.put(button(), MockElement::hidden());
            assert!(driver.click(&button()).await.is_err());
        }

        #[tokio::test]
        async fn test_fill_and_clear() {
            let driver = MockDriver::new();
            let input = Selector::id("quickFilterInput");
            driver.put(input.clone(), MockElement::visible(""));
            driver.fill(&input, "Ram").await.unwrap();
            assert_eq!(driver.inspect(|p| p.value_of(&input)), Some("Ram".into()));
            driver.clear(&input).await.unwrap();
            assert_eq!(driver.inspect(|p| p.value_of(&input)), Some(String::new()));
        }

        #[tokio::test]
        async fn test_style_revert() {
            let driver = MockDriver::new();
            driver.put(button(), MockElement::visible("Sign In"));
            let style = StyleMutation::new()
                .set("border", "2px solid yellow")
                .revert_after(Duration::from_secs(1));
            driver.apply_style(&button(), &style).await.unwrap();
            assert_eq!(
                driver.inspect(|p| p.style_of(&button(), "border")),
                Some("2px solid yellow".into())
            );
            driver.flush_reverts();
            assert_eq!(driver.inspect(|p| p.style_of(&button(), "border")), None);
        }

        #[tokio::test]
        async fn test_dialogs_only_recorded_when_armed() {
            let driver = MockDriver::new();
            driver.update(|p| p.raise_dialog("ignored"));
            assert_eq!(driver.take_dialog_message().await.unwrap(), None);

            driver.arm_dialog_capture().await.unwrap();
            driver.update(|p| p.raise_dialog("Scan done"));
            assert_eq!(
                driver.take_dialog_message().await.unwrap(),
                Some("Scan done".into())
            );
        }

        #[tokio::test]
        async fn test_select_unknown_option_fails() {
            let driver = MockDriver::new();
            let select = Selector::css("select");
            driver.put(select.clone(), MockElement::visible("").with_options(&["Last 1 Week"]));
            assert!(driver.select_option(&select, "Last 1 Year").await.is_err());
            driver.select_option(&select, "Last 1 Week").await.unwrap();
            assert_eq!(driver.inspect(|p| p.value_of(&select)), Some("Last 1 Week".into()));
        }

        #[tokio::test]
        async fn test_close_is_recorded_and_releases_page() {
            let driver = MockDriver::new();
            driver.close().await.unwrap();
            assert_eq!(driver.history(), vec!["close".to_string()]);
            driver.goto("http://his.test/").await.unwrap();
            assert!(driver.was_called("goto:http://his.test/"));
        }
    }
}
