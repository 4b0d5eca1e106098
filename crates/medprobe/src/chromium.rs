//! Chromium driver over the Chrome DevTools Protocol.
//!
//! Element actions (click, type, hover, key presses) go through
//! chromiumoxide's element handles so they produce trusted input events.
//! Reads and style changes are evaluated in the page with the selector's
//! query expression.

use crate::driver::{BrowserConfig, BrowserDriver, StyleMutation};
use crate::locator::{js_literal, Selector};
use crate::result::{MedError, MedResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

/// Browser instance with one page, shared by every scenario of a run
pub struct ChromiumDriver {
    config: BrowserConfig,
    browser: Mutex<CdpBrowser>,
    page: CdpPage,
    handle: tokio::task::JoinHandle<()>,
}

impl std::fmt::Debug for ChromiumDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromiumDriver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ChromiumDriver {
    /// Launch Chromium and open a blank page
    ///
    /// # Errors
    ///
    /// Returns error if the browser cannot be launched or the page cannot be created
    pub async fn launch(config: BrowserConfig) -> MedResult<Self> {
        let mut builder =
            CdpConfig::builder().window_size(config.viewport_width, config.viewport_height);

        if !config.headless {
            builder = builder.with_head();
        }

        if !config.sandbox {
            builder = builder.no_sandbox();
        }

        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder
            .build()
            .map_err(|message| MedError::BrowserLaunch { message })?;

        let (browser, mut handler) = CdpBrowser::launch(cdp_config)
            .await
            .map_err(|e| MedError::BrowserLaunch {
                message: e.to_string(),
            })?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| MedError::BrowserLaunch {
                message: e.to_string(),
            })?;

        tracing::info!(headless = config.headless, "chromium launched");
        Ok(Self {
            config,
            browser: Mutex::new(browser),
            page,
            handle,
        })
    }

    /// Get the browser configuration
    #[must_use]
    pub const fn config(&self) -> &BrowserConfig {
        &self.config
    }

    async fn element(&self, selector: &Selector) -> MedResult<Element> {
        let found = match selector.as_css() {
            Some(css) => self.page.find_element(css).await,
            None => {
                self.page
                    .find_xpath(selector.as_xpath().unwrap_or_default())
                    .await
            }
        };
        found.map_err(|e| MedError::interaction(selector.to_string(), e.to_string()))
    }

    async fn eval<T: DeserializeOwned>(&self, context: &str, expr: String) -> MedResult<T> {
        let result = self
            .page
            .evaluate_expression(expr.as_str())
            .await
            .map_err(|e| MedError::interaction(context, e.to_string()))?;
        result
            .into_value()
            .map_err(|e| MedError::interaction(context, e.to_string()))
    }

    /// Evaluate a body against the first match; the body sees it as `el`
    /// and must return a JSON value. Returns `false`/`null` when nothing matches.
    async fn with_first<T: DeserializeOwned>(
        &self,
        selector: &Selector,
        on_missing: &str,
        body: &str,
    ) -> MedResult<T> {
        let expr = format!(
            "(() => {{ const el = {}; if (!el) return {on_missing}; {body} }})()",
            selector.to_query()
        );
        self.eval(&selector.to_string(), expr).await
    }

    fn missing(selector: &Selector) -> MedError {
        MedError::interaction(selector.to_string(), "no element matches")
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn goto(&self, url: &str) -> MedResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| MedError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn current_url(&self) -> MedResult<String> {
        let url = self.page.url().await.map_err(|e| MedError::Navigation {
            url: String::new(),
            message: e.to_string(),
        })?;
        Ok(url.unwrap_or_default())
    }

    async fn count(&self, selector: &Selector) -> MedResult<usize> {
        self.eval(&selector.to_string(), selector.to_count_query()).await
    }

    async fn is_visible(&self, selector: &Selector) -> MedResult<bool> {
        self.with_first(
            selector,
            "false",
            "const r = el.getBoundingClientRect(); const s = getComputedStyle(el); \
             return r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none';",
        )
        .await
    }

    async fn fill(&self, selector: &Selector, value: &str) -> MedResult<()> {
        self.clear(selector).await?;
        let element = self.element(selector).await?;
        element
            .focus()
            .await
            .map_err(|e| MedError::interaction(selector.to_string(), e.to_string()))?;
        element
            .type_str(value)
            .await
            .map_err(|e| MedError::interaction(selector.to_string(), e.to_string()))?;
        Ok(())
    }

    async fn clear(&self, selector: &Selector) -> MedResult<()> {
        let cleared: bool = self
            .with_first(
                selector,
                "false",
                "el.value = ''; el.dispatchEvent(new Event('input', { bubbles: true })); return true;",
            )
            .await?;
        if cleared {
            Ok(())
        } else {
            Err(Self::missing(selector))
        }
    }

    async fn click(&self, selector: &Selector) -> MedResult<()> {
        self.element(selector)
            .await?
            .click()
            .await
            .map_err(|e| MedError::interaction(selector.to_string(), e.to_string()))?;
        Ok(())
    }

    async fn hover(&self, selector: &Selector) -> MedResult<()> {
        self.element(selector)
            .await?
            .hover()
            .await
            .map_err(|e| MedError::interaction(selector.to_string(), e.to_string()))?;
        Ok(())
    }

    async fn press_key(&self, selector: &Selector, key: &str) -> MedResult<()> {
        let element = self.element(selector).await?;
        element
            .focus()
            .await
            .map_err(|e| MedError::interaction(selector.to_string(), e.to_string()))?;
        element
            .press_key(key)
            .await
            .map_err(|e| MedError::interaction(selector.to_string(), e.to_string()))?;
        Ok(())
    }

    async fn inner_text(&self, selector: &Selector) -> MedResult<String> {
        let text = self
            .element(selector)
            .await?
            .inner_text()
            .await
            .map_err(|e| MedError::interaction(selector.to_string(), e.to_string()))?;
        Ok(text.unwrap_or_default())
    }

    async fn all_inner_texts(&self, selector: &Selector) -> MedResult<Vec<String>> {
        let expr = format!("{}.map(el => el.innerText)", selector.to_all_query());
        self.eval(&selector.to_string(), expr).await
    }

    async fn text_content(&self, selector: &Selector) -> MedResult<Option<String>> {
        self.with_first(selector, "null", "return el.textContent;")
            .await
    }

    async fn attribute(&self, selector: &Selector, name: &str) -> MedResult<Option<String>> {
        self.element(selector)
            .await?
            .attribute(name)
            .await
            .map_err(|e| MedError::interaction(selector.to_string(), e.to_string()))
    }

    async fn select_option(&self, selector: &Selector, label: &str) -> MedResult<()> {
        let body = format!(
            "const opt = Array.from(el.options || []).find(o => o.text.trim() === {}); \
             if (!opt) return false; el.value = opt.value; \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); return true;",
            js_literal(label)
        );
        let selected: bool = self.with_first(selector, "false", &body).await?;
        if selected {
            Ok(())
        } else {
            Err(MedError::interaction(
                selector.to_string(),
                format!("no option labelled {label:?}"),
            ))
        }
    }

    async fn apply_style(&self, selector: &Selector, style: &StyleMutation) -> MedResult<()> {
        let mut body = String::from("const prev = {};");
        for (property, value) in &style.properties {
            let prop = js_literal(property);
            body.push_str(&format!(
                " prev[{prop}] = el.style[{prop}]; el.style[{prop}] = {};",
                js_literal(value)
            ));
        }
        if let Some(delay) = style.revert_after {
            body.push_str(&format!(
                " setTimeout(() => {{ for (const k in prev) el.style[k] = prev[k]; }}, {});",
                delay.as_millis()
            ));
        }
        body.push_str(" return true;");

        let applied: bool = self.with_first(selector, "false", &body).await?;
        if applied {
            Ok(())
        } else {
            Err(Self::missing(selector))
        }
    }

    async fn arm_dialog_capture(&self) -> MedResult<()> {
        let expr = "(() => { window.__medprobeDialogs = []; \
                    window.alert = m => { window.__medprobeDialogs.push(String(m)); }; \
                    window.confirm = m => { window.__medprobeDialogs.push(String(m)); return true; }; \
                    return true; })()"
            .to_string();
        let _: bool = self.eval("dialog capture", expr).await?;
        Ok(())
    }

    async fn take_dialog_message(&self) -> MedResult<Option<String>> {
        let expr = "(() => { const d = window.__medprobeDialogs || []; \
                    return d.length ? d.pop() : null; })()"
            .to_string();
        self.eval("dialog capture", expr).await
    }

    async fn close(&self) -> MedResult<()> {
        let mut browser = self.browser.lock().await;
        browser
            .close()
            .await
            .map_err(|e| MedError::BrowserLaunch {
                message: e.to_string(),
            })?;
        self.handle.abort();
        Ok(())
    }
}
