//! Abstract browser capability surface.
//!
//! The suite consumes the browser through the [`Driver`] trait: navigate,
//! read title/URL, resolve locators, read text, click, execute script,
//! scroll, and switch windows. The trait is the seam that lets the same
//! page objects run against a real CDP browser (feature `browser`) or the
//! scriptable [`crate::mock::MockDriver`] in tests, and protects the suite
//! against automation-backend churn.

use crate::locator::Locator;
use crate::result::CarreraResult;
use async_trait::async_trait;
use serde_json::Value;

/// Object-safe async capability trait the session drives.
///
/// Implementations report failures as [`crate::result::CarreraError`]; the
/// session layer is responsible for degrading them to logged, falsy
/// outcomes. Native `click` must deliver a real input event and report
/// `NotInteractable` when the element cannot receive one, so the session
/// can fall back to `script_click`.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Navigate the active window to a URL
    async fn navigate(&self, url: &str) -> CarreraResult<()>;

    /// Title of the active document
    async fn title(&self) -> CarreraResult<String>;

    /// URL of the active window
    async fn current_url(&self) -> CarreraResult<String>;

    /// document.readyState of the active document
    async fn ready_state(&self) -> CarreraResult<String>;

    /// Evaluate a script in page context, returning its JSON value
    async fn evaluate(&self, script: &str) -> CarreraResult<Value>;

    /// Number of elements matching the locator
    async fn count(&self, locator: &Locator) -> CarreraResult<usize>;

    /// Trimmed text of the first match, None when absent
    async fn text(&self, locator: &Locator) -> CarreraResult<Option<String>>;

    /// Text of every match, extracted in one page round trip
    async fn all_texts(&self, locator: &Locator) -> CarreraResult<Vec<String>>;

    /// Whether the first match is rendered with non-zero size
    async fn is_visible(&self, locator: &Locator) -> CarreraResult<bool>;

    /// Whether the first match is visible and enabled
    async fn is_clickable(&self, locator: &Locator) -> CarreraResult<bool>;

    /// Deliver a native input click to the first match
    async fn click(&self, locator: &Locator) -> CarreraResult<()>;

    /// Script-driven click on the first match
    async fn script_click(&self, locator: &Locator) -> CarreraResult<()>;

    /// Script-driven click on the match at `index`
    async fn script_click_nth(&self, locator: &Locator, index: usize) -> CarreraResult<()>;

    /// Smooth-scroll the first match to viewport center
    async fn scroll_into_view(&self, locator: &Locator) -> CarreraResult<()>;

    /// Inject a value into the first match, dispatching input/change events
    async fn set_value(&self, locator: &Locator, value: &str) -> CarreraResult<()>;

    /// Handles of all open windows, oldest first
    async fn window_handles(&self) -> CarreraResult<Vec<String>>;

    /// Make the window with the given handle active
    async fn switch_to_window(&self, handle: &str) -> CarreraResult<()>;

    /// PNG screenshot of the active window
    async fn screenshot(&self) -> CarreraResult<Vec<u8>>;

    /// Tear the browser down
    async fn close(&self) -> CarreraResult<()>;
}

// ============================================================================
// Real CDP Implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::{Driver, Locator, Value};
    use crate::config::{BrowserEngine, SuiteConfig};
    use crate::result::{CarreraError, CarreraResult};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::input::{
        DispatchMouseEventParams, DispatchMouseEventType, MouseButton,
    };
    use chromiumoxide::cdp::browser_protocol::page::{
        CaptureScreenshotFormat, CaptureScreenshotParams,
    };
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use serde::Deserialize;
    use tokio::sync::Mutex;

    #[derive(Debug, Deserialize)]
    struct HitTest {
        x: f64,
        y: f64,
        reachable: bool,
    }

    /// Driver implementation speaking the Chrome DevTools Protocol.
    #[derive(Debug)]
    pub struct CdpDriver {
        browser: Mutex<CdpBrowser>,
        page: Mutex<CdpPage>,
        #[allow(dead_code)]
        handle: tokio::task::JoinHandle<()>,
    }

    impl CdpDriver {
        /// Launch a browser for the given engine profile.
        ///
        /// # Errors
        ///
        /// Returns [`CarreraError::BrowserLaunch`] if the engine does not
        /// speak CDP or the process cannot be started.
        pub async fn launch(config: &SuiteConfig, engine: BrowserEngine) -> CarreraResult<Self> {
            if !engine.speaks_cdp() {
                return Err(CarreraError::BrowserLaunch {
                    message: format!("engine '{engine}' is not CDP-capable"),
                });
            }

            let mut builder = CdpConfig::builder().args(engine.launch_args().to_vec());
            if !config.headless {
                builder = builder.with_head();
            }

            let cdp_config = builder.build().map_err(|e| CarreraError::BrowserLaunch {
                message: e.to_string(),
            })?;

            let (browser, mut handler) =
                CdpBrowser::launch(cdp_config)
                    .await
                    .map_err(|e| CarreraError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            // Drive the CDP event loop until the connection drops
            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            let page =
                browser
                    .new_page("about:blank")
                    .await
                    .map_err(|e| CarreraError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            Ok(Self {
                browser: Mutex::new(browser),
                page: Mutex::new(page),
                handle,
            })
        }

        async fn eval_value(&self, script: &str) -> CarreraResult<Value> {
            let page = self.page.lock().await;
            let result = page
                .evaluate(script)
                .await
                .map_err(|e| CarreraError::Eval {
                    message: e.to_string(),
                })?;
            Ok(result.value().cloned().unwrap_or(Value::Null))
        }

        async fn dispatch_click(&self, x: f64, y: f64) -> CarreraResult<()> {
            let page = self.page.lock().await;
            for kind in [
                DispatchMouseEventType::MousePressed,
                DispatchMouseEventType::MouseReleased,
            ] {
                let params = DispatchMouseEventParams::builder()
                    .r#type(kind)
                    .x(x)
                    .y(y)
                    .button(MouseButton::Left)
                    .click_count(1)
                    .build()
                    .map_err(|e| CarreraError::Eval {
                        message: e.to_string(),
                    })?;
                page.execute(params)
                    .await
                    .map_err(|e| CarreraError::Eval {
                        message: e.to_string(),
                    })?;
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Driver for CdpDriver {
        async fn navigate(&self, url: &str) -> CarreraResult<()> {
            let page = self.page.lock().await;
            page.goto(url)
                .await
                .map_err(|e| CarreraError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn title(&self) -> CarreraResult<String> {
            let page = self.page.lock().await;
            let title = page.get_title().await.map_err(|e| CarreraError::Eval {
                message: e.to_string(),
            })?;
            Ok(title.unwrap_or_default())
        }

        async fn current_url(&self) -> CarreraResult<String> {
            let page = self.page.lock().await;
            let url = page.url().await.map_err(|e| CarreraError::Eval {
                message: e.to_string(),
            })?;
            Ok(url.unwrap_or_default())
        }

        async fn ready_state(&self) -> CarreraResult<String> {
            let value = self.eval_value("document.readyState").await?;
            Ok(value.as_str().unwrap_or_default().to_string())
        }

        async fn evaluate(&self, script: &str) -> CarreraResult<Value> {
            self.eval_value(script).await
        }

        async fn count(&self, locator: &Locator) -> CarreraResult<usize> {
            let value = self.eval_value(&locator.to_count_query()).await?;
            Ok(value.as_u64().unwrap_or(0) as usize)
        }

        async fn text(&self, locator: &Locator) -> CarreraResult<Option<String>> {
            let value = self.eval_value(&locator.to_text_query()).await?;
            Ok(value.as_str().map(ToString::to_string))
        }

        async fn all_texts(&self, locator: &Locator) -> CarreraResult<Vec<String>> {
            let value = self.eval_value(&locator.to_all_texts_query()).await?;
            Ok(serde_json::from_value(value).unwrap_or_default())
        }

        async fn is_visible(&self, locator: &Locator) -> CarreraResult<bool> {
            let value = self.eval_value(&locator.to_visible_query()).await?;
            Ok(value.as_bool().unwrap_or(false))
        }

        async fn is_clickable(&self, locator: &Locator) -> CarreraResult<bool> {
            let value = self.eval_value(&locator.to_clickable_query()).await?;
            Ok(value.as_bool().unwrap_or(false))
        }

        async fn click(&self, locator: &Locator) -> CarreraResult<()> {
            let value = self.eval_value(&locator.to_hit_test_query()).await?;
            if value.is_null() {
                return Err(CarreraError::NotFound {
                    locator: locator.to_string(),
                });
            }
            let hit: HitTest = serde_json::from_value(value)?;
            if !hit.reachable {
                return Err(CarreraError::NotInteractable {
                    locator: locator.to_string(),
                });
            }
            self.dispatch_click(hit.x, hit.y).await
        }

        async fn script_click(&self, locator: &Locator) -> CarreraResult<()> {
            let value = self.eval_value(&locator.to_click_query()).await?;
            if value.as_bool().unwrap_or(false) {
                Ok(())
            } else {
                Err(CarreraError::NotFound {
                    locator: locator.to_string(),
                })
            }
        }

        async fn script_click_nth(&self, locator: &Locator, index: usize) -> CarreraResult<()> {
            let value = self.eval_value(&locator.to_click_nth_query(index)).await?;
            if value.as_bool().unwrap_or(false) {
                Ok(())
            } else {
                Err(CarreraError::NotFound {
                    locator: format!("{locator}[{index}]"),
                })
            }
        }

        async fn scroll_into_view(&self, locator: &Locator) -> CarreraResult<()> {
            let value = self.eval_value(&locator.to_scroll_query()).await?;
            if value.as_bool().unwrap_or(false) {
                Ok(())
            } else {
                Err(CarreraError::NotFound {
                    locator: locator.to_string(),
                })
            }
        }

        async fn set_value(&self, locator: &Locator, new_value: &str) -> CarreraResult<()> {
            let value = self
                .eval_value(&locator.to_set_value_query(new_value))
                .await?;
            if value.as_bool().unwrap_or(false) {
                Ok(())
            } else {
                Err(CarreraError::NotFound {
                    locator: locator.to_string(),
                })
            }
        }

        async fn window_handles(&self) -> CarreraResult<Vec<String>> {
            let browser = self.browser.lock().await;
            let pages = browser.pages().await.map_err(|e| CarreraError::Eval {
                message: e.to_string(),
            })?;
            Ok((0..pages.len()).map(|i| format!("window-{i}")).collect())
        }

        async fn switch_to_window(&self, handle: &str) -> CarreraResult<()> {
            let index: usize = handle
                .strip_prefix("window-")
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| CarreraError::WindowSwitch {
                    message: format!("unknown handle '{handle}'"),
                })?;
            let browser = self.browser.lock().await;
            let pages = browser.pages().await.map_err(|e| CarreraError::Eval {
                message: e.to_string(),
            })?;
            let target = pages
                .into_iter()
                .nth(index)
                .ok_or_else(|| CarreraError::WindowSwitch {
                    message: format!("no window at index {index}"),
                })?;
            *self.page.lock().await = target;
            Ok(())
        }

        async fn screenshot(&self) -> CarreraResult<Vec<u8>> {
            let page = self.page.lock().await;
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .build();
            let screenshot = page
                .execute(params)
                .await
                .map_err(|e| CarreraError::Screenshot {
                    message: e.to_string(),
                })?;

            use base64::Engine;
            base64::engine::general_purpose::STANDARD
                .decode(&screenshot.data)
                .map_err(|e| CarreraError::Screenshot {
                    message: e.to_string(),
                })
        }

        async fn close(&self) -> CarreraResult<()> {
            let mut browser = self.browser.lock().await;
            browser
                .close()
                .await
                .map_err(|e| CarreraError::BrowserLaunch {
                    message: e.to_string(),
                })?;
            Ok(())
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::CdpDriver;
