//! Page sessions: one isolated browser instance and one page per scenario.
//!
//! With the `browser` feature enabled this drives a real headless Chromium
//! over the Chrome DevTools Protocol via chromiumoxide. Without the feature
//! a deterministic in-memory mock stands in so runner, step, and check
//! logic stays unit-testable on machines with no Chromium.
//!
//! A session is never reused across scenarios. The console sink is
//! registered exactly once at open; the runner drains it at teardown.

use std::path::PathBuf;

#[cfg(not(feature = "browser"))]
use crate::locator::Target;

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Run the browser headless
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to a chromium binary (None = auto-detect, then CHROMIUM_PATH)
    pub chromium_path: Option<PathBuf>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
    #[cfg(not(feature = "browser"))]
    pub(crate) seeded: Vec<Target>,
    #[cfg(not(feature = "browser"))]
    pub(crate) probe: Option<std::sync::Arc<SessionProbe>>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            chromium_path: None,
            sandbox: true,
            #[cfg(not(feature = "browser"))]
            seeded: Vec::new(),
            #[cfg(not(feature = "browser"))]
            probe: None,
        }
    }
}

impl SessionConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

#[cfg(not(feature = "browser"))]
impl SessionConfig {
    /// Pre-populate the mock page with an element
    #[must_use]
    pub fn seed_element(mut self, target: Target) -> Self {
        self.seeded.push(target);
        self
    }

    /// Attach a probe observing session lifecycle and actions
    #[must_use]
    pub fn with_probe(mut self, probe: std::sync::Arc<SessionProbe>) -> Self {
        self.probe = Some(probe);
        self
    }
}

// ============================================================================
// Real CDP implementation (when the `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::SessionConfig;
    use crate::locator::Target;
    use crate::result::{VerifyError, VerifyResult};
    use chromiumoxide::browser::{Browser, BrowserConfig};
    use chromiumoxide::cdp::browser_protocol::input::{
        DispatchKeyEventParams, DispatchKeyEventType,
    };
    use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
    use chromiumoxide::cdp::js_protocol::runtime as cdp_runtime;
    use chromiumoxide::page::{Page, ScreenshotParams};
    use futures::StreamExt;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tokio::task::JoinHandle;
    use tracing::{debug, warn};

    /// One browser process plus one page, exclusively owned for a scenario
    #[derive(Debug)]
    pub struct Session {
        config: SessionConfig,
        browser: Option<Browser>,
        page: Option<Page>,
        handler_task: JoinHandle<()>,
        console_task: JoinHandle<()>,
        console: Arc<Mutex<Vec<String>>>,
    }

    impl Session {
        /// Launch a browser, open a page, and register the console sink
        pub async fn open(config: SessionConfig) -> VerifyResult<Self> {
            let mut builder = BrowserConfig::builder()
                .window_size(config.viewport_width, config.viewport_height);

            if !config.headless {
                builder = builder.with_head();
            }
            if !config.sandbox {
                builder = builder.no_sandbox();
            }
            let chromium_path = config
                .chromium_path
                .clone()
                .or_else(|| std::env::var("CHROMIUM_PATH").ok().map(PathBuf::from));
            if let Some(path) = chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|message| VerifyError::Launch { message })?;

            let (browser, mut handler) = Browser::launch(cdp_config)
                .await
                .map_err(|e| VerifyError::launch(e.to_string()))?;

            // CDP message pump
            let handler_task = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| VerifyError::page(e.to_string()))?;

            // Console sink, registered once per session; forwarded page
            // messages accumulate here until drained at teardown.
            let console = Arc::new(Mutex::new(Vec::new()));
            let _ = page.execute(cdp_runtime::EnableParams::default()).await;
            let mut events = page
                .event_listener::<cdp_runtime::EventConsoleApiCalled>()
                .await
                .map_err(|e| VerifyError::page(e.to_string()))?;
            let sink = Arc::clone(&console);
            let console_task = tokio::spawn(async move {
                while let Some(event) = events.next().await {
                    sink.lock().await.push(format_console_event(&event));
                }
            });

            debug!(
                width = config.viewport_width,
                height = config.viewport_height,
                "session open"
            );

            Ok(Self {
                config,
                browser: Some(browser),
                page: Some(page),
                handler_task,
                console_task,
                console,
            })
        }

        /// Get the session configuration
        #[must_use]
        pub const fn config(&self) -> &SessionConfig {
            &self.config
        }

        /// Whether the session has been closed
        #[must_use]
        pub const fn is_closed(&self) -> bool {
            self.browser.is_none()
        }

        /// Close the browser. Idempotent; later calls are no-ops.
        pub async fn close(&mut self) -> VerifyResult<()> {
            let Some(mut browser) = self.browser.take() else {
                return Ok(());
            };
            self.page = None;
            let result = browser.close().await;
            let _ = browser.wait().await;
            self.console_task.abort();
            self.handler_task.abort();
            result.map_err(|e| VerifyError::page(format!("browser close failed: {e}")))?;
            debug!("session closed");
            Ok(())
        }

        fn page(&self) -> VerifyResult<&Page> {
            self.page
                .as_ref()
                .ok_or_else(|| VerifyError::page("session is closed"))
        }

        /// Navigate and wait for the load to complete
        pub async fn navigate(&self, url: &str) -> VerifyResult<()> {
            let page = self.page()?;
            page.goto(url).await.map_err(|e| VerifyError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
            page.wait_for_navigation()
                .await
                .map_err(|e| VerifyError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        /// Whether an element matching the target currently exists
        pub async fn exists(&self, target: &Target) -> VerifyResult<bool> {
            self.eval_bool(&target.to_exists_query()).await
        }

        /// Whether an element matching the target is currently visible
        pub async fn is_visible(&self, target: &Target) -> VerifyResult<bool> {
            self.eval_bool(&target.to_visible_query()).await
        }

        /// Click the targeted element. CSS-addressable targets get a trusted
        /// CDP click; text/role targets fall back to an in-page click.
        pub async fn click(&self, target: &Target) -> VerifyResult<()> {
            let page = self.page()?;
            if let Some(selector) = target.as_css() {
                let element = page.find_element(&selector).await.map_err(|e| {
                    VerifyError::page(format!("element {target} not found: {e}"))
                })?;
                element
                    .click()
                    .await
                    .map_err(|e| VerifyError::page(format!("click on {target} failed: {e}")))?;
            } else {
                let query = target.to_query();
                let clicked = self
                    .eval_bool(&format!(
                        "(() => {{ const el = {query}; if (!el) return false; el.click(); return true; }})()"
                    ))
                    .await?;
                if !clicked {
                    return Err(VerifyError::page(format!("element {target} not found")));
                }
            }
            Ok(())
        }

        /// Fill the targeted input with a value
        pub async fn fill(&self, target: &Target, value: &str) -> VerifyResult<()> {
            let page = self.page()?;
            if let Some(selector) = target.as_css() {
                let element = page.find_element(&selector).await.map_err(|e| {
                    VerifyError::page(format!("element {target} not found: {e}"))
                })?;
                element
                    .click()
                    .await
                    .map_err(|e| VerifyError::page(format!("focus on {target} failed: {e}")))?;
                element
                    .type_str(value)
                    .await
                    .map_err(|e| VerifyError::page(format!("typing into {target} failed: {e}")))?;
            } else {
                let query = target.to_query();
                let filled = self
                    .eval_bool(&format!(
                        "(() => {{ const el = {query}; if (!el) return false; el.focus(); el.value = {value:?}; el.dispatchEvent(new Event('input', {{ bubbles: true }})); el.dispatchEvent(new Event('change', {{ bubbles: true }})); return true; }})()"
                    ))
                    .await?;
                if !filled {
                    return Err(VerifyError::page(format!("element {target} not found")));
                }
            }
            Ok(())
        }

        /// Press a key (keydown + keyup) on the page
        pub async fn press_key(&self, key: &str) -> VerifyResult<()> {
            let page = self.page()?;
            let down = DispatchKeyEventParams::builder()
                .r#type(DispatchKeyEventType::KeyDown)
                .key(key.to_string())
                .build()
                .map_err(|e| VerifyError::page(e))?;
            page.execute(down)
                .await
                .map_err(|e| VerifyError::page(format!("key down {key} failed: {e}")))?;
            let up = DispatchKeyEventParams::builder()
                .r#type(DispatchKeyEventType::KeyUp)
                .key(key.to_string())
                .build()
                .map_err(|e| VerifyError::page(e))?;
            page.execute(up)
                .await
                .map_err(|e| VerifyError::page(format!("key up {key} failed: {e}")))?;
            Ok(())
        }

        /// Capture a full-page PNG screenshot
        pub async fn screenshot_bytes(&self) -> VerifyResult<Vec<u8>> {
            let params = ScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .full_page(true)
                .build();
            self.page()?
                .screenshot(params)
                .await
                .map_err(|e| VerifyError::page(format!("screenshot failed: {e}")))
        }

        /// Serialized DOM of the current page
        pub async fn page_html(&self) -> VerifyResult<String> {
            self.page()?
                .content()
                .await
                .map_err(|e| VerifyError::page(format!("page content failed: {e}")))
        }

        /// Snapshot of the console sink without draining it
        pub async fn console_lines(&self) -> Vec<String> {
            self.console.lock().await.clone()
        }

        /// Drain the console sink
        pub async fn drain_console(&self) -> Vec<String> {
            std::mem::take(&mut *self.console.lock().await)
        }

        async fn eval_bool(&self, expr: &str) -> VerifyResult<bool> {
            let result = self
                .page()?
                .evaluate(expr)
                .await
                .map_err(|e| VerifyError::page(e.to_string()))?;
            result
                .into_value::<bool>()
                .map_err(|e| VerifyError::page(e.to_string()))
        }
    }

    impl Drop for Session {
        fn drop(&mut self) {
            if self.browser.is_some() {
                // chromiumoxide terminates the child process when the
                // Browser handle drops; the explicit close path is preferred.
                warn!("session dropped without close");
                self.console_task.abort();
                self.handler_task.abort();
            }
        }
    }

    fn format_console_event(event: &cdp_runtime::EventConsoleApiCalled) -> String {
        let level = format!("{:?}", event.r#type).to_lowercase();
        let message = event
            .args
            .iter()
            .map(|arg| {
                arg.value
                    .as_ref()
                    .map(|v| v.to_string())
                    .or_else(|| arg.description.clone())
                    .unwrap_or_else(|| String::from("<object>"))
            })
            .collect::<Vec<_>>()
            .join(" ");
        format!("[{level}] {message}")
    }
}

// ============================================================================
// Mock implementation (when the `browser` feature is NOT enabled)
// ============================================================================

#[cfg(not(feature = "browser"))]
mod mock {
    use super::SessionConfig;
    use crate::locator::Target;
    use crate::result::{VerifyError, VerifyResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Observes mock session lifecycle and recorded actions from tests
    #[derive(Debug, Default)]
    pub struct SessionProbe {
        opened: AtomicUsize,
        closed: AtomicUsize,
        actions: Mutex<Vec<String>>,
    }

    impl SessionProbe {
        /// Create a shareable probe
        #[must_use]
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        /// Number of sessions opened with this probe attached
        pub fn opened(&self) -> usize {
            self.opened.load(Ordering::SeqCst)
        }

        /// Number of sessions closed (first close only; close is idempotent)
        pub fn closed(&self) -> usize {
            self.closed.load(Ordering::SeqCst)
        }

        /// Actions recorded across all probed sessions, in order
        pub fn actions(&self) -> Vec<String> {
            self.actions.lock().map(|a| a.clone()).unwrap_or_default()
        }

        fn record(&self, action: String) {
            if let Ok(mut actions) = self.actions.lock() {
                actions.push(action);
            }
        }
    }

    #[derive(Debug)]
    struct MockState {
        url: Option<String>,
        elements: Vec<Target>,
        console: Vec<String>,
        closed: bool,
    }

    /// In-memory stand-in for a browser session
    #[derive(Debug)]
    pub struct Session {
        config: SessionConfig,
        state: Mutex<MockState>,
        probe: Option<Arc<SessionProbe>>,
    }

    impl Session {
        /// Open a mock session seeded from the config
        pub async fn open(config: SessionConfig) -> VerifyResult<Self> {
            let probe = config.probe.clone();
            if let Some(p) = &probe {
                p.opened.fetch_add(1, Ordering::SeqCst);
            }
            let state = MockState {
                url: None,
                elements: config.seeded.clone(),
                console: Vec::new(),
                closed: false,
            };
            Ok(Self {
                config,
                state: Mutex::new(state),
                probe,
            })
        }

        /// Get the session configuration
        #[must_use]
        pub const fn config(&self) -> &SessionConfig {
            &self.config
        }

        /// Whether the session has been closed
        pub fn is_closed(&self) -> bool {
            self.state.lock().map(|s| s.closed).unwrap_or(true)
        }

        /// Close the session. Idempotent; later calls are no-ops.
        pub async fn close(&mut self) -> VerifyResult<()> {
            let mut state = self
                .state
                .lock()
                .map_err(|_| VerifyError::page("mock state poisoned"))?;
            if !state.closed {
                state.closed = true;
                if let Some(p) = &self.probe {
                    p.closed.fetch_add(1, Ordering::SeqCst);
                }
            }
            Ok(())
        }

        fn record(&self, action: String) {
            if let Some(p) = &self.probe {
                p.record(action);
            }
        }

        fn with_open_state<T>(
            &self,
            f: impl FnOnce(&mut MockState) -> VerifyResult<T>,
        ) -> VerifyResult<T> {
            let mut state = self
                .state
                .lock()
                .map_err(|_| VerifyError::page("mock state poisoned"))?;
            if state.closed {
                return Err(VerifyError::page("session is closed"));
            }
            f(&mut state)
        }

        /// Navigate the mock page
        pub async fn navigate(&self, url: &str) -> VerifyResult<()> {
            self.record(format!("navigate:{url}"));
            self.with_open_state(|state| {
                state.url = Some(url.to_string());
                state.console.push(format!("[log] loaded {url}"));
                Ok(())
            })
        }

        /// Whether the target was seeded into the mock page
        pub async fn exists(&self, target: &Target) -> VerifyResult<bool> {
            self.with_open_state(|state| Ok(state.elements.contains(target)))
        }

        /// Mock visibility equals existence
        pub async fn is_visible(&self, target: &Target) -> VerifyResult<bool> {
            self.exists(target).await
        }

        /// Click a seeded element; error when absent
        pub async fn click(&self, target: &Target) -> VerifyResult<()> {
            self.record(format!("click:{}", target.describe()));
            self.with_open_state(|state| {
                if state.elements.contains(target) {
                    Ok(())
                } else {
                    Err(VerifyError::page(format!("element {target} not found")))
                }
            })
        }

        /// Fill a seeded element; error when absent
        pub async fn fill(&self, target: &Target, value: &str) -> VerifyResult<()> {
            self.record(format!("fill:{}={value}", target.describe()));
            self.with_open_state(|state| {
                if state.elements.contains(target) {
                    Ok(())
                } else {
                    Err(VerifyError::page(format!("element {target} not found")))
                }
            })
        }

        /// Record a key press
        pub async fn press_key(&self, key: &str) -> VerifyResult<()> {
            self.record(format!("press_key:{key}"));
            self.with_open_state(|_| Ok(()))
        }

        /// Mock screenshot (empty PNG payload)
        pub async fn screenshot_bytes(&self) -> VerifyResult<Vec<u8>> {
            self.record("screenshot".to_string());
            self.with_open_state(|_| Ok(Vec::new()))
        }

        /// Mock DOM dump
        pub async fn page_html(&self) -> VerifyResult<String> {
            self.with_open_state(|state| {
                let url = state.url.clone().unwrap_or_default();
                Ok(format!("<html><body data-url=\"{url}\"></body></html>"))
            })
        }

        /// Snapshot of the console sink without draining it
        pub async fn console_lines(&self) -> Vec<String> {
            self.state.lock().map(|s| s.console.clone()).unwrap_or_default()
        }

        /// Drain the console sink
        pub async fn drain_console(&self) -> Vec<String> {
            self.state
                .lock()
                .map(|mut s| std::mem::take(&mut s.console))
                .unwrap_or_default()
        }

        /// Add an element to the mock page at runtime
        pub fn seed(&self, target: Target) {
            if let Ok(mut state) = self.state.lock() {
                state.elements.push(target);
            }
        }

        /// Push a console line into the sink
        pub fn push_console_line(&self, line: impl Into<String>) {
            if let Ok(mut state) = self.state.lock() {
                state.console.push(line.into());
            }
        }
    }
}

// Re-export based on feature
#[cfg(feature = "browser")]
pub use cdp::Session;

#[cfg(not(feature = "browser"))]
pub use mock::{Session, SessionProbe};


#[cfg(all(test, not(feature = "browser")))]
mod mock_tests {
    use super::*;
    use crate::locator::Target;

    #[tokio::test]
    async fn test_close_is_idempotent_and_counted_once() {
        let probe = SessionProbe::new();
        let config = SessionConfig::new().with_probe(probe.clone());
        let mut session = Session::open(config).await.unwrap();
        assert_eq!(probe.opened(), 1);

        session.close().await.unwrap();
        session.close().await.unwrap();
        assert_eq!(probe.closed(), 1);
        assert!(session.is_closed());
    }

    #[tokio::test]
    async fn test_click_missing_element_fails() {
        let config = SessionConfig::new();
        let mut session = Session::open(config).await.unwrap();
        session.navigate("http://localhost:5173/").await.unwrap();

        let err = session.click(&Target::css("#absent")).await.unwrap_err();
        assert!(err.to_string().contains("not found"));
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_seeded_element_is_interactable() {
        let target = Target::placeholder("Enter your wasteland name...");
        let config = SessionConfig::new().seed_element(target.clone());
        let mut session = Session::open(config).await.unwrap();
        session.navigate("http://localhost:5173/create-character").await.unwrap();

        assert!(session.exists(&target).await.unwrap());
        session.fill(&target, "Jules the Shaman").await.unwrap();
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_operations_on_closed_session_fail() {
        let mut session = Session::open(SessionConfig::new()).await.unwrap();
        session.close().await.unwrap();
        let err = session.navigate("http://localhost:5173/").await.unwrap_err();
        assert!(err.to_string().contains("closed"));
    }

    #[tokio::test]
    async fn test_console_sink_drains() {
        let mut session = Session::open(SessionConfig::new()).await.unwrap();
        session.navigate("http://localhost:5174/").await.unwrap();
        session.push_console_line("[warn] texture load slow");

        let lines = session.console_lines().await;
        assert_eq!(lines.len(), 2);

        let drained = session.drain_console().await;
        assert_eq!(drained.len(), 2);
        assert!(session.console_lines().await.is_empty());
        session.close().await.unwrap();
    }
}
