//! Scenario model: one end-to-end verification case.
//!
//! A scenario names a target page, an ordered list of interaction steps, an
//! ordered list of timed visibility checks, and the artifacts to capture at
//! the end of the run. Scenarios are ephemeral: built in code or parsed
//! from a YAML document, run once, never persisted.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::locator::Target;
use crate::result::{VerifyError, VerifyResult};
use crate::wait::DEFAULT_STEP_TIMEOUT_MS;

/// Browser viewport for a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_STEP_TIMEOUT_MS
}

/// A single scripted UI action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Navigate to a URL and wait for the load to complete
    Navigate {
        /// Target URL
        url: String,
    },

    /// Wait until a CSS selector matches an element
    WaitForSelector {
        /// CSS selector
        selector: String,
        /// Timeout in milliseconds
        #[serde(default = "default_timeout_ms")]
        timeout_ms: u64,
    },

    /// Wait until the given text appears anywhere on the page
    WaitForText {
        /// Text content to wait for
        text: String,
        /// Timeout in milliseconds
        #[serde(default = "default_timeout_ms")]
        timeout_ms: u64,
    },

    /// Fill an input with a value
    Fill {
        /// Element to fill
        target: Target,
        /// Value to enter
        value: String,
        /// Auto-wait timeout override in milliseconds
        #[serde(default)]
        timeout_ms: Option<u64>,
    },

    /// Click an element
    Click {
        /// Element to click
        target: Target,
        /// Auto-wait timeout override in milliseconds
        #[serde(default)]
        timeout_ms: Option<u64>,
    },

    /// Press a key on the page keyboard
    PressKey {
        /// Key name (e.g. `Enter`, `F12`)
        key: String,
    },

    /// Wait for a fixed duration (use sparingly; zero still yields)
    WaitFixed {
        /// Duration in milliseconds
        ms: u64,
    },
}

impl Step {
    /// Short name for logs and error messages
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Navigate { url } => format!("navigate:{url}"),
            Self::WaitForSelector { selector, .. } => format!("wait_for_selector:{selector}"),
            Self::WaitForText { text, .. } => format!("wait_for_text:{text}"),
            Self::Fill { target, .. } => format!("fill:{}", target.describe()),
            Self::Click { target, .. } => format!("click:{}", target.describe()),
            Self::PressKey { key } => format!("press_key:{key}"),
            Self::WaitFixed { ms } => format!("wait_fixed:{ms}ms"),
        }
    }
}

/// A timed visibility check, evaluated by polling after all steps ran
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Check {
    /// Element with the given role and accessible name becomes visible
    VisibleByRole {
        /// ARIA role
        role: String,
        /// Accessible name
        name: String,
        /// Timeout in milliseconds
        #[serde(default = "default_timeout_ms")]
        timeout_ms: u64,
    },

    /// Element containing the given text becomes visible
    VisibleByText {
        /// Text content
        text: String,
        /// Timeout in milliseconds
        #[serde(default = "default_timeout_ms")]
        timeout_ms: u64,
    },

    /// Element matching the CSS selector becomes visible
    VisibleBySelector {
        /// CSS selector
        selector: String,
        /// Timeout in milliseconds
        #[serde(default = "default_timeout_ms")]
        timeout_ms: u64,
    },
}

impl Check {
    /// The target this check observes
    #[must_use]
    pub fn target(&self) -> Target {
        match self {
            Self::VisibleByRole { role, name, .. } => Target::role(role.clone(), name.clone()),
            Self::VisibleByText { text, .. } => Target::text(text.clone()),
            Self::VisibleBySelector { selector, .. } => Target::css(selector.clone()),
        }
    }

    /// Timeout for this check in milliseconds
    #[must_use]
    pub const fn timeout_ms(&self) -> u64 {
        match self {
            Self::VisibleByRole { timeout_ms, .. }
            | Self::VisibleByText { timeout_ms, .. }
            | Self::VisibleBySelector { timeout_ms, .. } => *timeout_ms,
        }
    }

    /// Short name for logs and error messages
    #[must_use]
    pub fn describe(&self) -> String {
        format!("visible:{}", self.target().describe())
    }
}

/// What a captured diagnostic output contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Full-page PNG screenshot
    Screenshot,
    /// Console messages relayed from the page
    ConsoleLog,
    /// Serialized DOM of the current page
    PageHtml,
}

/// A diagnostic output captured at the end of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Capture kind
    pub kind: ArtifactKind,
    /// Output file path; parent directories are created, existing files overwritten
    pub path: PathBuf,
}

impl Artifact {
    /// Screenshot artifact
    #[must_use]
    pub fn screenshot(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: ArtifactKind::Screenshot,
            path: path.into(),
        }
    }

    /// Console log artifact
    #[must_use]
    pub fn console_log(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: ArtifactKind::ConsoleLog,
            path: path.into(),
        }
    }

    /// Page HTML artifact
    #[must_use]
    pub fn page_html(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: ArtifactKind::PageHtml,
            path: path.into(),
        }
    }
}

/// One end-to-end verification case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique name for this scenario
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Base URL that relative navigation routes resolve against
    #[serde(default)]
    pub base_url: Option<String>,

    /// Viewport for the session
    #[serde(default)]
    pub viewport: Viewport,

    /// Steps to execute in order
    pub steps: Vec<Step>,

    /// Checks evaluated in order after the steps
    #[serde(default)]
    pub checks: Vec<Check>,

    /// Artifacts captured at the end of the run, pass or fail
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

impl Scenario {
    /// Create an empty scenario
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            base_url: None,
            viewport: Viewport::default(),
            steps: Vec::new(),
            checks: Vec::new(),
            artifacts: Vec::new(),
        }
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the base URL for relative navigation routes
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Resolve a navigation target against the scenario's base URL.
    ///
    /// Absolute URLs pass through untouched; a route path is joined onto
    /// the base. Without a base, routes are returned as written.
    #[must_use]
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        match &self.base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), url.trim_start_matches('/')),
            None => url.to_string(),
        }
    }

    /// Set the viewport
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Viewport { width, height };
        self
    }

    /// Append a step
    #[must_use]
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Append a navigation step
    #[must_use]
    pub fn navigate(self, url: impl Into<String>) -> Self {
        self.step(Step::Navigate { url: url.into() })
    }

    /// Append a wait-for-selector step with the default timeout
    #[must_use]
    pub fn wait_for_selector(self, selector: impl Into<String>) -> Self {
        self.step(Step::WaitForSelector {
            selector: selector.into(),
            timeout_ms: DEFAULT_STEP_TIMEOUT_MS,
        })
    }

    /// Append a wait-for-text step with the default timeout
    #[must_use]
    pub fn wait_for_text(self, text: impl Into<String>) -> Self {
        self.step(Step::WaitForText {
            text: text.into(),
            timeout_ms: DEFAULT_STEP_TIMEOUT_MS,
        })
    }

    /// Append a fill step
    #[must_use]
    pub fn fill(self, target: Target, value: impl Into<String>) -> Self {
        self.step(Step::Fill {
            target,
            value: value.into(),
            timeout_ms: None,
        })
    }

    /// Append a click step
    #[must_use]
    pub fn click(self, target: Target) -> Self {
        self.step(Step::Click {
            target,
            timeout_ms: None,
        })
    }

    /// Append a key press step
    #[must_use]
    pub fn press_key(self, key: impl Into<String>) -> Self {
        self.step(Step::PressKey { key: key.into() })
    }

    /// Append a fixed wait step
    #[must_use]
    pub fn wait_fixed(self, ms: u64) -> Self {
        self.step(Step::WaitFixed { ms })
    }

    /// Append a check
    #[must_use]
    pub fn check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    /// Append an artifact
    #[must_use]
    pub fn artifact(mut self, artifact: Artifact) -> Self {
        self.artifacts.push(artifact);
        self
    }

    /// Append a screenshot artifact
    #[must_use]
    pub fn screenshot(self, path: impl Into<PathBuf>) -> Self {
        self.artifact(Artifact::screenshot(path))
    }

    /// Parse a scenario from a YAML string
    pub fn from_yaml(yaml: &str) -> VerifyResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Parse a scenario from a YAML file
    pub fn from_file(path: &Path) -> VerifyResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|e| VerifyError::ScenarioParse {
            message: format!("{}: {e}", path.display()),
        })
    }

    /// Load all scenarios from `.yaml`/`.yml` files in a directory,
    /// in file-name order
    pub fn load_dir(dir: &Path) -> VerifyResult<Vec<Self>> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        let mut scenarios = Vec::with_capacity(paths.len());
        for path in &paths {
            scenarios.push(Self::from_file(path)?);
        }
        Ok(scenarios)
    }
}
