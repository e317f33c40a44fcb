//! Targets: how steps and checks address elements on the page under test.
//!
//! A [`Target`] compiles down to a JavaScript query expression that is
//! evaluated in the page. CSS and placeholder targets also resolve to a
//! plain CSS selector so the session can drive them with trusted CDP input
//! instead of synthetic events.

use serde::{Deserialize, Serialize};

/// How a step or check addresses an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// CSS selector (e.g. `.class-card:first-child`)
    Css(String),
    /// Visible text content; resolves to the innermost matching element
    Text(String),
    /// Input/textarea with an exact `placeholder` attribute
    Placeholder(String),
    /// Accessible role filtered by accessible name
    Role {
        /// ARIA role (explicit `role=` or implicit for common tags)
        role: String,
        /// Accessible name to match
        name: String,
    },
}

impl Target {
    /// Create a CSS target
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a text target
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a placeholder target
    #[must_use]
    pub fn placeholder(text: impl Into<String>) -> Self {
        Self::Placeholder(text.into())
    }

    /// Create a role target
    #[must_use]
    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Role {
            role: role.into(),
            name: name.into(),
        }
    }

    /// Plain CSS selector for targets that have one.
    ///
    /// Used to resolve the element over CDP (`find_element`) so clicks and
    /// keystrokes are trusted input events. Text and role targets have no
    /// CSS equivalent and fall back to in-page evaluation.
    #[must_use]
    pub fn as_css(&self) -> Option<String> {
        match self {
            Self::Css(s) => Some(s.clone()),
            Self::Placeholder(t) => Some(format!("[placeholder={t:?}]")),
            Self::Text(_) | Self::Role { .. } => None,
        }
    }

    /// Convert to a JavaScript expression yielding the element or `null`
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelector({s:?})"),
            Self::Placeholder(t) => {
                let selector = format!("[placeholder={t:?}]");
                format!("document.querySelector({selector:?})")
            }
            Self::Text(t) => format!(
                "(() => {{ const m = Array.from(document.querySelectorAll('*')).filter(el => el.textContent && el.textContent.includes({t:?})); return m.length ? m[m.length - 1] : null; }})()"
            ),
            Self::Role { role, name } => {
                let selector = role_selector(role);
                format!(
                    "(() => {{ const named = el => ((el.getAttribute('aria-label') || el.textContent || el.value || el.alt || '') + '').trim().includes({name:?}); return Array.from(document.querySelectorAll({selector:?})).find(named) || null; }})()"
                )
            }
        }
    }

    /// Convert to a JavaScript expression yielding `true` when the element exists
    #[must_use]
    pub fn to_exists_query(&self) -> String {
        let query = self.to_query();
        format!("(() => {{ const el = {query}; return el !== null && el !== undefined; }})()")
    }

    /// Convert to a JavaScript expression yielding `true` when the element
    /// exists, has a non-empty client rect, and is not hidden via CSS
    #[must_use]
    pub fn to_visible_query(&self) -> String {
        let query = self.to_query();
        format!(
            "(() => {{ const el = {query}; if (!el) return false; const rect = el.getBoundingClientRect(); const style = window.getComputedStyle(el); return rect.width > 0 && rect.height > 0 && style.display !== 'none' && style.visibility !== 'hidden'; }})()"
        )
    }

    /// Short description for step names and error messages
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Css(s) => format!("css:{s}"),
            Self::Text(t) => format!("text:{t}"),
            Self::Placeholder(t) => format!("placeholder:{t}"),
            Self::Role { role, name } => format!("role:{role}[name={name}]"),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// CSS selector list covering an ARIA role, explicit and implicit.
fn role_selector(role: &str) -> String {
    match role {
        "heading" => "h1,h2,h3,h4,h5,h6,[role='heading']".to_string(),
        "button" => "button,[role='button'],input[type='button'],input[type='submit']".to_string(),
        "link" => "a[href],[role='link']".to_string(),
        "textbox" => "input[type='text'],input:not([type]),textarea,[role='textbox']".to_string(),
        "img" => "img,[role='img']".to_string(),
        other => format!("[role='{other}']"),
    }
}
