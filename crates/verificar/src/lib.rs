//! # Verificar
//!
//! Scripted browser verification harness: open a running web application,
//! drive its UI through an ordered list of steps, gate on timed visibility
//! checks, and capture screenshots and diagnostics for manual review.
//!
//! The page under test is an opaque HTTP-served target addressed by URL and
//! a handful of selectors, text labels, and accessible roles. Verificar
//! asserts presence and visibility, never pixels; captured screenshots are
//! for human eyes.
//!
//! With the `browser` feature enabled, sessions drive a real headless
//! Chromium over the Chrome DevTools Protocol (chromiumoxide). Without it,
//! a deterministic in-memory mock backend stands in, which keeps every
//! layer above the session unit-testable.
//!
//! ## Example
//!
//! ```no_run
//! use verificar::{Check, Runner, Scenario, Target};
//!
//! # async fn demo() {
//! let scenario = Scenario::new("character-creator")
//!     .navigate("http://localhost:5173/create-character")
//!     .fill(
//!         Target::placeholder("Enter your wasteland name..."),
//!         "Jules the Shaman",
//!     )
//!     .click(Target::text("Tech Shaman"))
//!     .check(Check::VisibleByRole {
//!         role: "heading".to_string(),
//!         name: "Tech Shaman".to_string(),
//!         timeout_ms: 5_000,
//!     })
//!     .screenshot("verification/character_creator.png");
//!
//! let report = Runner::new().run(&scenario).await;
//! assert!(report.outcome.is_passed());
//! # }
//! ```

pub mod artifact;
pub mod locator;
pub mod result;
pub mod runner;
pub mod scenario;
pub mod session;
pub mod wait;

pub use locator::Target;
pub use result::{VerifyError, VerifyResult};
pub use runner::{Outcome, Runner, ScenarioReport, SuiteSummary};
pub use scenario::{Artifact, ArtifactKind, Check, Scenario, Step, Viewport};
pub use session::{Session, SessionConfig};
pub use wait::{WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_STEP_TIMEOUT_MS};
