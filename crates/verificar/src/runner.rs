//! Scenario runner: opens a session, executes steps and checks in order,
//! captures artifacts, and guarantees teardown on every path.
//!
//! Per scenario: `Idle -> SessionOpen -> Executing -> Asserting -> Capturing
//! -> Closed`. A step or check failure short-circuits the rest of its phase
//! but still proceeds to best-effort artifact capture and session close.
//! No retries; each scenario executes at most once.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::artifact;
use crate::locator::Target;
use crate::result::{VerifyError, VerifyResult};
use crate::scenario::{Check, Scenario, Step};
use crate::session::{Session, SessionConfig};
use crate::wait::{poll_until, WaitOptions, DEFAULT_STEP_TIMEOUT_MS};

/// Terminal outcome of a scenario run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Every step and check completed
    Passed,
    /// A launch, step, or check failure ended the run early
    Failed {
        /// Human-readable failure reason
        reason: String,
    },
}

impl Outcome {
    /// Whether the scenario passed
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// Report for a single scenario run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Scenario name
    pub name: String,
    /// Terminal outcome
    pub outcome: Outcome,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
    /// Steps that completed before the run ended
    pub steps_completed: usize,
    /// Checks that completed before the run ended
    pub checks_completed: usize,
    /// Artifact paths actually written
    pub artifacts_written: Vec<PathBuf>,
}

/// Aggregated results for a batch of scenarios
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteSummary {
    /// Individual reports, in execution order
    pub results: Vec<ScenarioReport>,
    /// Total wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl SuiteSummary {
    /// Total number of scenarios
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Count of passed scenarios
    #[must_use]
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_passed()).count()
    }

    /// Count of failed scenarios
    #[must_use]
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.outcome.is_passed()).count()
    }

    /// Whether every scenario passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.outcome.is_passed())
    }

    /// Reports of failed scenarios
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioReport> {
        self.results.iter().filter(|r| !r.outcome.is_passed()).collect()
    }
}

/// Execute a single step against the session.
///
/// Element-addressed steps auto-wait: the target is polled until it exists
/// or the step timeout elapses. A selector matching zero elements after the
/// timeout is a [`VerifyError::Interaction`], never a silent no-op.
pub async fn execute_step(session: &Session, step: &Step) -> VerifyResult<()> {
    match step {
        Step::Navigate { url } => session
            .navigate(url)
            .await
            .map_err(|e| VerifyError::interaction(step.describe(), e.to_string())),
        Step::WaitForSelector {
            selector,
            timeout_ms,
        } => {
            let target = Target::css(selector.clone());
            wait_for_target(session, &target, *timeout_ms, step).await
        }
        Step::WaitForText { text, timeout_ms } => {
            let target = Target::text(text.clone());
            wait_for_target(session, &target, *timeout_ms, step).await
        }
        Step::Fill {
            target,
            value,
            timeout_ms,
        } => {
            let timeout = timeout_ms.unwrap_or(DEFAULT_STEP_TIMEOUT_MS);
            wait_for_target(session, target, timeout, step).await?;
            session
                .fill(target, value)
                .await
                .map_err(|e| VerifyError::interaction(step.describe(), e.to_string()))
        }
        Step::Click { target, timeout_ms } => {
            let timeout = timeout_ms.unwrap_or(DEFAULT_STEP_TIMEOUT_MS);
            wait_for_target(session, target, timeout, step).await?;
            session
                .click(target)
                .await
                .map_err(|e| VerifyError::interaction(step.describe(), e.to_string()))
        }
        Step::PressKey { key } => session
            .press_key(key)
            .await
            .map_err(|e| VerifyError::interaction(step.describe(), e.to_string())),
        Step::WaitFixed { ms } => {
            if *ms == 0 {
                // still hand control back to the executor
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            Ok(())
        }
    }
}

/// Evaluate a single check by polling visibility until it holds or times out
pub async fn run_check(session: &Session, check: &Check) -> VerifyResult<()> {
    let target = check.target();
    let timeout_ms = check.timeout_ms();
    let options = WaitOptions::new().with_timeout(timeout_ms);
    let target_ref = &target;
    let observed = poll_until(options, move || async move {
        session.is_visible(target_ref).await.unwrap_or(false)
    })
    .await;
    if observed {
        Ok(())
    } else {
        Err(VerifyError::AssertionTimeout {
            assertion: check.describe(),
            timeout_ms,
        })
    }
}

async fn wait_for_target(
    session: &Session,
    target: &Target,
    timeout_ms: u64,
    step: &Step,
) -> VerifyResult<()> {
    let options = WaitOptions::new().with_timeout(timeout_ms);
    let observed = poll_until(options, move || async move {
        session.exists(target).await.unwrap_or(false)
    })
    .await;
    if observed {
        Ok(())
    } else {
        Err(VerifyError::interaction(
            step.describe(),
            format!("no element matched {} within {timeout_ms}ms", target.describe()),
        ))
    }
}

/// Runs scenarios, one fresh session each
#[derive(Debug, Default)]
pub struct Runner {
    session_config: SessionConfig,
}

impl Runner {
    /// Create a runner with the default session configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner with a custom session configuration
    #[must_use]
    pub fn with_config(session_config: SessionConfig) -> Self {
        Self { session_config }
    }

    /// Run one scenario to completion and report its outcome.
    ///
    /// The session is closed on every path once it opened; artifact capture
    /// runs best-effort after a failure and cannot crash the run.
    pub async fn run(&self, scenario: &Scenario) -> ScenarioReport {
        let start = Instant::now();
        info!(scenario = %scenario.name, "running scenario");

        let config = self
            .session_config
            .clone()
            .with_viewport(scenario.viewport.width, scenario.viewport.height);

        let mut session = match Session::open(config).await {
            Ok(session) => session,
            Err(e) => {
                error!(scenario = %scenario.name, error = %e, "browser launch failed");
                return ScenarioReport {
                    name: scenario.name.clone(),
                    outcome: Outcome::Failed {
                        reason: e.to_string(),
                    },
                    duration_ms: start.elapsed().as_millis() as u64,
                    steps_completed: 0,
                    checks_completed: 0,
                    artifacts_written: Vec::new(),
                };
            }
        };

        let mut failure: Option<VerifyError> = None;
        let mut steps_completed = 0;
        for step in &scenario.steps {
            // routes resolve against the scenario's base URL
            let step = match step {
                Step::Navigate { url } => Step::Navigate {
                    url: scenario.resolve_url(url),
                },
                other => other.clone(),
            };
            debug!(step = %step.describe(), "executing step");
            match execute_step(&session, &step).await {
                Ok(()) => steps_completed += 1,
                Err(e) => {
                    error!(step = %step.describe(), error = %e, "step failed");
                    failure = Some(e);
                    break;
                }
            }
        }

        let mut checks_completed = 0;
        if failure.is_none() {
            for check in &scenario.checks {
                debug!(check = %check.describe(), "evaluating check");
                match run_check(&session, check).await {
                    Ok(()) => checks_completed += 1,
                    Err(e) => {
                        error!(check = %check.describe(), error = %e, "check failed");
                        failure = Some(e);
                        break;
                    }
                }
            }
        }

        let mut artifacts_written = Vec::new();
        for artifact in &scenario.artifacts {
            match artifact::capture(&session, artifact).await {
                Ok(()) => artifacts_written.push(artifact.path.clone()),
                Err(e) => {
                    warn!(path = %artifact.path.display(), error = %e, "artifact capture failed");
                }
            }
        }

        for line in session.drain_console().await {
            debug!(scenario = %scenario.name, "page console: {line}");
        }

        if let Err(e) = session.close().await {
            warn!(scenario = %scenario.name, error = %e, "session close failed");
        }

        let outcome = match failure {
            None => Outcome::Passed,
            Some(e) => Outcome::Failed {
                reason: e.to_string(),
            },
        };
        let duration_ms = start.elapsed().as_millis() as u64;
        match &outcome {
            Outcome::Passed => info!(scenario = %scenario.name, duration_ms, "scenario passed"),
            Outcome::Failed { reason } => {
                error!(scenario = %scenario.name, duration_ms, reason = %reason, "scenario failed");
            }
        }

        ScenarioReport {
            name: scenario.name.clone(),
            outcome,
            duration_ms,
            steps_completed,
            checks_completed,
            artifacts_written,
        }
    }

    /// Run a batch of independent scenarios sequentially
    pub async fn run_all(&self, scenarios: &[Scenario]) -> SuiteSummary {
        let start = Instant::now();
        let mut summary = SuiteSummary::default();
        for scenario in scenarios {
            summary.results.push(self.run(scenario).await);
        }
        summary.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            total = summary.total(),
            passed = summary.passed(),
            failed = summary.failed(),
            duration_ms = summary.duration_ms,
            "suite finished"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Passed.to_string(), "passed");
        let failed = Outcome::Failed {
            reason: "check visible:css:canvas not satisfied within 50ms".to_string(),
        };
        assert!(failed.to_string().contains("not satisfied"));
        assert!(!failed.is_passed());
    }

    #[test]
    fn test_suite_summary_counts() {
        let mut summary = SuiteSummary::default();
        summary.results.push(ScenarioReport {
            name: "a".to_string(),
            outcome: Outcome::Passed,
            duration_ms: 10,
            steps_completed: 1,
            checks_completed: 0,
            artifacts_written: Vec::new(),
        });
        summary.results.push(ScenarioReport {
            name: "b".to_string(),
            outcome: Outcome::Failed {
                reason: "launch".to_string(),
            },
            duration_ms: 5,
            steps_completed: 0,
            checks_completed: 0,
            artifacts_written: Vec::new(),
        });
        assert_eq!(summary.total(), 2);
        assert_eq!(summary.passed(), 1);
        assert_eq!(summary.failed(), 1);
        assert!(!summary.all_passed());
        assert_eq!(summary.failures()[0].name, "b");
    }
}

#[cfg(all(test, not(feature = "browser")))]
mod mock_tests {
    use super::*;
    use crate::scenario::Artifact;
    use crate::session::SessionProbe;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_seeded_scenario_passes_and_writes_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let shot = dir.path().join("character_creator.png");

        let name_input = Target::placeholder("Enter your wasteland name...");
        let class_card = Target::text("Tech Shaman");
        let heading = Target::role("heading", "Tech Shaman");

        let probe = SessionProbe::new();
        let config = SessionConfig::new()
            .seed_element(name_input.clone())
            .seed_element(class_card.clone())
            .seed_element(heading)
            .with_probe(probe.clone());

        let scenario = Scenario::new("character-creator")
            .navigate("http://localhost:5173/create-character")
            .fill(name_input, "Jules the Shaman")
            .click(class_card)
            .check(Check::VisibleByRole {
                role: "heading".to_string(),
                name: "Tech Shaman".to_string(),
                timeout_ms: 5_000,
            })
            .screenshot(&shot);

        let report = Runner::with_config(config).run(&scenario).await;
        assert_eq!(report.outcome, Outcome::Passed);
        assert_eq!(report.steps_completed, 3);
        assert_eq!(report.checks_completed, 1);
        assert!(shot.exists());
        assert_eq!(probe.opened(), 1);
        assert_eq!(probe.closed(), 1);
    }

    #[tokio::test]
    async fn test_failing_step_short_circuits_but_still_tears_down() {
        let dir = tempfile::tempdir().unwrap();
        let shot = dir.path().join("failure.png");

        let probe = SessionProbe::new();
        let config = SessionConfig::new().with_probe(probe.clone());

        let scenario = Scenario::new("broken")
            .navigate("http://localhost:5173/")
            .step(Step::Click {
                target: Target::css("#absent"),
                timeout_ms: Some(50),
            })
            .press_key("F12")
            .screenshot(&shot);

        let report = Runner::with_config(config).run(&scenario).await;
        match &report.outcome {
            Outcome::Failed { reason } => assert!(reason.contains("no element matched")),
            Outcome::Passed => panic!("expected failure"),
        }
        assert_eq!(report.steps_completed, 1);

        // remaining steps never ran
        let actions = probe.actions();
        assert!(!actions.iter().any(|a| a.starts_with("press_key")));

        // artifact capture after the failure is still attempted
        assert!(shot.exists());
        assert_eq!(report.artifacts_written.len(), 1);

        // teardown happened exactly once
        assert_eq!(probe.closed(), 1);
    }

    #[tokio::test]
    async fn test_check_timeout_fails_scenario() {
        let probe = SessionProbe::new();
        let config = SessionConfig::new().with_probe(probe.clone());

        let scenario = Scenario::new("biome-canvas")
            .navigate("http://localhost:5174/")
            .check(Check::VisibleBySelector {
                selector: "canvas".to_string(),
                timeout_ms: 50,
            });

        let report = Runner::with_config(config).run(&scenario).await;
        match &report.outcome {
            Outcome::Failed { reason } => {
                assert!(reason.contains("visible:css:canvas"));
                assert!(reason.contains("50ms"));
            }
            Outcome::Passed => panic!("expected assertion timeout"),
        }
        assert_eq!(probe.closed(), 1);
    }

    #[tokio::test]
    async fn test_artifact_failure_does_not_flip_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file, not a directory").unwrap();

        let scenario = Scenario::new("artifact-error")
            .navigate("http://localhost:5174/")
            .artifact(Artifact::screenshot(blocker.join("shot.png")));

        let report = Runner::new().run(&scenario).await;
        assert_eq!(report.outcome, Outcome::Passed);
        assert!(report.artifacts_written.is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_wait_fixed_zero_yields_to_executor() {
        let session = Session::open(SessionConfig::new()).await.unwrap();
        let flag = Arc::new(AtomicBool::new(false));
        let task_flag = Arc::clone(&flag);
        tokio::spawn(async move {
            task_flag.store(true, Ordering::SeqCst);
        });

        execute_step(&session, &Step::WaitFixed { ms: 0 }).await.unwrap();
        assert!(flag.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_navigation_routes_resolve_against_base_url() {
        let probe = SessionProbe::new();
        let config = SessionConfig::new().with_probe(probe.clone());

        let scenario = Scenario::new("routed")
            .with_base_url("http://localhost:5173")
            .navigate("/create-character");

        let report = Runner::with_config(config).run(&scenario).await;
        assert_eq!(report.outcome, Outcome::Passed);
        assert!(probe
            .actions()
            .iter()
            .any(|a| a == "navigate:http://localhost:5173/create-character"));
    }

    #[tokio::test]
    async fn test_repeat_runs_use_independent_sessions() {
        let probe = SessionProbe::new();
        let config = SessionConfig::new().with_probe(probe.clone());
        let runner = Runner::with_config(config);

        let scenario = Scenario::new("delta-load")
            .navigate("http://localhost:5174/")
            .press_key("F12");

        let first = runner.run(&scenario).await;
        let second = runner.run(&scenario).await;
        assert_eq!(first.outcome, Outcome::Passed);
        assert_eq!(second.outcome, Outcome::Passed);
        assert_eq!(probe.opened(), 2);
        assert_eq!(probe.closed(), 2);
    }

    #[tokio::test]
    async fn test_run_all_aggregates() {
        let probe = SessionProbe::new();
        let config = SessionConfig::new().with_probe(probe.clone());
        let runner = Runner::with_config(config);

        let passing = Scenario::new("ok").navigate("http://localhost:5174/");
        let failing = Scenario::new("bad")
            .navigate("http://localhost:5174/")
            .step(Step::Click {
                target: Target::css("#absent"),
                timeout_ms: Some(50),
            });

        let summary = runner.run_all(&[passing, failing]).await;
        assert_eq!(summary.total(), 2);
        assert_eq!(summary.passed(), 1);
        assert_eq!(summary.failed(), 1);
        assert_eq!(probe.opened(), 2);
        assert_eq!(probe.closed(), 2);
    }
}
