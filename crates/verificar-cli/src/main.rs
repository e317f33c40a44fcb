//! Verificador CLI entry point.

use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use verificador::{scenarios, Cli, CliError, CliResult, Commands, ListArgs, Reporter, RunArgs};
use verificar::{Outcome, Runner, Scenario, SessionConfig, SuiteSummary};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);
    match dispatch(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(cli: &Cli) {
    let default_filter = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch(cli: &Cli) -> CliResult<bool> {
    match &cli.command {
        Commands::List(args) => {
            list_scenarios(args)?;
            Ok(true)
        }
        Commands::Run(args) => run_scenarios(cli, args),
    }
}

fn gather(spec_dir: Option<&Path>) -> CliResult<Vec<Scenario>> {
    let mut scenarios = scenarios::builtin();
    if let Some(dir) = spec_dir {
        scenarios.extend(Scenario::load_dir(dir)?);
    }
    Ok(scenarios)
}

fn list_scenarios(args: &ListArgs) -> CliResult<()> {
    for scenario in gather(args.spec_dir.as_deref())? {
        if scenario.description.is_empty() {
            println!("{}", scenario.name);
        } else {
            println!("{}: {}", scenario.name, scenario.description);
        }
    }
    Ok(())
}

fn run_scenarios(cli: &Cli, args: &RunArgs) -> CliResult<bool> {
    let mut scenarios = gather(args.spec_dir.as_deref())?;
    if let Some(name) = &args.scenario {
        scenarios.retain(|s| s.name == *name);
        if scenarios.is_empty() {
            return Err(CliError::UnknownScenario { name: name.clone() });
        }
    }

    let mut config = SessionConfig::new().with_headless(!args.headful);
    if let Some(path) = &args.chromium {
        config = config.with_chromium_path(path);
    }
    if args.no_sandbox {
        config = config.with_no_sandbox();
    }
    let runner = Runner::with_config(config);

    let mut reporter = Reporter::new(console::colors_enabled(), cli.quiet);
    reporter.header(&format!("Running {} scenario(s)", scenarios.len()));
    if scenarios.len() > 1 {
        reporter.start_progress(scenarios.len() as u64, "verifying");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let start = Instant::now();
    let mut summary = SuiteSummary::default();
    for scenario in &scenarios {
        let report = runtime.block_on(runner.run(scenario));
        match &report.outcome {
            Outcome::Passed => {
                reporter.success(&format!("{} ({} ms)", report.name, report.duration_ms));
            }
            Outcome::Failed { reason } => {
                reporter.failure(&format!("{}: {reason}", report.name));
            }
        }
        reporter.increment(1);
        summary.results.push(report);
    }
    summary.duration_ms = start.elapsed().as_millis() as u64;
    reporter.finish_progress();
    reporter.summary(&summary);

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json)?;
        reporter.info(&format!("report written to {}", path.display()));
    }

    Ok(summary.all_passed())
}
