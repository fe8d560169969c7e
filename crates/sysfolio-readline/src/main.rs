use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::Editor;
use rustyline::{Context, Helper};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use sysfolio_core::telemetry::{
    ExpectedImpact, LoadTestConfig, LoadTestSession, LoadTestTarget, MetricValues,
    SyntheticMetricSample,
};
use sysfolio_core::terminal::builtin_commands;
use sysfolio_core::{Execution, ServiceDirectory, SysfolioConfig, Terminal};
use sysfolio_execution::{HttpProfileProbe, LoadTestRunner, SimulationEvent};

/// Commands handled by the REPL itself rather than the terminal.
const LOCAL_COMMANDS: [&str; 4] = ["loadtest", "history", "quit", "exit"];

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        let commands = builtin_commands()
            .iter()
            .map(|cmd| cmd.name.to_string())
            .chain(LOCAL_COMMANDS.iter().map(|cmd| cmd.to_string()))
            .collect();
        Self { commands }
    }

    fn is_command(&self, word: &str) -> bool {
        self.commands.iter().any(|cmd| cmd == word)
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        // Only the command word completes
        if line.contains(' ') {
            return Ok((0, vec![]));
        }

        let candidates: Vec<Pair> = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd.clone(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let word = line.split_whitespace().next().unwrap_or("");
        if self.is_command(&word.to_lowercase()) {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if !line.is_empty() && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SYSFOLIO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// The main entry point for the sysfolio REPL.
///
/// Lines go to the scripted [`Terminal`]; `loadtest` and `history` are
/// handled here.
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = SysfolioConfig::load()?;
    let directory = Arc::new(config.service_directory()?);

    let mut terminal = match config.load_test.seed {
        Some(seed) => Terminal::seeded(Arc::clone(&directory), seed),
        None => Terminal::new(Arc::clone(&directory)),
    };
    if config.terminal.welcome {
        terminal = terminal.with_welcome();
    }

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== SYSFOLIO ===".bright_magenta().bold());
    println!(
        "{}",
        "Type 'help' for commands, 'loadtest <service-id>' to simulate load, or 'quit' to exit."
            .bright_black()
    );
    println!();
    for record in terminal.records() {
        print_output(&record.output);
    }

    loop {
        match rl.readline(&config.terminal.prompt) {
            Ok(line) => {
                let input = classify(&line);
                if input != ReplInput::Empty {
                    let _ = rl.add_history_entry(line.trim());
                }

                match input {
                    ReplInput::Empty => continue,
                    ReplInput::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    ReplInput::LoadTest(args) => {
                        if let Err(e) = run_load_test(&config, &directory, &args).await {
                            eprintln!("{}", format!("Error: {e}").red());
                        }
                    }
                    ReplInput::History => {
                        for record in terminal.records() {
                            println!(
                                "{} {}",
                                record.timestamp.format("[%H:%M:%S]").to_string().bright_black(),
                                record.command
                            );
                        }
                    }
                    ReplInput::Terminal(raw) => match terminal.execute(raw) {
                        Execution::Ignored => {}
                        Execution::Cleared => {
                            if let Err(e) = rl.clear_screen() {
                                warn!(error = %e, "failed to clear screen");
                            }
                        }
                        Execution::Recorded(record) => print_output(&record.output),
                    },
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

/// How the REPL routes one line.
#[derive(Debug, PartialEq)]
enum ReplInput<'a> {
    Empty,
    Quit,
    LoadTest(Vec<&'a str>),
    History,
    /// The untrimmed line, handed to the terminal as typed
    Terminal(&'a str),
}

fn classify(line: &str) -> ReplInput<'_> {
    let mut words = line.split_whitespace();
    match words.next() {
        None => ReplInput::Empty,
        Some("quit" | "exit") if words.clone().next().is_none() => ReplInput::Quit,
        Some("loadtest") => ReplInput::LoadTest(words.collect()),
        Some("history") => ReplInput::History,
        Some(_) => ReplInput::Terminal(line),
    }
}

fn print_output(output: &str) {
    for line in output.lines() {
        if line.starts_with("Error") {
            println!("{}", line.red());
        } else if line.starts_with("Command not found") {
            println!("{}", line.yellow());
        } else {
            println!("{}", line.bright_blue());
        }
    }
}

/// `loadtest <service-id> [users] [duration]`
async fn run_load_test(
    config: &SysfolioConfig,
    directory: &ServiceDirectory,
    args: &[&str],
) -> Result<()> {
    let Some(id) = args.first() else {
        println!("Usage: loadtest <service-id> [users] [duration]");
        return Ok(());
    };
    let Some(service) = directory.find(id) else {
        println!("{}", format!("Error: Service '{id}' not found.").red());
        return Ok(());
    };

    let users = match args.get(1) {
        Some(raw) => raw.parse()?,
        None => config.load_test.concurrent_users,
    };
    let duration = match args.get(2) {
        Some(raw) => raw.parse()?,
        None => config.load_test.duration_secs,
    };
    let test_config = LoadTestConfig::new(users, duration)?;

    let impact = ExpectedImpact::for_users(users);
    println!(
        "{}",
        format!(
            "Expected impact: response time {}, throughput {}, CPU {}, error rate {}",
            impact.response_time, impact.throughput, impact.cpu_usage, impact.error_rate
        )
        .bright_black()
    );

    let mut runner = LoadTestRunner::new(Duration::from_millis(config.load_test.tick_millis));
    if config.api.probe {
        match HttpProfileProbe::new(
            &config.api.base_url,
            Duration::from_secs(config.api.timeout_secs),
        ) {
            Ok(probe) => runner = runner.with_probe(Arc::new(probe)),
            Err(e) => warn!(error = %e, "profile probe disabled"),
        }
    }

    let mut rng = match config.load_test.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = LoadTestSession::new(config.load_test.window);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();

    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match &event {
                SimulationEvent::Sample {
                    elapsed_secs,
                    sample,
                } => println!("{}", format_sample(*elapsed_secs, sample)),
                SimulationEvent::ApiUnavailable { .. } => {
                    if let Some(notice) = event.notice() {
                        println!("{}", notice.red());
                    }
                }
                _ => {
                    if let Some(notice) = event.notice() {
                        println!("{}", notice.bright_green());
                    }
                }
            }
        }
    });

    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    println!("{}", "Press CTRL-C to stop the test.".bright_black());
    runner
        .run(
            &mut session,
            LoadTestTarget::from(service),
            test_config,
            &mut rng,
            &tx,
            cancel,
        )
        .await;
    interrupt.abort();
    drop(tx);
    let _ = printer.await;

    print_summary(&session);
    Ok(())
}

fn format_sample(elapsed_secs: u32, sample: &SyntheticMetricSample) -> String {
    let v = &sample.values;
    format!(
        "{} {}  rt {:>6.1} ms  tp {:>6.1} req/s  err {:>5.2}%  cpu {:>5.1}%  mem {:>5.1}%",
        format!("[{:>3}s]", elapsed_secs).bright_black(),
        sample.time,
        v.response_time,
        v.throughput,
        v.error_rate,
        v.cpu_usage,
        v.memory_usage
    )
}

fn print_summary(session: &LoadTestSession) {
    if let Some(last) = session.latest() {
        println!(
            "{}",
            format!(
                "{} samples, last at {}",
                session.total_samples(),
                last.time
            )
            .bright_black()
        );
    }
    let peaks: MetricValues = session.peaks();
    println!("{}", "Peak values:".bright_yellow());
    println!("  {}", format!("Response time: {:.1} ms", peaks.response_time).yellow());
    println!("  {}", format!("Throughput:    {:.1} req/s", peaks.throughput).yellow());
    println!("  {}", format!("Error rate:    {:.2}%", peaks.error_rate).yellow());
    println!("  {}", format!("CPU usage:     {:.1}%", peaks.cpu_usage).yellow());
    println!("  {}", format!("Memory usage:  {:.1}%", peaks.memory_usage).yellow());
}
