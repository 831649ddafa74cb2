mod cli;
mod render;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::ArgMatches;
use tracing_subscriber::EnvFilter;

use finance_tracker_core::config::ClientConfig;
use finance_tracker_core::models::action::{Action, Effect};
use finance_tracker_core::models::chart::ChartKind;
use finance_tracker_core::models::route::Route;
use finance_tracker_core::models::transaction::TransactionDraft;
use finance_tracker_core::models::user::Credentials;
use finance_tracker_core::navigation::RouteRecorder;
use finance_tracker_core::services::transaction_service::{AutoConfirm, Confirm};
use finance_tracker_core::storage::credential_store::FileCredentialStore;
use finance_tracker_core::{FinanceTracker, RESYNC_FAILED_ALERT};

use crate::render::TerminalChart;

/// Asks on stdin, defaulting to "no".
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<ClientConfig> {
    let config = match matches.get_one::<String>("config") {
        Some(path) => ClientConfig::load(&PathBuf::from(path))
            .with_context(|| format!("Failed to load config from {path}"))?,
        None => ClientConfig::load_default().context("Failed to load config")?,
    };

    match matches.get_one::<String>("base-url") {
        Some(url) => Ok(config.with_base_url(url.clone())?),
        None => Ok(config),
    }
}

fn read_password(matches: &ArgMatches) -> Result<String> {
    if let Some(password) = matches.get_one::<String>("password") {
        return Ok(password.clone());
    }
    print!("Password: ");
    io::stdout().flush()?;
    let mut password = String::new();
    io::stdin().lock().read_line(&mut password)?;
    Ok(password.trim_end_matches(['\r', '\n']).to_string())
}

fn read_credentials(matches: &ArgMatches) -> Result<Credentials> {
    let username = matches
        .get_one::<String>("username")
        .cloned()
        .unwrap_or_default();
    Ok(Credentials::new(username, read_password(matches)?))
}

fn draft(matches: &ArgMatches) -> Result<TransactionDraft> {
    let mut draft = TransactionDraft {
        amount: matches.get_one::<String>("amount").cloned().unwrap_or_default(),
        class_name: matches.get_one::<String>("class").cloned().unwrap_or_default(),
        ..TransactionDraft::default()
    };
    if let Some(date) = matches.get_one::<String>("date") {
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{date}', expected YYYY-MM-DD"))?;
        draft.time = Some(parsed);
    }
    Ok(draft)
}

fn confirmer(matches: &ArgMatches) -> Box<dyn Confirm> {
    if matches.get_flag("yes") {
        Box::new(AutoConfirm(true))
    } else {
        Box::new(StdinConfirm)
    }
}

/// Print effects; returns `true` if any of them reported a failure.
fn report(effects: &[Effect]) -> bool {
    let mut failed = false;
    for effect in effects {
        match effect {
            Effect::Welcome(text) | Effect::Notice(text) => println!("{text}"),
            Effect::Alert(text) => {
                eprintln!("{text}");
                // The mutation itself went through; only the reload failed.
                failed |= !text.starts_with(RESYNC_FAILED_ALERT);
            }
            Effect::NoChartData => println!("No data available to plot."),
            Effect::Navigate(Route::Login) => {
                tracing::info!("Session ended, run `ftrack login` to continue");
            }
            Effect::Navigate(_)
            | Effect::TranscriptUpdated
            | Effect::TransactionsUpdated
            | Effect::ChartRendered(_) => {}
        }
    }
    failed
}

async fn run(matches: ArgMatches) -> Result<bool> {
    let config = load_config(&matches)?;
    let data_dir = config.resolve_data_dir()?;
    let credentials = Arc::new(FileCredentialStore::in_dir(&data_dir));
    let navigator = Arc::new(RouteRecorder::new());

    let (name, sub) = match matches.subcommand() {
        Some((name, sub)) => (name.to_string(), sub.clone()),
        None => bail!("No command given"),
    };

    let mut tracker = FinanceTracker::from_config(&config, credentials, navigator, TerminalChart::new());
    if matches!(name.as_str(), "delete" | "delete-account") {
        tracker = tracker.with_confirm(confirmer(&sub));
    }

    let failed = match name.as_str() {
        "login" => {
            let effects = tracker.dispatch(Action::Login(read_credentials(&sub)?)).await;
            if report(&effects) {
                true
            } else {
                report(&tracker.enter(Route::Home).await)
            }
        }
        "register" => report(&tracker.dispatch(Action::Register(read_credentials(&sub)?)).await),
        "logout" => {
            let failed = report(&tracker.dispatch(Action::Logout).await);
            if !failed {
                println!("Logged out.");
            }
            failed
        }
        "whoami" => report(&tracker.enter(Route::Home).await),
        "delete-account" => report(&tracker.dispatch(Action::DeleteAccount).await),
        "ask" => {
            let query = sub
                .get_many::<String>("query")
                .map(|parts| parts.cloned().collect::<Vec<_>>().join(" "))
                .unwrap_or_default();
            let effects = tracker.dispatch(Action::SubmitQuery(query)).await;
            render::print_messages(tracker.messages());
            report(&effects)
        }
        "list" => {
            let effects = tracker.dispatch(Action::RefreshTransactions).await;
            render::print_transactions(tracker.transactions().view());
            report(&effects)
        }
        "add" => {
            let effects = tracker.dispatch(Action::AddTransaction(draft(&sub)?)).await;
            render::print_messages(tracker.messages());
            render::print_transactions(tracker.transactions().view());
            report(&effects)
        }
        "delete" => {
            let id = sub.get_one::<i64>("id").copied().unwrap_or_default();
            let effects = tracker.dispatch(Action::DeleteTransaction(id)).await;
            render::print_transactions(tracker.transactions().view());
            report(&effects)
        }
        "chart" => {
            let kind: ChartKind = sub
                .get_one::<String>("kind")
                .map(String::as_str)
                .unwrap_or("category")
                .parse()?;
            report(&tracker.dispatch(Action::RenderChart(kind)).await)
        }
        other => bail!("Unknown command '{other}'"),
    };

    Ok(failed)
}

#[tokio::main]
async fn main() {
    init_tracing();
    let matches = cli::build().get_matches();

    match run(matches).await {
        Ok(false) => {}
        Ok(true) => process::exit(1),
        Err(err) => {
            eprintln!("Error: {err:#}");
            process::exit(1);
        }
    }
}
