mod cli;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use worklog_engine::api::{AppState, create_router};
use worklog_engine::calculation::{format_duration, plan_range};
use worklog_engine::config::ConfigLoader;
use worklog_engine::models::{
    AllocationPlan, Ticket, WorkPeriod, first_day_of_month, last_day_of_month,
};
use worklog_engine::report::{fetch_worklogs, render_report, report_title};
use worklog_engine::submission::{
    FormSubmitter, JiraClient, RestSubmitter, WorklogSubmitter, submit_plan,
};

use crate::cli::{Backend, Cli, Command, RangeArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let loader = ConfigLoader::load(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    let today = Local::now().date_naive();

    match cli.command {
        Command::Plan { range, json } => run_plan(&loader, &range, today, json),
        Command::Log {
            range,
            backend,
            skip_auth_check,
        } => run_log(&loader, &range, today, backend, skip_auth_check).await,
        Command::Report { month, user } => run_report(&loader, month.as_deref(), user, today).await,
        Command::Serve { addr, seed } => {
            let state = match seed {
                Some(seed) => AppState::with_default_seed(loader, seed),
                None => AppState::new(loader),
            };
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("binding {addr}"))?;
            info!(%addr, "Serving plan API");
            axum::serve(listener, create_router(state)).await?;
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_plan(
    loader: &ConfigLoader,
    range: &RangeArgs,
    today: NaiveDate,
    tickets: &[Ticket],
) -> Result<AllocationPlan> {
    let (start, end) = range.dates(today)?;
    let period = loader.period(start, end);
    let settings = range.settings(loader.allocation());
    let mut rng = match range.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Ok(plan_range(&period, tickets, &settings, &mut rng)?)
}

fn print_plan(plan: &AllocationPlan, tickets: &[Ticket]) {
    for day in &plan.days {
        println!("{} ({})", day.date, day.date.format("%a"));
        for entry in &day.entries {
            let label = entry
                .label
                .as_deref()
                .or_else(|| {
                    tickets
                        .iter()
                        .find(|t| t.id == entry.ticket_id)
                        .map(Ticket::display_name)
                })
                .unwrap_or(&entry.ticket_id);
            println!(
                "  {:<12} {:>7}  {}",
                entry.ticket_id,
                format_duration(u64::from(entry.minutes)),
                label
            );
        }
    }
    println!(
        "{} working day(s), {} entries, {} in total",
        plan.totals.working_days,
        plan.totals.entries,
        format_duration(plan.totals.total_minutes)
    );
}

fn run_plan(loader: &ConfigLoader, range: &RangeArgs, today: NaiveDate, json: bool) -> Result<()> {
    let plan = build_plan(loader, range, today, loader.tickets())?;
    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&plan, loader.tickets());
    }
    Ok(())
}

async fn run_log(
    loader: &ConfigLoader,
    range: &RangeArgs,
    today: NaiveDate,
    backend: Backend,
    skip_auth_check: bool,
) -> Result<()> {
    let client = JiraClient::from_env(loader.jira())?;
    if !skip_auth_check {
        client.check_auth().await?;
        info!(base_url = client.base_url(), "Credentials accepted");
    }

    let tickets = resolve_tickets(&client, loader.tickets()).await?;
    let plan = build_plan(loader, range, today, &tickets)?;
    print_plan(&plan, &tickets);

    let submitter: Box<dyn WorklogSubmitter> = match backend {
        Backend::Rest => Box::new(RestSubmitter::new(client)),
        Backend::Form => Box::new(FormSubmitter::new(client)),
    };
    let report = submit_plan(submitter.as_ref(), &plan, loader.start_time()).await;

    println!(
        "Logged {}/{} worklog(s) via {}",
        report.succeeded,
        report.planned,
        submitter.name()
    );
    for failure in &report.failures {
        println!("  FAILED {} {}: {}", failure.date, failure.ticket_id, failure.message);
    }
    if !report.is_complete() {
        bail!("{} worklog(s) were not recorded", report.failures.len());
    }
    Ok(())
}

/// Swaps each tracked ticket's id for its canonical key and fills missing
/// labels with the issue summary.
async fn resolve_tickets(client: &JiraClient, tickets: &[Ticket]) -> Result<Vec<Ticket>> {
    let mut resolved = Vec::with_capacity(tickets.len());
    for ticket in tickets {
        if !ticket.tracked {
            resolved.push(ticket.clone());
            continue;
        }
        let issue = client
            .resolve_issue(&ticket.id)
            .await
            .with_context(|| format!("resolving ticket '{}'", ticket.id))?;
        if issue.key != ticket.id {
            info!(configured = %ticket.id, key = %issue.key, "Ticket id resolved to a different key");
        }
        resolved.push(Ticket {
            id: issue.key,
            label: ticket
                .label
                .clone()
                .or_else(|| (!issue.summary.is_empty()).then_some(issue.summary)),
            weight: ticket.weight,
            tracked: true,
        });
    }
    Ok(resolved)
}

async fn run_report(
    loader: &ConfigLoader,
    month: Option<&str>,
    user: Option<String>,
    today: NaiveDate,
) -> Result<()> {
    let anchor = match month {
        Some(month) => NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
            .with_context(|| format!("invalid month '{month}', expected YYYY-MM"))?,
        None => today,
    };
    let period = WorkPeriod::new(first_day_of_month(anchor), last_day_of_month(anchor));
    let user = user.unwrap_or_else(|| loader.jira().username.clone());

    let client = JiraClient::from_env(loader.jira())?;
    let days = fetch_worklogs(
        &client,
        &user,
        period.start_date,
        period.end_date,
        &loader.holiday_dates(),
    )
    .await?;

    print!("{}", render_report(&report_title(anchor), &days));
    Ok(())
}
