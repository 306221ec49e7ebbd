//! sp - study planner CLI
//!
//! Thin presentation layer over the StateManager: parses commands, resolves
//! partial IDs and renders plans, tasks and progress.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{info, warn};

use studyplan::cli::{Cli, Command, OutputFormat, PlanCommand, TaskCommand};
use studyplan::{
    Aggregate, Config, GenerateRequest, IdResolver, NewPlan, NewTask, Plan, ScheduleOrchestrator, SqlitePersistence,
    StateManager, Task, TaskStatus, TaskStore,
};

fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("studyplan")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Write to a log file, keeping stdout for command output
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("studyplan.log"))
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let db_path = cli.db.clone().unwrap_or_else(|| config.storage.db_path.clone());
    info!(db_path = %db_path.display(), "studyplan starting");

    let persistence = SqlitePersistence::open(&db_path).context(format!("Failed to open {}", db_path.display()))?;
    let store = TaskStore::open(Box::new(persistence)).context("Failed to load tasks")?;
    let orchestrator = ScheduleOrchestrator::default();
    let manager = StateManager::spawn(store, orchestrator.clone());

    let result = match cli.command {
        Command::Task { command } => cmd_task(&manager, command).await,
        Command::Plan { command } => cmd_plan(&manager, &orchestrator, &config, command).await,
        Command::Overview { format } => cmd_overview(&manager, format).await,
    };

    // The command's own error takes precedence over a failed shutdown
    if let Err(e) = manager.shutdown().await {
        warn!(error = %e, "StateManager shutdown failed");
        result?;
        return Err(e).context("Failed to shut down state manager");
    }
    result
}

async fn cmd_task(manager: &StateManager, command: TaskCommand) -> Result<()> {
    match command {
        TaskCommand::Add {
            title,
            due,
            description,
            plan,
        } => {
            let mut fields = NewTask::new(title, description, due);
            if let Some(reference) = plan {
                fields = fields.in_plan(resolve_plan_id(manager, &reference).await?);
            }
            let task = manager.create_task(fields).await?;
            println!("{} Created task: {}", "✓".green(), task.id.cyan());
        }
        TaskCommand::List { format } => {
            let tasks = manager.list_tasks().await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tasks)?),
                OutputFormat::Text => {
                    if tasks.is_empty() {
                        println!("No tasks found");
                    }
                    for task in &tasks {
                        println!("{}", task_line(task));
                    }
                }
            }
        }
        TaskCommand::Status { id, status } => {
            let id = resolve_task_id(manager, &id).await?;
            let task = manager.update_task_status(&id, &status).await?;
            println!("{} {} is now {}", "✓".green(), task.id.cyan(), status_label(task.status));
        }
        TaskCommand::Rm { id } => {
            let id = resolve_task_id(manager, &id).await?;
            manager.delete_task(&id).await?;
            println!("{} Deleted task: {}", "✓".green(), id);
        }
    }
    Ok(())
}

async fn cmd_plan(
    manager: &StateManager,
    orchestrator: &ScheduleOrchestrator,
    config: &Config,
    command: PlanCommand,
) -> Result<()> {
    match command {
        PlanCommand::Add {
            name,
            due,
            description,
            assignment,
        } => {
            let plan = manager
                .create_plan(NewPlan::new(name, description, assignment, due))
                .await?;
            println!("{} Created plan: {}", "✓".green(), plan.id.cyan());
        }
        PlanCommand::Generate {
            assignment,
            due,
            steps,
            standalone,
            dry_run,
        } => {
            let steps = steps.unwrap_or_else(|| i64::from(config.schedule.steps()));
            let mut request = GenerateRequest::new(assignment, due, steps);
            if standalone {
                request = request.standalone();
            }
            if dry_run {
                let deadlines = orchestrator.preview(&request)?;
                println!("Estimated deadlines for {} steps (nothing created):", deadlines.len());
                for (i, deadline) in deadlines.iter().enumerate() {
                    println!("  Step {}: {}", i + 1, deadline.format("%Y-%m-%d"));
                }
                return Ok(());
            }
            let generated = manager.generate_plan(request).await?;
            match &generated.plan {
                Some(plan) => println!("{} Created plan: {} ({})", "✓".green(), plan.id.cyan(), plan.name),
                None => println!("{} Created {} standalone tasks", "✓".green(), generated.tasks.len()),
            }
            for task in &generated.tasks {
                println!("  {}", task_line(task));
            }
        }
        PlanCommand::List { format } => {
            let plans = manager.list_plans().await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plans)?),
                OutputFormat::Text => {
                    if plans.is_empty() {
                        println!("No plans found");
                    }
                    for plan in &plans {
                        println!("{}", plan_line(plan));
                    }
                }
            }
        }
        PlanCommand::Rm { id } => {
            let id = resolve_plan_id(manager, &id).await?;
            manager.delete_plan(&id).await?;
            println!("{} Deleted plan and its tasks: {}", "✓".green(), id);
        }
    }
    Ok(())
}

async fn cmd_overview(manager: &StateManager, format: OutputFormat) -> Result<()> {
    let view = manager.aggregate().await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Text => print_overview(&view),
    }
    Ok(())
}

fn print_overview(view: &Aggregate) {
    let counts = view.status_counts();
    println!(
        "{} tasks: {} pending, {} in progress, {} completed, {} cancelled",
        counts.total(),
        counts.pending,
        counts.in_progress,
        counts.completed,
        counts.cancelled
    );

    for group in &view.plan_groups {
        println!();
        println!(
            "{} {} {:.0}% ({}/{})",
            plan_line(&group.plan),
            progress_bar(group.progress_pct),
            group.progress_pct,
            group.completed,
            group.total
        );
        for task in &group.tasks {
            println!("    {}", task_line(task));
        }
    }

    if !view.standalone.is_empty() {
        println!();
        println!("{}", "Standalone tasks".bold());
        for task in &view.standalone {
            println!("    {}", task_line(task));
        }
    }
}

fn progress_bar(pct: f64) -> String {
    const WIDTH: usize = 10;
    let filled = ((pct / 100.0) * WIDTH as f64).round().clamp(0.0, WIDTH as f64) as usize;
    format!("[{}{}]", "#".repeat(filled).green(), "-".repeat(WIDTH - filled).dimmed())
}

fn status_label(status: TaskStatus) -> ColoredString {
    let label = status.to_string();
    match status {
        TaskStatus::Completed => label.green(),
        TaskStatus::InProgress => label.blue(),
        TaskStatus::Cancelled => label.red(),
        TaskStatus::Pending => label.normal(),
    }
}

fn task_line(task: &Task) -> String {
    format!(
        "{} {} {} [{}]",
        task.id.yellow(),
        task.due_date.format("%Y-%m-%d").to_string().dimmed(),
        task.title,
        status_label(task.status)
    )
}

fn plan_line(plan: &Plan) -> String {
    format!(
        "{} {} {}",
        plan.id.yellow(),
        plan.due_date.format("%Y-%m-%d").to_string().dimmed(),
        plan.name.bold()
    )
}

/// Resolve a typed reference against known IDs; unknown references pass through
fn resolve_reference(ids: Vec<String>, reference: &str) -> Result<String> {
    match IdResolver::new(ids.iter().map(String::as_str)).resolve(reference) {
        Ok(Some(id)) => Ok(id),
        Ok(None) => Ok(reference.to_string()),
        Err(candidates) => Err(eyre::eyre!(
            "Ambiguous reference '{}', matches: {}",
            reference,
            candidates.join(", ")
        )),
    }
}

async fn resolve_task_id(manager: &StateManager, reference: &str) -> Result<String> {
    let ids = manager.list_tasks().await?.into_iter().map(|t| t.id).collect();
    resolve_reference(ids, reference)
}

async fn resolve_plan_id(manager: &StateManager, reference: &str) -> Result<String> {
    let ids = manager.list_plans().await?.into_iter().map(|p| p.id).collect();
    resolve_reference(ids, reference)
}
