//! TaskLens CLI - task management with heuristic insights.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tasklens_core::{NewTask, Priority, Task, TaskFilter, TaskId, TaskUpdate};
use tasklens_insight::{InsightConfig, InsightEngine};
use tasklens_storage::{JsonStorage, Storage};
use tasklens_work::{BasicTaskManager, BatchConfig, HealthReport, TaskManager};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tasklens")]
#[command(about = "Task manager with heuristic task insights", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Data directory
    #[arg(long, global = true, env = "TASKLENS_DATA_DIR", default_value = ".tasklens")]
    data_dir: PathBuf,

    /// Insight engine configuration (JSON)
    #[arg(long, global = true, env = "TASKLENS_CONFIG")]
    config: Option<PathBuf>,

    /// Storage backend
    #[arg(long, global = true, value_enum, default_value_t = Backend::Json)]
    backend: Backend,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// One JSON file per task
    Json,
    /// SQLite database file
    Sqlite,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title
        title: String,
        /// Free-text description
        #[arg(short, long)]
        description: Option<String>,
        /// low, medium or high
        #[arg(short, long)]
        priority: Option<Priority>,
    },
    /// List tasks, newest first
    List {
        /// Only completed tasks
        #[arg(long, conflicts_with = "pending")]
        completed: bool,
        /// Only pending tasks
        #[arg(long)]
        pending: bool,
        /// Maximum number of tasks
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show task details
    Show {
        /// Task ID
        id: TaskId,
    },
    /// Update task fields
    Update {
        /// Task ID
        id: TaskId,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description; clears any stored analysis
        #[arg(long)]
        description: Option<String>,
        /// New priority
        #[arg(long)]
        priority: Option<Priority>,
        /// New completion flag
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Mark a task completed
    Complete {
        /// Task ID
        id: TaskId,
        /// Reopen instead
        #[arg(long)]
        undo: bool,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: TaskId,
    },
    /// Analyze a description
    Analyze {
        /// Description text
        text: String,
    },
    /// Analyze a stored task and save the result
    AnalyzeTask {
        /// Task ID
        id: TaskId,
    },
    /// Analyze several stored tasks
    BatchAnalyze {
        /// Task IDs; unknown ones are skipped
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Suggestions for the task collection
    Suggest {
        /// Include completed tasks
        #[arg(long)]
        all: bool,
    },
    /// Progress summary
    Summary,
    /// Analyze one batch of unprocessed tasks
    Process {
        /// Tasks per batch
        #[arg(long, default_value_t = 5)]
        batch_size: usize,
    },
    /// Analyze unprocessed tasks periodically until Ctrl-C
    Watch {
        /// Tasks per batch
        #[arg(long, default_value_t = 5)]
        batch_size: usize,
        /// Seconds between batches
        #[arg(long, default_value_t = 30)]
        interval: u64,
    },
    /// Insert sample tasks
    Seed,
    /// Collection counts
    Stats,
    /// Check that the storage backend answers
    Health {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write all tasks to a JSON file
    Backup {
        /// Output file (default: <data-dir>/backups/backup-<timestamp>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete every task
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => InsightConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => InsightConfig::default(),
    };
    let engine = InsightEngine::new(config).with_span(tracing::info_span!("insight"));

    match cli.backend {
        Backend::Json => {
            let storage = JsonStorage::new(&cli.data_dir).await?;
            execute(cli, BasicTaskManager::with_engine(storage, engine)).await
        }
        #[cfg(feature = "sqlite")]
        Backend::Sqlite => {
            std::fs::create_dir_all(&cli.data_dir)?;
            let path = cli.data_dir.join("tasks.db");
            let storage = tasklens_storage::SqliteStorage::new_from_path(&path).await?;
            execute(cli, BasicTaskManager::with_engine(storage, engine)).await
        }
        #[cfg(not(feature = "sqlite"))]
        Backend::Sqlite => anyhow::bail!("Built without the sqlite feature"),
    }
}

async fn execute<S: Storage + 'static>(cli: Cli, manager: BasicTaskManager<S>) -> Result<()> {
    match cli.command {
        Commands::Add { title, description, priority } => {
            let mut spec = NewTask::new(title);
            spec.description = description;
            spec.priority = priority;
            let task = manager.create_task(spec).await?;
            println!("Added task: {} - {}", task.id, task.title);
        }
        Commands::List { completed, pending, limit } => {
            let filter = TaskFilter {
                completed: if completed {
                    Some(true)
                } else if pending {
                    Some(false)
                } else {
                    None
                },
                limit,
                ..Default::default()
            };
            let tasks = manager.list_tasks(&filter).await?;

            println!("Tasks ({})", tasks.len());
            for task in tasks {
                println!("  {}", format_task_line(&task));
            }
        }
        Commands::Show { id } => {
            let task = manager.get_task(id).await?;
            println!("Task: {}", task.id);
            println!("  Title: {}", task.title);
            println!("  Description: {}", task.description);
            println!("  Priority: {}", task.priority);
            println!("  Completed: {}", task.completed);
            println!("  Created: {}", task.created_at);
            println!("  Updated: {}", task.updated_at);
            if let Some(analysis) = &task.analysis {
                println!("  Analysis: {}", serde_json::to_string_pretty(analysis)?);
            }
        }
        Commands::Update { id, title, description, priority, completed } => {
            let update = TaskUpdate { title, description, priority, completed };
            let task = manager.update_task(id, update).await?;
            print_json(&task)?;
        }
        Commands::Complete { id, undo } => {
            let task = manager.complete_task(id, !undo).await?;
            println!("{}", format_task_line(&task));
        }
        Commands::Delete { id } => {
            manager.delete_task(id).await?;
            println!("Task deleted successfully");
        }
        Commands::Analyze { text } => {
            let analysis = manager.analyze_text(&text)?;
            print_json(&serde_json::json!({ "description": text, "analysis": analysis }))?;
        }
        Commands::AnalyzeTask { id } => {
            let report = manager.analyze_task(id).await?;
            print_json(&report)?;
        }
        Commands::BatchAnalyze { ids } => {
            let ids: Vec<TaskId> = ids
                .iter()
                .filter_map(|raw| match raw.parse() {
                    Ok(id) => Some(id),
                    Err(_) => {
                        warn!("Skipping invalid task id: {}", raw);
                        None
                    }
                })
                .collect();
            let reports = manager.batch_analyze(&ids).await?;
            print_json(&serde_json::json!({ "analyzed": reports.len(), "results": reports }))?;
        }
        Commands::Suggest { all } => {
            let (task_count, suggestions) = manager.suggestions(all).await?;
            print_json(&serde_json::json!({ "taskCount": task_count, "suggestions": suggestions }))?;
        }
        Commands::Summary => {
            let summary = manager.summary().await?;
            let metrics = &summary.key_metrics;
            print_json(&serde_json::json!({
                "totalTasks": metrics.total_tasks,
                "completedTasks": metrics.completed_tasks,
                "pendingTasks": metrics.pending_tasks,
                "summary": summary,
            }))?;
        }
        Commands::Process { batch_size } => {
            let analyzer = manager.batch_analyzer(BatchConfig {
                batch_size,
                ..Default::default()
            });
            let processed = analyzer.process_pending().await?;
            println!("Processed {} tasks", processed);
        }
        Commands::Watch { batch_size, interval } => {
            let analyzer = manager.batch_analyzer(BatchConfig {
                batch_size,
                interval: Duration::from_secs(interval),
            });
            analyzer
                .run_until(async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        warn!("Failed to listen for Ctrl-C: {}", e);
                    }
                })
                .await?;
            print_json(&analyzer.status().await)?;
        }
        Commands::Seed => {
            let inserted = manager.seed().await?;
            let total = manager.stats().await?.total_tasks;
            println!("Inserted {} sample tasks, {} tasks in store", inserted, total);
        }
        Commands::Stats => {
            let stats = manager.stats().await?;
            println!("TaskLens Stats");
            println!("  Total: {}", stats.total_tasks);
            println!("  Completed: {}", stats.completed_tasks);
            println!("  High priority: {}", stats.high_priority_tasks);
            println!("  Analyzed: {}", stats.analyzed_tasks);
        }
        Commands::Health { json } => {
            let report = manager.health().await;
            if json {
                print_json(&report)?;
            } else {
                for line in health_lines(&report) {
                    println!("{}", line);
                }
            }
            if !report.healthy {
                anyhow::bail!("Storage backend is unhealthy");
            }
        }
        Commands::Backup { output } => {
            let path = output.unwrap_or_else(|| default_backup_path(&cli.data_dir));
            let count = manager.backup(&path).await?;
            println!("Backed up {} tasks to {}", count, path.display());
        }
        Commands::Clear { yes } => {
            if !yes {
                println!("Refusing to delete every task without --yes");
                return Ok(());
            }
            let removed = manager.clear().await?;
            info!("Removed {} tasks", removed);
            println!("Removed {} tasks", removed);
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_task_line(task: &Task) -> String {
    format!(
        "{} | {} | {} - {}",
        task.id,
        if task.completed { "DONE" } else { "TODO" },
        format_priority(task.priority),
        task.title,
    )
}

fn format_priority(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "LOW",
        Priority::Medium => "MEDIUM",
        Priority::High => "HIGH",
    }
}

fn health_lines(report: &HealthReport) -> Vec<String> {
    let mut lines = vec![
        format!(
            "TaskLens Health: {}",
            if report.healthy { "OK" } else { "UNHEALTHY" }
        ),
        format!("  Storage: {}", report.storage),
    ];
    if let Some(total) = report.total_tasks {
        lines.push(format!("  Tasks: {}", total));
    }
    lines.push(format!("  Checked at: {}", report.checked_at.to_rfc3339()));
    lines
}

fn default_backup_path(data_dir: &Path) -> PathBuf {
    let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
    data_dir.join("backups").join(format!("backup-{}.json", stamp))
}
