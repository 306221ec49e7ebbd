//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sp - study planner with auto-scheduled subtasks
#[derive(Parser, Debug)]
#[command(
    name = "sp",
    author,
    version,
    about = "Study tasks and plans with proportional deadline scheduling",
    after_help = "Logs are written to: ~/.local/share/studyplan/logs/studyplan.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database file (overrides config)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage tasks
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },

    /// Manage plans
    Plan {
        #[command(subcommand)]
        command: PlanCommand,
    },

    /// Show tasks grouped by plan with progress
    Overview {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Create a task
    Add {
        /// Task title
        title: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: String,

        /// Task description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Plan ID (or unique prefix) to attach the task to
        #[arg(short, long)]
        plan: Option<String>,
    },

    /// List tasks
    List {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Change a task's status (pending, in_progress, completed, cancelled)
    Status {
        /// Task ID or unique prefix
        id: String,

        /// New status
        status: String,
    },

    /// Delete a task
    Rm {
        /// Task ID or unique prefix
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum PlanCommand {
    /// Create an empty plan
    Add {
        /// Plan name
        name: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: String,

        /// Plan description
        #[arg(short, long)]
        description: String,

        /// Assignment text the plan covers
        #[arg(short, long)]
        assignment: String,
    },

    /// Generate subtasks spread between today and the due date
    Generate {
        /// Assignment text
        assignment: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: String,

        /// Number of subtasks (clamped to 1-10; default from config)
        #[arg(short, long, allow_negative_numbers = true)]
        steps: Option<i64>,

        /// Create the subtasks without an owning plan
        #[arg(long)]
        standalone: bool,

        /// Print the projected step deadlines without creating anything
        #[arg(long)]
        dry_run: bool,
    },

    /// List plans
    List {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete a plan and all of its tasks
    Rm {
        /// Plan ID or unique prefix
        id: String,
    },
}

/// Output format for list/overview commands
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_task_add() {
        let cli = Cli::parse_from(["sp", "task", "add", "Read chapter 4", "--due", "2024-03-01"]);
        match cli.command {
            Command::Task {
                command: TaskCommand::Add {
                    title,
                    due,
                    description,
                    plan,
                },
            } => {
                assert_eq!(title, "Read chapter 4");
                assert_eq!(due, "2024-03-01");
                assert_eq!(description, "");
                assert!(plan.is_none());
            }
            other => panic!("Expected task add, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_generate() {
        let cli = Cli::parse_from([
            "sp", "plan", "generate", "Essay", "--due", "2024-06-10", "--steps", "3", "--standalone",
        ]);
        match cli.command {
            Command::Plan {
                command:
                    PlanCommand::Generate {
                        assignment,
                        steps,
                        standalone,
                        ..
                    },
            } => {
                assert_eq!(assignment, "Essay");
                assert_eq!(steps, Some(3));
                assert!(standalone);
            }
            other => panic!("Expected plan generate, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_generate_negative_steps() {
        let cli = Cli::parse_from(["sp", "plan", "generate", "Essay", "--due", "2024-06-10", "-s", "-2"]);
        assert!(matches!(
            cli.command,
            Command::Plan {
                command: PlanCommand::Generate { steps: Some(-2), .. }
            }
        ));
    }

    #[test]
    fn test_cli_parse_generate_dry_run() {
        let cli = Cli::parse_from(["sp", "plan", "generate", "Essay", "--due", "2024-06-10", "--dry-run"]);
        match cli.command {
            Command::Plan {
                command: PlanCommand::Generate {
                    steps,
                    standalone,
                    dry_run,
                    ..
                },
            } => {
                assert!(dry_run);
                assert!(!standalone);
                assert!(steps.is_none());
            }
            other => panic!("Expected plan generate, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_status() {
        let cli = Cli::parse_from(["sp", "task", "status", "3fa2", "completed"]);
        assert!(matches!(
            cli.command,
            Command::Task {
                command: TaskCommand::Status { .. }
            }
        ));
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from(["sp", "overview", "--db", "/tmp/x.db", "-v", "-c", "/tmp/c.yml"]);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.yml")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("table".parse::<OutputFormat>().is_err());
    }
}
