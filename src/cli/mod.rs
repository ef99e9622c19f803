//! CLI module for insitu
//!
//! Provides the command-line interface using clap.

pub mod commands;
mod context;
mod output;

pub use context::Workspace;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

use crate::schemas::Role;

/// insitu - Delivery, request and work-assignment coordination for construction sites
#[derive(Parser, Debug)]
#[command(name = "insitu")]
#[command(version)]
#[command(about = "Delivery, request and work-assignment coordination for construction sites")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress info-level output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override the working directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an .insitu workspace in the current directory
    Init {
        /// Overwrite an existing config.json
        #[arg(long)]
        force: bool,
    },

    /// Register a new account
    Signup {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        name: String,

        /// warehouse_officer, transporter, site_manager, machinery_operator or logistics_laborer
        #[arg(long)]
        role: Role,
    },

    /// Sign in and keep the session in the workspace
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// End the current session
    Logout,

    /// Show the signed-in profile
    Whoami,

    /// Show the role-scoped dashboard
    Dashboard {
        /// Show only this tab
        #[arg(long)]
        tab: Option<String>,
    },

    /// Work with deliveries
    #[command(subcommand)]
    Delivery(DeliveryCommand),

    /// Work with warehouse requests
    #[command(subcommand)]
    Request(RequestCommand),

    /// Work with your work assignments
    #[command(subcommand)]
    Assignment(AssignmentCommand),

    /// List workers or assign them to a delivery
    #[command(subcommand)]
    Workers(WorkersCommand),

    /// Manage your work sites
    #[command(subcommand)]
    Worksite(WorksiteCommand),

    /// Read and acknowledge notifications
    #[command(subcommand)]
    Notifications(NotificationsCommand),
}

#[derive(Subcommand, Debug)]
pub enum DeliveryCommand {
    /// Create a pending delivery
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        address: String,

        #[arg(long)]
        description: Option<String>,

        /// RFC 3339 timestamp
        #[arg(long)]
        scheduled: Option<DateTime<Utc>>,

        #[arg(long)]
        work_site: Option<Uuid>,
    },

    /// Assign a pending delivery to a transporter
    Assign {
        id: Uuid,

        #[arg(long)]
        transporter: Uuid,
    },

    /// Start transit of an assigned delivery
    Start { id: Uuid },

    /// Mark an in-transit delivery as delivered
    Deliver { id: Uuid },

    /// Close a delivered delivery
    Complete { id: Uuid },

    /// List available transporters
    Transporters,
}

#[derive(Subcommand, Debug)]
pub enum RequestCommand {
    /// File a warehouse request
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        quantity: i64,

        #[arg(long)]
        unit: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        work_site: Option<Uuid>,

        /// Reference image to attach
        #[arg(long)]
        image: Option<PathBuf>,
    },

    Approve { id: Uuid },

    Reject { id: Uuid },

    Complete { id: Uuid },
}

#[derive(Subcommand, Debug)]
pub enum AssignmentCommand {
    Start { id: Uuid },

    Complete { id: Uuid },

    Cancel { id: Uuid },
}

#[derive(Subcommand, Debug)]
pub enum WorkersCommand {
    /// List machinery operators and logistics laborers
    List,

    /// Create one work assignment per worker for a delivery
    Assign {
        /// Delivery id
        delivery: Uuid,

        /// Worker ids
        #[arg(long = "worker", required = true)]
        workers: Vec<Uuid>,

        /// Task title shared by every assignment
        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Special instructions for every worker
        #[arg(long)]
        instructions: Option<String>,

        /// Safety requirements for every worker, replacing the role default
        #[arg(long)]
        safety: Option<String>,

        /// Instructions for one worker, as <worker id>=<text>; overrides --instructions
        #[arg(long = "worker-instructions", value_parser = parse_worker_text)]
        worker_instructions: Vec<WorkerText>,

        /// Safety requirements for one worker, as <worker id>=<text>; overrides --safety
        #[arg(long = "worker-safety", value_parser = parse_worker_text)]
        worker_safety: Vec<WorkerText>,
    },
}

/// Text addressed to a single worker
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerText {
    pub worker_id: Uuid,
    pub text: String,
}

fn parse_worker_text(raw: &str) -> std::result::Result<WorkerText, String> {
    let (id, text) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected <worker id>=<text>, got '{}'", raw))?;
    let worker_id = id
        .trim()
        .parse::<Uuid>()
        .map_err(|e| format!("invalid worker id '{}': {}", id, e))?;
    Ok(WorkerText {
        worker_id,
        text: text.to_string(),
    })
}

#[derive(Subcommand, Debug)]
pub enum WorksiteCommand {
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        address: String,

        #[arg(long)]
        description: Option<String>,
    },

    List,
}

#[derive(Subcommand, Debug)]
pub enum NotificationsCommand {
    List {
        /// Only unread notifications
        #[arg(long)]
        unread: bool,
    },

    /// Mark one notification as read
    Read { id: Uuid },

    /// Mark every notification as read
    ReadAll,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delivery_assign() {
        let id = Uuid::new_v4();
        let transporter = Uuid::new_v4();
        let (id_arg, transporter_arg) = (id.to_string(), transporter.to_string());
        let cli = Cli::try_parse_from([
            "insitu",
            "--json",
            "delivery",
            "assign",
            id_arg.as_str(),
            "--transporter",
            transporter_arg.as_str(),
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Some(Commands::Delivery(DeliveryCommand::Assign { id: got, transporter: t })) => {
                assert_eq!(got, id);
                assert_eq!(t, transporter);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_signup_role() {
        let cli = Cli::try_parse_from([
            "insitu", "signup", "--email", "a@example.com", "--password", "secret1", "--name", "Ana", "--role",
            "site_manager",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Signup { role: Role::SiteManager, .. })));
    }

    #[test]
    fn test_parse_workers_assign_requires_worker() {
        let delivery = Uuid::new_v4().to_string();
        assert!(Cli::try_parse_from(["insitu", "workers", "assign", delivery.as_str()]).is_err());

        let worker = Uuid::new_v4().to_string();
        let cli = Cli::try_parse_from([
            "insitu",
            "workers",
            "assign",
            delivery.as_str(),
            "--worker",
            worker.as_str(),
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Workers(WorkersCommand::Assign { ref workers, .. })) if workers.len() == 1
        ));
    }

    #[test]
    fn test_parse_per_worker_texts() {
        let delivery = Uuid::new_v4().to_string();
        let worker = Uuid::new_v4();
        let (worker_arg, note) = (worker.to_string(), format!("{}=Use gate 3", worker));
        let cli = Cli::try_parse_from([
            "insitu",
            "workers",
            "assign",
            delivery.as_str(),
            "--worker",
            worker_arg.as_str(),
            "--worker-instructions",
            note.as_str(),
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Workers(WorkersCommand::Assign { worker_instructions, worker_safety, .. })) => {
                assert_eq!(
                    worker_instructions,
                    vec![WorkerText {
                        worker_id: worker,
                        text: "Use gate 3".to_string()
                    }]
                );
                assert!(worker_safety.is_empty());
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(parse_worker_text("no-separator").is_err());
        assert!(parse_worker_text("not-a-uuid=text").is_err());
    }

    #[test]
    fn test_bad_role_rejected() {
        let result = Cli::try_parse_from([
            "insitu", "signup", "--email", "a@example.com", "--password", "secret1", "--name", "Ana", "--role",
            "foreman",
        ]);
        assert!(result.is_err());
    }
}
