mod db;
mod error;
mod forms;
mod gateway;
mod logging;
mod models;
mod tui;
mod wizard;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use db::Database;
use models::{Organization, StudentOrganization};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "journey")]
#[command(about = "ESB Alumni & Student Journey - capture student profiles, internships and first jobs")]
struct Cli {
    /// Path to the SQLite database
    #[arg(long, global = true, env = "JOURNEY_DB")]
    db: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Run the 3-step survey (default)
    Wizard,

    /// List programs
    Programs {
        #[arg(long)]
        json: bool,
    },

    /// List students
    Students {
        #[arg(long)]
        json: bool,
    },

    /// List employers
    Employers {
        #[arg(long)]
        json: bool,
    },

    /// List a student's internships
    Internships {
        /// Student ID
        student_id: String,

        #[arg(long)]
        json: bool,
    },

    /// Manage student organizations
    Org {
        #[command(subcommand)]
        command: OrgCommands,
    },
}

#[derive(Subcommand)]
enum OrgCommands {
    /// List organizations
    List {
        #[arg(long)]
        json: bool,
    },

    /// Add an organization
    Add {
        /// Organization ID
        org_id: String,

        /// Organization name
        org_name: String,

        /// Kind of organization (club, society, ...)
        #[arg(short = 't', long = "type", default_value = "")]
        org_type: String,
    },

    /// Link a student to an organization
    Link {
        /// Membership record ID
        student_org_id: String,

        /// Student ID
        student_id: String,

        /// Organization ID
        org_id: String,

        /// Role held in the organization
        #[arg(short, long, default_value = "")]
        role: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        start: String,

        /// End date (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        end: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let db = Database::open(cli.db).context("Failed to prepare database location")?;

    let command = cli.command.unwrap_or(Commands::Wizard);
    let interactive = matches!(command, Commands::Wizard);
    let log_handle = logging::init_logging(&db.data_dir(), interactive, cli.verbose)?;

    match command {
        Commands::Init => {
            db.init()?;
            println!("Database initialized at {}", db.path().display());
        }

        Commands::Wizard => {
            db.ensure_initialized()?;
            info!(db = %db.path().display(), "starting wizard");
            tui::run_wizard(&db)?;
            if let Some(path) = &log_handle.log_file_path {
                println!("Session log: {}", path.display());
            }
        }

        Commands::Programs { json } => {
            db.ensure_initialized()?;
            let programs = db.list_programs()?;
            if json {
                print_json(&programs)?;
            } else if programs.is_empty() {
                println!("No programs found.");
            } else {
                println!("{:<12} {:<40}", "ID", "NAME");
                println!("{}", "-".repeat(52));
                for p in programs {
                    println!("{:<12} {:<40}", truncate(&p.program_id, 12), truncate(&p.program_name, 40));
                }
            }
        }

        Commands::Students { json } => {
            db.ensure_initialized()?;
            let students = db.list_students()?;
            if json {
                print_json(&students)?;
            } else if students.is_empty() {
                println!("No students found.");
            } else {
                println!("{:<12} {:<30} {:<30}", "ID", "NAME", "EMAIL");
                println!("{}", "-".repeat(72));
                for s in students {
                    let name = format!("{} {}", s.first_name, s.last_name);
                    println!(
                        "{:<12} {:<30} {:<30}",
                        truncate(&s.student_id, 12),
                        truncate(&name, 30),
                        truncate(&s.email, 30)
                    );
                }
            }
        }

        Commands::Employers { json } => {
            db.ensure_initialized()?;
            let employers = db.list_employers()?;
            if json {
                print_json(&employers)?;
            } else if employers.is_empty() {
                println!("No employers found.");
            } else {
                println!("{:<12} {:<40}", "ID", "NAME");
                println!("{}", "-".repeat(52));
                for e in employers {
                    println!("{:<12} {:<40}", truncate(&e.employer_id, 12), truncate(&e.employer_name, 40));
                }
            }
        }

        Commands::Internships { student_id, json } => {
            db.ensure_initialized()?;
            let internships = db.internships_for_student(&student_id)?;
            if json {
                print_json(&internships)?;
            } else if internships.is_empty() {
                println!("No internships found for student {}.", student_id);
            } else {
                println!("{:<12} {:<40}", "ID", "TITLE");
                println!("{}", "-".repeat(52));
                for i in internships {
                    println!("{:<12} {:<40}", truncate(&i.internship_id, 12), truncate(&i.title, 40));
                }
            }
        }

        Commands::Org { command } => {
            db.ensure_initialized()?;
            match command {
                OrgCommands::List { json } => {
                    let orgs = db.list_organizations()?;
                    if json {
                        print_json(&orgs)?;
                    } else if orgs.is_empty() {
                        println!("No organizations found.");
                    } else {
                        println!("{:<12} {:<40}", "ID", "NAME");
                        println!("{}", "-".repeat(52));
                        for o in orgs {
                            println!("{:<12} {:<40}", truncate(&o.org_id, 12), truncate(&o.org_name, 40));
                        }
                    }
                }

                OrgCommands::Add {
                    org_id,
                    org_name,
                    org_type,
                } => {
                    db.add_organization(&Organization {
                        org_id: org_id.clone(),
                        org_name,
                        org_type,
                    })?;
                    println!("Added organization '{}'.", org_id);
                }

                OrgCommands::Link {
                    student_org_id,
                    student_id,
                    org_id,
                    role,
                    start,
                    end,
                } => {
                    db.add_student_org_link(&StudentOrganization {
                        student_org_id,
                        student_id: student_id.clone(),
                        org_id: org_id.clone(),
                        role,
                        start_date: start,
                        end_date: end,
                    })?;
                    println!("Linked student {} to organization {}.", student_id, org_id);
                }
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(rows: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
