use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::debug;

use school_records::records::validation::parse_subject;
use school_records::{SchoolOperations, StoreConfig, Subject};

/// Student records and grades kept in plain text files
#[derive(Debug, Parser)]
#[command(name = "school_records", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file (defaults to ./school.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register a student in one of the fixed classes
    Register {
        /// Full name, letters and spaces only
        name: String,
        /// Class identifier, e.g. 9A
        class: String,
    },

    /// Record the two partial scores of a subject
    Grade {
        /// Student identifier (RA)
        id: String,
        #[arg(value_parser = parse_subject)]
        subject: Subject,
        n1: f64,
        n2: f64,
    },

    /// Remove a student and all of its grades
    Remove { id: String },

    /// Delete every student, grade and generated file
    Reset {
        /// Confirm the irreversible reset
        #[arg(long)]
        yes: bool,
    },

    /// Show the report card of a student
    Report {
        id: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List students per class
    List,

    /// Regenerate every derived file from the canonical store
    Rebuild,
}

fn main() {
    if let Err(error) = run() {
        eprintln!("school_records error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let config = StoreConfig::load(cli.config.as_deref())?;
    debug!("Using config: {:?}", config);

    let mut ops = SchoolOperations::open(&config).context("failed to open the school store")?;

    match cli.command {
        Command::Register { name, class } => {
            let id = ops.register(&name, &class)?;
            println!("Registered {} with RA {}", name.trim(), id);
        }
        Command::Grade { id, subject, n1, n2 } => {
            let average = ops.record_grade(&id, subject, n1, n2)?;
            println!("{} average for {}: {:.2}", subject, id.to_uppercase(), average);
        }
        Command::Remove { id } => {
            let record = ops.remove(&id)?;
            println!("Removed {} ({})", record.name, id.to_uppercase());
        }
        Command::Reset { yes } => {
            if !yes {
                bail!("refusing to reset without --yes");
            }
            let removed = ops.reset_all()?;
            println!("Store cleared, {} files deleted", removed);
        }
        Command::Report { id, json } => {
            let card = ops.report_card(&id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&card)?);
            } else {
                println!("{}", card);
            }
        }
        Command::List => {
            let listing = ops.class_listing();
            if listing.is_empty() {
                println!("No students registered.");
            }
            for class in listing {
                println!("--- Turma {} ---", class.class_name);
                for student in class.students {
                    let complete = if student.average_complete { "Sim" } else { "Não" };
                    println!("Nome: {} | RA: {} | Média Lançada: {}", student.name, student.id, complete);
                }
            }
        }
        Command::Rebuild => {
            let stats = ops.save()?;
            println!(
                "{} files written, {} unchanged, {} removed",
                stats.written, stats.unchanged, stats.removed
            );
        }
    }

    Ok(())
}

fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}
