//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{logging, todo, tui};
use crate::domain::{Filter, TodoId};
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(author, version, about = "Local-first to-do list")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new tasklist project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Add a todo to the top of the list
    Add {
        /// Todo title (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },

    /// List todos
    List {
        /// Which todos to show: all, active or completed
        #[arg(long, short = 'F')]
        filter: Option<Filter>,
    },

    /// Flip a todo between active and completed
    Toggle {
        /// Todo ID
        id: TodoId,
    },

    /// Remove a todo
    Remove {
        /// Todo ID
        id: TodoId,
    },

    /// Change a todo's title (an empty title removes the todo)
    Edit {
        /// Todo ID
        id: TodoId,

        /// New title
        #[arg(allow_hyphen_values = true)]
        title: String,
    },

    /// Remove all completed todos
    ClearCompleted,

    /// Mark every todo as completed (or active with --uncheck)
    ToggleAll {
        /// Mark every todo as active instead
        #[arg(long)]
        uncheck: bool,
    },

    /// Show how many todos are left
    Count,

    /// Open the interactive terminal UI
    Tui,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    let format = cli
        .format
        .unwrap_or_else(|| config.global.default_format.into());
    let output = Output::new(format, cli.verbose);

    if !matches!(cli.command, Commands::Tui) {
        logging::init(cli.verbose, None)?;
    }

    output.verbose("tasklist starting");

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing project at: {}", path));
            let project = Project::init(&path)?;
            output.verbose_ctx(
                "init",
                &format!("Created data directory at: {}", project.data_dir().display()),
            );
            output.success(&format!(
                "Initialized tasklist project at {}",
                project.root().display()
            ));
        }

        Commands::Add { title } => todo::add_todo(&output, &title.join(" "))?,
        Commands::List { filter } => todo::list_todos(&output, filter)?,
        Commands::Toggle { id } => todo::toggle_todo(&output, id)?,
        Commands::Remove { id } => todo::remove_todo(&output, id)?,
        Commands::Edit { id, title } => todo::edit_todo(&output, id, &title)?,
        Commands::ClearCompleted => todo::clear_completed(&output)?,
        Commands::ToggleAll { uncheck } => todo::toggle_all(&output, !uncheck)?,
        Commands::Count => todo::count(&output)?,

        Commands::Tui => {
            let project = Project::open_current()?;
            logging::init(cli.verbose, Some(&project.data_dir().join("tasklist.log")))?;
            tui::run(&output, &project)?
        }
    }

    output.verbose("Command completed successfully");
    Ok(())
}
