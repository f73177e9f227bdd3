use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Browse and filter a todo.txt file")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the todo.txt file (overrides general.file from the config)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Path to config file (default: ~/.config/todo/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Open the interactive list windows (default in terminal)
    Tui {
        /// Only show tasks with all of these tags (+project, @context)
        tags: Vec<String>,
    },

    /// Print tasks with their line index
    List {
        /// Only show tasks with all of these tags (+project, @context)
        tags: Vec<String>,

        /// Output format: text, json
        #[arg(short = 'o', long, default_value = "text")]
        format: String,
    },

    /// Append a task to the file
    Add {
        /// Task text, e.g. "(A) Call mom +Family @phone due:2013-01-05"
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Mark tasks done by index
    Done {
        /// 0-based task indices as shown by `list`
        #[arg(required = true)]
        indices: Vec<usize>,
    },

    /// Print the active config (resolved, with defaults)
    Config,

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
