use std::path::Path;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use serde::Serialize;
use tracing::info;

mod cli;
mod config;
mod error;
mod todotxt;
mod tui;

use cli::{Cli, Command};
use config::Config;
use error::{Result, TodoError};
use todotxt::parse::parse_priority;
use todotxt::{check_tags, Clock, SystemClock, Task, TodoFile, DATE_FORMAT};

fn setup_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    info!("Starting todo v{}", env!("CARGO_PKG_VERSION"));

    let config = match Config::load(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::from(1);
        }
    };

    let path = cli.file.clone().unwrap_or_else(|| config.todo_path());

    // TTY = windows, non-TTY = plain listing
    let is_tty = atty::is(atty::Stream::Stdout);
    let command = cli.command.unwrap_or_else(|| {
        if is_tty {
            Command::Tui { tags: Vec::new() }
        } else {
            Command::List {
                tags: Vec::new(),
                format: "text".into(),
            }
        }
    });

    match run(command, &path, config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn run(command: Command, path: &Path, config: Config) -> Result<()> {
    match command {
        Command::Tui { tags } => {
            check_tags(&tags)?;
            let file = TodoFile::load(path)?;
            tui::run(path.to_path_buf(), file, tags, config)?;
        }
        Command::List { tags, format } => {
            check_tags(&tags)?;
            let file = TodoFile::load(path)?;
            let matching = file.filter(&tags);

            match format.as_str() {
                "json" => {
                    let listed: Vec<ListedTask> = matching
                        .iter()
                        .map(|(index, task)| ListedTask::new(*index, task))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&listed)?);
                }
                _ => {
                    for (index, task) in matching {
                        println!("{:5}. {}", index, task);
                    }
                }
            }
        }
        Command::Add { text } => {
            let mut file = TodoFile::load(path)?;
            let text = text.join(" ");
            let task = if config.general.date_on_add {
                with_creation_date(&text, &SystemClock)
            } else {
                Task::new(text)
            };
            let index = file.push(task);
            file.save(path)?;
            if let Some(task) = file.get(index) {
                println!("{:5}. {}", index, task);
            }
        }
        Command::Done { indices } => {
            let mut file = TodoFile::load(path)?;
            for index in indices {
                let task = file.complete(index, &SystemClock)?;
                println!("{:5}. {}", index, task);
            }
            file.save(path)?;
        }
        Command::Config => {
            let config_toml = toml::to_string_pretty(&config)
                .map_err(|e| TodoError::Config(format!("Failed to serialize config: {}", e)))?;
            println!("{}", config_toml);
        }
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Builds a new task, inserting today's date as the creation date after any
/// priority unless the text already has a creation date or is done.
fn with_creation_date(text: &str, clock: &impl Clock) -> Task {
    let task = Task::new(text);
    if task.is_done() || task.creation_date().is_some() {
        return task;
    }

    let today = clock.today().format(DATE_FORMAT).to_string();
    let (priority, rest) = parse_priority(text);
    let head = match priority {
        Some(p) => format!("{} {}", p, today),
        None => today,
    };
    if rest.is_empty() {
        Task::new(head)
    } else {
        Task::new(format!("{} {}", head, rest))
    }
}

#[derive(Serialize)]
struct ListedTask<'a> {
    index: usize,
    text: String,
    done: bool,
    priority: Option<char>,
    creation_date: Option<chrono::NaiveDate>,
    completion_date: Option<chrono::NaiveDate>,
    projects: Vec<&'a str>,
    contexts: Vec<&'a str>,
    keywords: std::collections::BTreeMap<String, String>,
}

impl<'a> ListedTask<'a> {
    fn new(index: usize, task: &'a Task) -> Self {
        Self {
            index,
            text: task.to_string(),
            done: task.is_done(),
            priority: task.priority().map(|p| p.letter()),
            creation_date: task.creation_date(),
            completion_date: task.completion_date(),
            projects: task.projects(),
            contexts: task.contexts(),
            keywords: task.keywords().into_iter().collect(),
        }
    }
}
