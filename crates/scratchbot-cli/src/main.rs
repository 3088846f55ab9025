use std::fs::OpenOptions;
use std::io::BufRead;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use log::LevelFilter;
use scratchbot_cli::history_commands;
use scratchbot_cli::interactive::{run_chat, run_task};
use scratchbot_cli::settings::{load_config, renderer, Overrides};
use scratchbot_core::SessionStore;
use scratchbot_term::Renderer;

const LOG_FILE: &str = "scratchbot.log";

#[derive(Debug, Clone)]
enum RunMode {
    Interactive,
    Task,
    Utility,
}

#[derive(Parser, Debug)]
#[clap(
    name = "Scratchbot",
    author,
    version = "0.1.0",
    about = "Scratch programming helper powered by Google Gemini"
)]
struct Cli {
    #[clap(subcommand)]
    command: Option<Commands>,

    #[clap(long, short, help = "Path to a YAML configuration file")]
    config: Option<PathBuf>,

    #[clap(long, help = "Gemini model to use, e.g. gemini-1.5-flash")]
    model: Option<String>,

    #[clap(long, help = "Where chat history is stored")]
    history_file: Option<PathBuf>,

    #[clap(long, help = "Seconds to wait for an answer before giving up")]
    timeout: Option<u64>,

    #[clap(long, short, default_value = "info")]
    log_level: String,

    #[clap(long, help = "Disable colored output")]
    no_color: bool,

    #[clap(long, help = "Ask a single question and print the answer to stdout")]
    task: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive chat (default command)
    Chat {
        #[clap(long, help = "Resume a session by list number, id or id prefix")]
        session: Option<String>,

        #[clap(long, help = "Start in a fresh session")]
        new: bool,
    },
    /// Print the block category and colors for lines of Scratch code
    Classify {
        /// Lines to classify; read from stdin when empty
        lines: Vec<String>,
    },
    /// Manage saved chats
    Sessions {
        #[clap(subcommand)]
        action: SessionCommands,
    },
}

#[derive(Subcommand, Debug)]
enum SessionCommands {
    /// List saved chats, newest first
    List,
    /// Print one chat
    Show { id: String },
    /// Delete one chat
    Delete {
        id: String,

        #[clap(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mode = match (&cli.command, &cli.task) {
        (Some(Commands::Chat { .. }), Some(_)) => {
            anyhow::bail!("Conflicting mode flags specified. --task cannot be combined with chat.");
        }
        (None, Some(_)) => RunMode::Task,
        (Some(Commands::Chat { .. }), None) | (None, None) => RunMode::Interactive,
        (Some(_), _) => RunMode::Utility,
    };

    let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Info);
    match mode {
        RunMode::Interactive | RunMode::Task => {
            // Keep stdout for the conversation
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(LOG_FILE)?;

            env_logger::Builder::new()
                .filter_level(log_level_filter)
                .target(env_logger::Target::Pipe(Box::new(log_file)))
                .init();
        }
        RunMode::Utility => {
            env_logger::Builder::new()
                .filter_level(log_level_filter)
                .init();
        }
    }

    let renderer = renderer(cli.no_color);

    if let Some(Commands::Classify { lines }) = &cli.command {
        return classify(lines, &renderer);
    }

    let overrides = Overrides {
        model: cli.model.clone(),
        history_file: cli.history_file.clone(),
        timeout_secs: cli.timeout,
    };
    let config = load_config(cli.config.as_deref(), &overrides).await?;

    match (cli.command, mode) {
        (_, RunMode::Task) => {
            let question = cli.task.unwrap_or_default();
            run_task(&config, renderer, &question).await
        }
        (Some(Commands::Chat { session, new }), _) => {
            run_chat(&config, renderer, session, new).await
        }
        (Some(Commands::Sessions { action }), _) => {
            let store = SessionStore::new(config.history_path()?);
            handle_sessions_command(action, &store, &renderer).await
        }
        _ => run_chat(&config, renderer, None, false).await,
    }
}

fn classify(lines: &[String], renderer: &Renderer) -> Result<()> {
    if !lines.is_empty() {
        for line in lines {
            println!("{}", renderer.render_classification(line));
        }
        return Ok(());
    }

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        println!("{}", renderer.render_classification(&line));
    }
    Ok(())
}

async fn handle_sessions_command(
    action: SessionCommands,
    store: &SessionStore,
    renderer: &Renderer,
) -> Result<()> {
    match action {
        SessionCommands::List => history_commands::list(store).await?,
        SessionCommands::Show { id } => history_commands::show(store, &id, renderer).await?,
        SessionCommands::Delete { id, yes } => {
            let removed = history_commands::delete(store, &id, |session| {
                if yes {
                    return Ok(true);
                }
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete \"{}\"?", session.title))
                    .default(false)
                    .interact()?;
                Ok(confirmed)
            })
            .await?;

            match removed {
                Some(session) => println!("Deleted \"{}\".", session.title),
                None => println!("Nothing deleted."),
            }
        }
    }

    Ok(())
}
