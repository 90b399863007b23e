mod cli;
mod render;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use cli::{Cli, Commands};
use deckhand::api::{HttpApi, WorkspaceApi};
use deckhand::config::Config;
use deckhand::session::WorkspaceSession;
use deckhand::sync::PollExit;
use deckhand::tree::{NodeId, WorkspaceTree, search};
use deckhand::utils::paths::{get_config_path, get_logs_dir};
use std::fs;
use std::sync::Arc;

fn log_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

fn init_file_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let logs_dir = match get_logs_dir() {
        Ok(dir) => dir,
        Err(_) => return None,
    };

    if let Err(e) = fs::create_dir_all(&logs_dir) {
        eprintln!("Warning: Could not create logs directory: {}", e);
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "deckhand.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    Some(guard)
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Guard must stay alive until exit so buffered lines are flushed
    let _log_guard = if cli.verbose {
        init_stderr_logging();
        None
    } else {
        init_file_logging()
    };

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    tracing::info!(base_url = %config.api.base_url, "deckhand starting");

    run(
        cli.command.unwrap_or(Commands::Tree { search: None }),
        config,
    )
}

fn handle_init(config: &Config, force: bool) -> Result<()> {
    let path = get_config_path()?;
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    config.save()?;
    tracing::info!(path = %path.display(), "Config written");
    println!("Wrote {}", path.display());
    Ok(())
}

#[tokio::main]
async fn run(command: Commands, config: Config) -> Result<()> {
    let api = Arc::new(HttpApi::new(&config.api)?);
    let mut session = WorkspaceSession::new(api, config.sync.poll_interval());

    match command {
        Commands::Tree { search: phrase } => {
            session.load().await?;
            let tree = current_tree(&session)?;
            let visibility = phrase.as_deref().map(|phrase| search(&tree, phrase));
            if visibility.as_ref().is_some_and(|v| v.is_empty()) {
                println!("No matches");
                return Ok(());
            }
            print!("{}", render::render_tree(&tree, visibility.as_ref()));
        }
        Commands::Mark { folder_id } => {
            session.load().await?;
            let id = NodeId::new(folder_id);
            let change = session
                .workspace()
                .lock()
                .toggle_mark(&id)
                .ok_or_else(|| anyhow!("'{}' is not a folder in the workspace", id))?;

            let failures = session.persist_marks(&change).await;
            println!(
                "{} '{}' ({} folder(s) changed)",
                if change.value { "Marked" } else { "Unmarked" },
                id,
                change.changed.len()
            );
            print!("{}", render::render_tree(&current_tree(&session)?, None));
            if failures > 0 {
                bail!("{} of {} mark update(s) failed", failures, change.changed.len());
            }
        }
        Commands::Watch => {
            session.refresh().await?;
            println!("Sync requested, polling every {:?}", config.sync.poll_interval());

            let exit = tokio::select! {
                exit = session.reconciler_mut().join() => exit,
                _ = tokio::signal::ctrl_c() => None,
            };
            match exit {
                Some(PollExit::Settled { ticks }) => {
                    println!("Sync settled after {} poll(s)", ticks)
                }
                Some(PollExit::Superseded { ticks }) => {
                    println!("Tree replaced after {} poll(s)", ticks)
                }
                None => println!("Stopped"),
            }
            print!("{}", render::render_tree(&current_tree(&session)?, None));
        }
        Commands::Path { node_id } => {
            session.load().await?;
            let tree = current_tree(&session)?;
            let id = NodeId::new(node_id);
            let path = tree
                .path_from_root(&id)
                .ok_or_else(|| anyhow!("'{}' is not in the workspace", id))?;
            println!("{}", path.join("/"));
        }
        Commands::Init { force } => handle_init(&config, force)?,
    }

    Ok(())
}

fn current_tree<A: WorkspaceApi>(session: &WorkspaceSession<A>) -> Result<WorkspaceTree> {
    session
        .workspace()
        .snapshot()
        .context("Workspace tree is not available")
}
