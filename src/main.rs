//! Hopper CLI - a quick and lightweight tmux session/project manager.

use clap::Parser;
use hopper::cli::{Cli, Commands};
use hopper::commands::{self, CommandResult};
use hopper::config::{ConfigOverrides, OutputFormat, ResolvedConfig, resolve_config};
use hopper::editor::ShellEditor;
use hopper::exec::ShellExecutor;
use hopper::selector::FzfSelector;
use hopper::service::AppService;
use hopper::session::SessionEngine;
use hopper::storage::YamlCatalog;
use hopper::tmux::{self, TmuxClient};
use std::env;
use std::process;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `debug`, `hopper=trace`).
const LOG_ENV: &str = "HOP_LOG";

fn main() {
    init_logging();

    let cli = Cli::parse();
    let command = cli.resolved_command();

    let mut overrides = ConfigOverrides::new();
    if let Some(dir) = &cli.config_dir {
        overrides = overrides.with_config_dir(dir);
    }
    if cli.json {
        overrides = overrides.with_output_format(OutputFormat::Json);
    }
    if let Commands::Edit {
        editor: Some(editor),
        ..
    } = &command
    {
        overrides = overrides.with_editor(editor);
    }

    let config = match resolve_config(&overrides) {
        Ok(config) => config,
        Err(e) => exit_with_error(&e, !cli.json),
    };
    let human = config.output_format() == OutputFormat::Human;

    match run_command(command, &config, human) {
        Ok(()) => {}
        Err(e) if e.is_cancelled() => {
            tracing::debug!("selection cancelled");
        }
        Err(e) => exit_with_error(&e, human),
    }
}

/// Log to stderr so stdout stays clean for `--json`.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_with_error(e: &hopper::Error, human: bool) -> ! {
    if human {
        eprintln!("Error: {}", e);
    } else {
        eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
    }
    process::exit(1);
}

fn run_command(
    command: Commands,
    config: &ResolvedConfig,
    human: bool,
) -> Result<(), hopper::Error> {
    let executor = ShellExecutor::new();
    let inside_tmux = tmux::is_inside_tmux(env::var("TMUX").ok().as_deref());
    tracing::debug!(
        config_dir = %config.config_dir.display(),
        tmux = config.tmux(),
        tmux_source = %config.tmux.source,
        selector = config.selector(),
        inside_tmux,
        "resolved configuration"
    );

    let service = AppService::new(
        YamlCatalog::new(&config.config_dir),
        SessionEngine::new(TmuxClient::new(executor, config.tmux()), inside_tmux),
        FzfSelector::new(executor, config.selector()),
    );

    match command {
        Commands::Open { name } => output(&commands::open(&service, name.as_deref())?, human),
        Commands::Create { name, root } => {
            let root = match root {
                Some(root) => root,
                None => env::current_dir()?,
            };
            output(
                &commands::create(&service, name.as_deref(), &root)?,
                human,
            )
        }
        Commands::Edit { name, .. } => {
            let editor = ShellEditor::new(executor, config.editor()?);
            output(
                &commands::edit(&service, name.as_deref(), &editor)?,
                human,
            )
        }
        Commands::Delete { name } => output(&commands::delete(&service, name.as_deref())?, human),
        Commands::Kill { session } => {
            output(&commands::kill(&service, session.as_deref())?, human)
        }
        Commands::List => output(&commands::list(&service)?, human),
    }
    Ok(())
}

fn output<T: CommandResult>(result: &T, human: bool) {
    if human {
        let text = result.to_human();
        if !text.is_empty() {
            println!("{}", text);
        }
    } else {
        println!("{}", result.to_json());
    }
}
