//! `pilot` entrypoint: an inline line editor and a streaming markdown viewer.
use std::path::{Path, PathBuf};
use std::sync::Once;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

mod repl;
mod stream;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "pilot", version, about = "Line editor and streaming renderer")]
struct Args {
    /// Configuration file path (overrides discovery of `pilot.toml`).
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a markdown file incrementally, as if it arrived over a network.
    Stream {
        path: PathBuf,
        /// Chars per chunk.
        #[arg(long, default_value_t = 8)]
        chunk: usize,
        /// Write chunks verbatim instead of formatting markdown.
        #[arg(long)]
        plain: bool,
    },
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("pilot.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, "pilot.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .with_ansi(false)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global tracing subscriber already installed; drop guard so writer shuts down.
            }
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

fn main() -> Result<()> {
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();

    let args = Args::parse();
    let config = core_config::load_from(args.config.clone())?;
    info!(
        target: "runtime.startup",
        config = ?config.path,
        config_override = args.config.is_some(),
        "startup"
    );

    match args.command {
        None => repl::run(&config).context("line editor failed"),
        Some(Command::Stream { path, chunk, plain }) => {
            stream::run(&config, &path, chunk, plain)
                .with_context(|| format!("streaming {} failed", path.display()))
        }
    }
}
