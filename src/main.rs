use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::Notify;

use filewalker::config::{AppState, Config, Overrides};
use filewalker::walker::ServeRoot;
use filewalker::{logger, server};

/// Browse a directory over HTTP and download its files
#[derive(Debug, Parser)]
#[command(name = "filewalker", version)]
struct Cli {
    /// Directory to serve (overrides `serve.root`)
    root: Option<String>,

    /// Configuration file, extension optional
    #[arg(short, long, default_value = "filewalker")]
    config: String,

    /// Address to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Tokio worker threads
    #[arg(long)]
    workers: Option<usize>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            root: self.root.clone(),
            host: self.host.clone(),
            port: self.port,
            workers: self.workers,
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[FATAL] {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = Config::load_from(&cli.config, &cli.overrides())?;

    let Some(root_arg) = cfg.serve.root.clone() else {
        return Err("no directory to serve: pass ROOT or set serve.root".into());
    };
    let root = ServeRoot::new(&root_arg)?;

    logger::init(&cfg)?;

    // Worker threads from config, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg, root))
}

async fn async_main(cfg: Config, root: ServeRoot) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr, cfg.performance.backlog)?;

    logger::log_server_start(&addr, root.path(), &cfg);

    let state = Arc::new(AppState::new(cfg, root));
    let shutdown = Arc::new(Notify::new());
    server::signal::spawn_shutdown_listener(Arc::clone(&shutdown));

    server::run(listener, state, shutdown).await?;
    Ok(())
}
