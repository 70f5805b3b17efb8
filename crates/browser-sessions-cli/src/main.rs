//! Command-line entry point.
//!
//! `--session <NAME>` launches a stored session; `--webui` starts the HTML
//! form interface; no mode flag prints help.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use browser_sessions_launcher::{LaunchError, LauncherConfig, SessionLauncher};
use browser_sessions_store::SqliteStore;
use browser_sessions_web::create_router;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "browser-sessions")]
#[command(about = "Manage and launch named browser sessions")]
#[command(version)]
struct Cli {
    /// Name of the browser session to launch (e.g. --session home).
    #[arg(long, value_name = "NAME")]
    session: Option<String>,

    /// Launch with a fresh profile (clears existing profile data).
    #[arg(long)]
    fresh: bool,

    /// Start the web form interface.
    #[arg(long)]
    webui: bool,

    /// Web interface port.
    #[arg(long, env = "BROWSER_SESSIONS_PORT", default_value_t = 5000)]
    port: u16,

    /// SQLite database file.
    #[arg(long, env = "BROWSER_SESSIONS_DB", default_value = "sessions.db")]
    db: PathBuf,

    /// Directory holding profiles and generated extension bundles.
    #[arg(long, env = "BROWSER_SESSIONS_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    /// Browser executable or command line to launch.
    #[arg(long, env = "BROWSER_SESSIONS_BROWSER", value_name = "CMD")]
    browser: Option<String>,

    /// Increase verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.session.is_none() && !cli.webui {
        Cli::command().print_help()?;
        return Ok(());
    }

    let store = Arc::new(
        SqliteStore::connect(&cli.db)
            .await
            .with_context(|| format!("open database {}", cli.db.display()))?,
    );
    let launcher = Arc::new(SessionLauncher::new(
        Arc::clone(&store),
        LauncherConfig {
            data_dir: cli.data_dir.clone(),
            browser: cli.browser.clone(),
        },
    ));

    if let Some(name) = cli.session.as_deref() {
        launch(&launcher, name, cli.fresh).await
    } else {
        serve(store, launcher, cli.port).await
    }
}

async fn launch(
    launcher: &SessionLauncher<SqliteStore>,
    name: &str,
    fresh: bool,
) -> anyhow::Result<()> {
    match launcher.launch(name, fresh).await {
        Ok(summary) => {
            println!(
                "Launched session '{name}' with profile '{}'",
                summary.profile_dir.display()
            );
            println!("Opened tabs: {:?}", summary.tabs);
            if !summary.credential_websites.is_empty() {
                println!("Loaded credentials for: {:?}", summary.credential_websites);
            }
            Ok(())
        }
        // Spawn problems are reported without a failing exit code.
        Err(err @ (LaunchError::Spawn { .. } | LaunchError::BrowserNotFound)) => {
            eprintln!("Failed to launch browser: {err}");
            Ok(())
        }
        Err(err) => Err(err).with_context(|| format!("launch session '{name}'")),
    }
}

async fn serve(
    store: Arc<SqliteStore>,
    launcher: Arc<SessionLauncher<SqliteStore>>,
    port: u16,
) -> anyhow::Result<()> {
    let app = create_router(store, launcher);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("web interface listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    axum::serve(listener, app)
        .await
        .context("serve web interface")?;
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
