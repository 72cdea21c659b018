use clap::Parser;
use pagesmith_workspace::{router, AppState, Config, DirectorySink, Workspace};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

/// Pagesmith page storage and publishing server
#[derive(Parser, Debug)]
#[command(name = "pagesmith-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Project directory containing pagesmith.config.json
    #[arg(default_value = ".")]
    root_dir: PathBuf,

    /// Address to bind (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory to write published pages to (overrides config)
    #[arg(long)]
    publish_dir: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config =
        Config::load(&args.root_dir)?.with_overrides(args.host, args.port, args.publish_dir);

    let publish_dir = config.get_publish_dir(&args.root_dir);
    std::fs::create_dir_all(&publish_dir)?;

    let sink = DirectorySink::new(&publish_dir, config.public_base_url());
    let workspace = Arc::new(RwLock::new(Workspace::in_memory(Arc::new(sink))));
    let state = AppState::new(workspace, config.default_account_id.clone());

    let app = router(state).nest_service("/published", ServeDir::new(&publish_dir));

    let address = config.address();
    tracing::info!(
        address = %address,
        publish_dir = %publish_dir.display(),
        public_base_url = %config.public_base_url(),
        default_account = %config.default_account_id,
        "starting pagesmith server"
    );

    let listener = tokio::net::TcpListener::bind(&address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
