use clap::Parser;
use ledgerd::{
    api::{build_router, ApiState},
    storage::{create_pool, run_migrations},
    AppConfig, Result, APP_NAME, VERSION,
};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "ledgerd", version, about = "Personal finance tracking HTTP API")]
struct Cli {
    /// Bind host override
    #[arg(long, env = "LEDGERD_SERVER__HOST")]
    host: Option<String>,

    /// Bind port override
    #[arg(long, env = "LEDGERD_SERVER__PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present; config is read from the environment afterwards.
    if let Err(e) = dotenvy::dotenv() {
        if !e.to_string().contains("not found") {
            eprintln!("Warning: error loading .env file: {}", e);
        }
    }

    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    ledgerd::init_tracing(&config.observability)?;

    info!(app_name = APP_NAME, version = VERSION, "Starting ledgerd API");

    let pool = create_pool(&config.database).await?;
    if config.database.auto_migrate {
        run_migrations(&pool).await?;
    }

    let state = ApiState::with_sqlx(pool, &config);
    let router = build_router(state);

    ledgerd::api::server::serve(&config.server, router).await
}
