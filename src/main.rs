use clap::Parser;
use tracing_subscriber::EnvFilter;

use chantier::config::Config;
use chantier::db::{self, AppState, queries};
use chantier::models::Role;

#[derive(Parser)]
#[command(name = "chantier", about = "Project-management API server")]
struct Cli {
    /// Bind host (overrides HOST)
    #[arg(long)]
    host: Option<String>,
    /// Bind port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,
    /// SQLite database path (overrides DATABASE_PATH)
    #[arg(long)]
    database: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(database) = cli.database {
        config.database_path = database;
    }

    let pool = db::open_pool(&config.database_path)?;
    {
        let conn = pool.get()?;
        db::init_schema(&conn)?;

        // Promote the bootstrap admin so a fresh deployment can create
        // projects. The user must have signed in at least once.
        if let Some(email) = &config.bootstrap_admin_email {
            match queries::get_user_by_email(&conn, email)? {
                Some(user) if user.role != Role::Admin => {
                    queries::update_user_role(&conn, &user.id, Role::Admin)?;
                    tracing::info!(email = %email, "bootstrap admin promoted");
                }
                Some(_) => {}
                None => tracing::warn!(email = %email, "bootstrap admin has not signed in yet"),
            }
        }
    }

    let state = AppState { db: pool };
    let app = chantier::app(state);

    let addr = config.addr();
    tracing::info!(%addr, dev_mode = config.dev_mode, "listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
