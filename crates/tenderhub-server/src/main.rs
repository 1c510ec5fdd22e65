//! TenderHub Server — composition root.
//!
//! Reads configuration from flags and the environment, sets up logging,
//! connects to SurrealDB, applies migrations, wires the lifecycle
//! services, and runs until Ctrl-C.

use clap::Parser;
use tenderhub_db::{DbConfig, DbCredentials, DbManager};
use tenderhub_engine::EngineConfig;
use tenderhub_server::{ServerError, ServerResult, Services};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// TenderHub CLI
#[derive(Parser)]
#[command(name = "tenderhub")]
#[command(about = "TenderHub - tender and bid lifecycle service", long_about = None)]
#[command(version)]
struct Cli {
    /// SurrealDB endpoint (`ws://host:port`, `mem://`)
    #[arg(long, env = "TENDERHUB_DB_URL", default_value = "ws://127.0.0.1:8000")]
    db_url: String,

    /// SurrealDB namespace
    #[arg(long, env = "TENDERHUB_DB_NAMESPACE", default_value = "tenderhub")]
    db_namespace: String,

    /// SurrealDB database
    #[arg(long, env = "TENDERHUB_DB_DATABASE", default_value = "main")]
    db_database: String,

    /// Root username; omit for embedded engines
    #[arg(long, env = "TENDERHUB_DB_USER")]
    db_user: Option<String>,

    /// Root password
    #[arg(long, env = "TENDERHUB_DB_PASSWORD", requires = "db_user")]
    db_password: Option<String>,

    /// Page size for list requests that give none
    #[arg(long, env = "TENDERHUB_PAGE_LIMIT", default_value_t = 5)]
    page_limit: u64,

    /// Largest page size a list request may ask for
    #[arg(long, env = "TENDERHUB_MAX_PAGE_LIMIT", default_value_t = 100)]
    max_page_limit: u64,

    /// Log filter directive, overridden by RUST_LOG
    #[arg(long, env = "TENDERHUB_LOG_LEVEL", default_value = "tenderhub=info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "TENDERHUB_LOG_JSON")]
    json: bool,
}

impl Cli {
    fn db_config(&self) -> DbConfig {
        DbConfig {
            url: self.db_url.clone(),
            namespace: self.db_namespace.clone(),
            database: self.db_database.clone(),
            credentials: self.db_user.clone().map(|username| DbCredentials {
                username,
                password: self.db_password.clone().unwrap_or_default(),
            }),
        }
    }

    fn engine_config(&self) -> ServerResult<EngineConfig> {
        if self.page_limit == 0 || self.page_limit > self.max_page_limit {
            return Err(ServerError::Config(format!(
                "page limit {} must be between 1 and {}",
                self.page_limit, self.max_page_limit
            )));
        }
        Ok(EngineConfig {
            default_page_limit: self.page_limit,
            max_page_limit: self.max_page_limit,
        })
    }
}

fn init_tracing(cli: &Cli) -> ServerResult<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&cli.log_level)
            .map_err(|e| ServerError::Config(format!("invalid log level: {e}")))?,
    };

    if cli.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ServerResult<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    info!("Starting TenderHub server...");

    let engine_config = cli.engine_config()?;
    let db = DbManager::connect(&cli.db_config()).await?;
    db.migrate().await?;

    let _services = Services::new(db.client(), engine_config);
    info!("Lifecycle services ready");

    tokio::signal::ctrl_c().await?;

    info!("TenderHub server stopped.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_server() {
        let cli = Cli::parse_from(["tenderhub"]);
        let db = cli.db_config();
        assert_eq!(db.url, "ws://127.0.0.1:8000");
        assert!(db.credentials.is_none());
        assert_eq!(cli.engine_config().unwrap().default_page_limit, 5);
    }

    #[test]
    fn credentials_follow_user_flag() {
        let cli = Cli::parse_from([
            "tenderhub",
            "--db-user",
            "root",
            "--db-password",
            "secret",
        ]);
        let credentials = cli.db_config().credentials.unwrap();
        assert_eq!(credentials.username, "root");
        assert_eq!(credentials.password, "secret");
    }

    #[test]
    fn page_limit_must_fit_maximum() {
        let cli = Cli::parse_from(["tenderhub", "--page-limit", "500"]);
        assert!(matches!(cli.engine_config(), Err(ServerError::Config(_))));
    }
}
