use std::env;

use carebook_server::ServerBuilder;
use carebook_server::config::loader::load_config;

/// How the configuration path was determined.
#[derive(Debug, Clone, Copy)]
enum ConfigSource {
    /// From --config CLI argument
    CliArgument,
    /// From CAREBOOK_CONFIG environment variable
    EnvironmentVariable,
    /// Default path (carebook.toml)
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CliArgument => write!(f, "CLI argument (--config)"),
            Self::EnvironmentVariable => write!(f, "environment variable (CAREBOOK_CONFIG)"),
            Self::Default => write!(f, "default"),
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env if present; optional for local development.
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    carebook_server::observability::init_tracing();

    let (config_path, source) = resolve_config_path();

    let cfg = match load_config(Some(&config_path)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(
        path = %config_path,
        source = %source,
        "Configuration loaded"
    );

    carebook_server::observability::apply_logging_level(&cfg.logging.level);

    if let Err(e) = std::fs::create_dir_all(&cfg.media.dir) {
        eprintln!("Media directory error ({}): {e}", cfg.media.dir);
        std::process::exit(2);
    }

    let pg_config = cfg.storage.postgres.to_postgres_config();
    let pool = match carebook_db_postgres::create_pool(&pg_config).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Database connection failed: {e}");
            std::process::exit(2);
        }
    };

    if pg_config.run_migrations {
        if let Err(e) = carebook_db_postgres::migrations::run(&pool).await {
            eprintln!("Migration failed: {e}");
            std::process::exit(2);
        }
    }

    let server = ServerBuilder::new().with_config(cfg).build(pool);

    if let Err(err) = server.run().await {
        eprintln!("Server error: {err}");
    }
}

/// Resolve the configuration file path.
///
/// Priority order:
/// 1. CLI argument: --config <path>
/// 2. Environment variable: CAREBOOK_CONFIG
/// 3. Default: carebook.toml
fn resolve_config_path() -> (String, ConfigSource) {
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            if let Some(path) = args.next() {
                return (path, ConfigSource::CliArgument);
            }
        }
    }

    if let Ok(path) = env::var("CAREBOOK_CONFIG") {
        if !path.is_empty() {
            return (path, ConfigSource::EnvironmentVariable);
        }
    }

    ("carebook.toml".to_string(), ConfigSource::Default)
}
