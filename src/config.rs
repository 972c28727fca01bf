use std::path::PathBuf;

use crate::authz::PermissionTables;
use crate::errors::AppError;
use crate::jwt::JwtConfig;

const DEFAULT_PORT: u16 = 8000;

/// Service configuration, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub jwt: JwtConfig,
    /// JSON tables file; built-in tables are used when unset.
    pub tables_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let port = match std::env::var("APP_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|_| AppError::configuration("APP_PORT must be a valid port number"))?,
            Err(_) => DEFAULT_PORT,
        };

        let tables_path = std::env::var("PERMISSION_TABLES")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            port,
            jwt: JwtConfig::from_env()?,
            tables_path,
        })
    }

    pub fn load_tables(&self) -> Result<PermissionTables, AppError> {
        match &self.tables_path {
            Some(path) => Ok(PermissionTables::from_file(path)?),
            None => {
                tracing::info!("using built-in permission tables");
                Ok(PermissionTables::builtin())
            }
        }
    }
}

/// Load `.env` from the working directory, falling back to the crate root.
pub fn load_env() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let crate_env = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    let _ = dotenvy::from_path(crate_env);
}
