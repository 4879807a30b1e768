use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Legacy JSON log imported at start-up into an empty store.
    pub legacy_import_path: Option<PathBuf>,
    /// Exposes destructive development routes such as `/api/dev/reset`.
    pub enable_dev_routes: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:gymlog.db?mode=rwc".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .unwrap_or(3001),
            legacy_import_path: env::var("LEGACY_IMPORT_PATH")
                .ok()
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            enable_dev_routes: env::var("ENABLE_DEV_ROUTES")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(parse_flag(" YES "));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("maybe"));
    }

    #[test]
    fn test_server_addr() {
        let config = Config {
            database_url: ":memory:".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3001,
            legacy_import_path: None,
            enable_dev_routes: false,
        };
        assert_eq!(config.server_addr(), "0.0.0.0:3001");
    }
}
