// region:    --- Imports
use crate::error::AppError;
use std::str::FromStr;

// endregion: --- Imports

// region:    --- Config
/// 서버 설정 (환경 변수 및 .env)
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// 없으면 메모리 저장소로 실행
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub session_expiry_hours: i64,
    pub session_cleanup_interval_secs: u64,
    pub seed_categories: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            database_url: None,
            db_max_connections: 5,
            session_expiry_hours: 24,
            session_cleanup_interval_secs: 3600,
            seed_categories: Vec::new(),
        }
    }
}

impl Config {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 키 조회 함수로부터 설정 구성
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            server_host: lookup("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_or(&lookup, "SERVER_PORT", defaults.server_port)?,
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            session_expiry_hours: parse_or(
                &lookup,
                "SESSION_EXPIRY_HOURS",
                defaults.session_expiry_hours,
            )?,
            session_cleanup_interval_secs: parse_or(
                &lookup,
                "SESSION_CLEANUP_INTERVAL_SECS",
                defaults.session_cleanup_interval_secs,
            )?,
            seed_categories: lookup("SEED_CATEGORIES")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}
// endregion: --- Config

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.server_address(), "0.0.0.0:3000");
        assert!(config.database_url.is_none());
        assert_eq!(config.session_expiry_hours, 24);
        assert!(config.seed_categories.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("SERVER_PORT", "8080"),
            ("DATABASE_URL", "postgres://localhost/auctions"),
            ("SEED_CATEGORIES", "Fashion, Toys,,Electronics "),
        ]))
        .unwrap();
        assert_eq!(config.server_port, 8080);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/auctions")
        );
        assert_eq!(config.seed_categories, vec!["Fashion", "Toys", "Electronics"]);
    }

    #[test]
    fn test_invalid_port() {
        let result = Config::from_lookup(lookup_from(&[("SERVER_PORT", "http")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
// endregion: --- Tests
