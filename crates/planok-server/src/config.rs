//! Server configuration read from Shuttle secrets

use shuttle_runtime::SecretStore;
use uuid::Uuid;

pub const DEFAULT_ACCESS_TOKEN_TTL_SECS: i64 = 900; // 15 minutes
pub const DEFAULT_REFRESH_TOKEN_TTL_SECS: i64 = 604800; // 7 days

/// Administrator account created at startup when missing
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
    pub rut: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl AppConfig {
    pub fn from_secrets(secrets: &SecretStore) -> Self {
        let jwt_secret = secrets.get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("⚠️  No JWT_SECRET set - using a per-process secret, tokens will not survive restarts");
            random_secret()
        });

        let bootstrap_admin = match (
            secrets.get("ADMIN_EMAIL"),
            secrets.get("ADMIN_PASSWORD"),
            secrets.get("ADMIN_RUT"),
        ) {
            (Some(email), Some(password), Some(rut)) => Some(BootstrapAdmin {
                email,
                password,
                rut,
            }),
            _ => None,
        };

        Self {
            jwt_secret,
            access_token_ttl_secs: parse_secs(secrets.get("ACCESS_TOKEN_TTL_SECS"))
                .unwrap_or(DEFAULT_ACCESS_TOKEN_TTL_SECS),
            refresh_token_ttl_secs: parse_secs(secrets.get("REFRESH_TOKEN_TTL_SECS"))
                .unwrap_or(DEFAULT_REFRESH_TOKEN_TTL_SECS),
            bootstrap_admin,
        }
    }

    /// Defaults with the given signing secret
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            access_token_ttl_secs: DEFAULT_ACCESS_TOKEN_TTL_SECS,
            refresh_token_ttl_secs: DEFAULT_REFRESH_TOKEN_TTL_SECS,
            bootstrap_admin: None,
        }
    }
}

fn parse_secs(value: Option<String>) -> Option<i64> {
    value
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|secs| *secs > 0)
}

fn random_secret() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_secs() {
        assert_eq!(parse_secs(Some("60".to_string())), Some(60));
        assert_eq!(parse_secs(Some(" 60 ".to_string())), Some(60));
        assert_eq!(parse_secs(Some("0".to_string())), None);
        assert_eq!(parse_secs(Some("abc".to_string())), None);
        assert_eq!(parse_secs(None), None);
    }

    #[test]
    fn test_random_secret_differs() {
        assert_ne!(random_secret(), random_secret());
        assert_eq!(random_secret().len(), 64);
    }

    #[test]
    fn test_with_secret_defaults() {
        let config = AppConfig::with_secret("s3cret");
        assert_eq!(config.access_token_ttl_secs, 900);
        assert_eq!(config.refresh_token_ttl_secs, 604800);
        assert!(config.bootstrap_admin.is_none());
    }
}
