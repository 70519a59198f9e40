use crate::config::{non_empty, AppConfig};
use crate::error::Error;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use std::fmt;
use std::io;
use tracing::debug;

/// PostgreSQL connection parameters, one per prompt of the startup dialogue.
#[derive(Clone, PartialEq, Eq)]
pub struct DbParams {
    pub host: String,
    pub database: String,
    pub user: String,
    pub password: String,
    pub port: u16,
}

impl fmt::Debug for DbParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbParams")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .field("port", &self.port)
            .finish()
    }
}

impl DbParams {
    /// Take each parameter from `config`, calling `ask` with a prompt for any
    /// that is missing or empty.
    pub fn resolve<F>(config: &AppConfig, mut ask: F) -> Result<Self, Error>
    where
        F: FnMut(&str) -> io::Result<String>,
    {
        let mut value_or_ask = |value: &Option<String>, prompt: &str| -> io::Result<String> {
            match non_empty(value) {
                Some(v) => Ok(v.to_string()),
                None => ask(prompt),
            }
        };

        let host = value_or_ask(&config.db_host, "Please enter host: ")?;
        let database = value_or_ask(&config.db_name, "Please enter database name: ")?;
        let user = value_or_ask(&config.db_user, "Please enter database user name: ")?;
        let password = value_or_ask(&config.db_password, "Please enter database user password: ")?;
        let port = value_or_ask(&config.db_port, "Please enter database port: ")?;

        Ok(Self {
            host,
            database,
            user,
            password,
            port: parse_port(&port)?,
        })
    }

    /// libpq keyword/value connection string with every value quoted.
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={}",
            quote_conninfo(&self.host),
            self.port,
            quote_conninfo(&self.database),
            quote_conninfo(&self.user),
            quote_conninfo(&self.password),
        )
    }
}

/// `database_url` from the config if set, otherwise a connection string built
/// from the individual parameters.
pub fn resolve_database_url<F>(config: &AppConfig, ask: F) -> Result<String, Error>
where
    F: FnMut(&str) -> io::Result<String>,
{
    if let Some(url) = non_empty(&config.database_url) {
        debug!("Using database_url from configuration");
        return Ok(url.to_string());
    }
    let params = DbParams::resolve(config, ask)?;
    debug!("Resolved database parameters: {:?}", params);
    Ok(params.connection_string())
}

pub fn establish_connection(database_url: &str) -> Result<PgConnection, Error> {
    let connection = PgConnection::establish(database_url)?;
    Ok(connection)
}

fn parse_port(value: &str) -> Result<u16, Error> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|_| Error::InvalidInput(format!("'{}' is not a valid port", value.trim())))
}

fn quote_conninfo(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_config() -> AppConfig {
        AppConfig {
            db_host: Some("db.local".to_string()),
            db_name: Some("images".to_string()),
            db_user: Some("stash".to_string()),
            db_password: Some("hunter2".to_string()),
            db_port: Some("5433".to_string()),
            ..AppConfig::default()
        }
    }

    fn never_ask(prompt: &str) -> io::Result<String> {
        panic!("unexpected prompt: {}", prompt)
    }

    #[test]
    fn test_resolve_uses_config_without_prompting() {
        let params = DbParams::resolve(&full_config(), never_ask).unwrap();
        assert_eq!(params.host, "db.local");
        assert_eq!(params.database, "images");
        assert_eq!(params.port, 5433);
    }

    #[test]
    fn test_resolve_prompts_for_missing_and_empty_values() {
        let config = AppConfig {
            db_password: Some(String::new()),
            db_port: None,
            ..full_config()
        };
        let mut prompts = Vec::new();
        let params = DbParams::resolve(&config, |prompt| {
            prompts.push(prompt.to_string());
            Ok(if prompt.contains("port") {
                "5432\n".to_string()
            } else {
                "typed-secret".to_string()
            })
        })
        .unwrap();

        assert_eq!(
            prompts,
            vec![
                "Please enter database user password: ".to_string(),
                "Please enter database port: ".to_string(),
            ]
        );
        assert_eq!(params.password, "typed-secret");
        assert_eq!(params.port, 5432);
    }

    #[test]
    fn test_resolve_rejects_bad_port() {
        let config = AppConfig {
            db_port: Some("fivefourthreetwo".to_string()),
            ..full_config()
        };
        let err = DbParams::resolve(&config, never_ask).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(msg) if msg.contains("fivefourthreetwo")));
    }

    #[test]
    fn test_connection_string_quotes_values() {
        let params = DbParams {
            password: r"it's a \secret".to_string(),
            ..DbParams::resolve(&full_config(), never_ask).unwrap()
        };
        assert_eq!(
            params.connection_string(),
            r"host='db.local' port=5433 dbname='images' user='stash' password='it\'s a \\secret'"
        );
    }

    #[test]
    fn test_debug_masks_password() {
        let params = DbParams::resolve(&full_config(), never_ask).unwrap();
        let rendered = format!("{:?}", params);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn test_database_url_takes_precedence() {
        let config = AppConfig {
            database_url: Some("postgres://u:p@h/d".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(
            resolve_database_url(&config, never_ask).unwrap(),
            "postgres://u:p@h/d"
        );
    }
}
