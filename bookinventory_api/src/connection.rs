use std::ops::Deref;

use tokio_postgres::{Client, NoTls};

use crate::books_repository::BookRepositoryError;
use crate::settings::DatabaseSettings;

const DEFAULT_PORT: u16 = 5432;

/// Opens a new database connection for every request. There is no pooling,
/// each [`ScopedConnection`] owns its connection until it is dropped.
pub struct PostgresConnectionProvider {
    settings: DatabaseSettings,
}

/// Connection to the books database, closed when dropped
pub struct ScopedConnection {
    client: Client,
}

impl Deref for ScopedConnection {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl Drop for ScopedConnection {
    fn drop(&mut self) {
        // Dropping the client terminates the session and lets the connection task finish
        tracing::debug!("Releasing database connection");
    }
}

impl PostgresConnectionProvider {
    pub fn new(settings: DatabaseSettings) -> Self {
        Self { settings }
    }

    fn postgres_config(&self) -> Result<tokio_postgres::Config, BookRepositoryError> {
        let host = required(&self.settings.host, "DB_HOST")?;
        let name = required(&self.settings.name, "DB_NAME")?;
        let user = required(&self.settings.user, "DB_USER")?;
        let password = required(&self.settings.password, "DB_PASS")?;

        let mut config = tokio_postgres::Config::new();
        config
            .host(host)
            .port(self.settings.port.unwrap_or(DEFAULT_PORT))
            .dbname(name)
            .user(user)
            .password(password);
        if let Some(timeout) = self.settings.connect_timeout() {
            config.connect_timeout(timeout);
        }
        if let Some(statement_timeout_ms) = self.settings.statement_timeout_ms {
            config.options(&format!("-c statement_timeout={}", statement_timeout_ms));
        }
        Ok(config)
    }

    pub async fn connect(&self) -> Result<ScopedConnection, BookRepositoryError> {
        let config = self.postgres_config()?;
        tracing::debug!(
            "Opening database connection to {:?} database {:?}",
            config.get_hosts(),
            config.get_dbname()
        );
        let (client, connection) = config
            .connect(NoTls)
            .await
            .map_err(BookRepositoryError::ConnectionFailure)?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("Database connection error: {}", e);
            }
        });

        Ok(ScopedConnection { client })
    }
}

fn required<'a>(
    value: &'a Option<String>,
    variable: &'static str,
) -> Result<&'a str, BookRepositoryError> {
    value
        .as_deref()
        .ok_or(BookRepositoryError::ConnectionNotConfigured(variable))
}
