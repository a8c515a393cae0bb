use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use snafu::{Location, OptionExt as _, ResultExt as _, Snafu};
use surrealdb::engine::any::Any;
use surrealdb::opt::auth;
use surrealdb::Surreal;
use tokio::sync::OnceCell;

/// Helper trait for executing arbitrary SurrealQL queries.
pub mod query;

/// Macros for defining table methods.
pub mod macros;

pub use query::{Bindings, Sql};

pub type Result<T, E = DatabaseError> = std::result::Result<T, E>;

const SETUP: &str = include_str!("../schema.surrealql");

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DatabaseError {
    #[snafu(display("cannot connect to the database `{endpoint}`: {source}"))]
    DatabaseConnection {
        endpoint: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("cannot sign in to the database `{endpoint}` as `{username}`: {source}"))]
    SignIn {
        endpoint: String,
        username: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("cannot use namespace `{namespace}` and database `{database}`: {source}"))]
    SelectDatabase {
        namespace: String,
        database: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("`{missing}` must be set together with `{present}`"))]
    IncompleteCredentials {
        present: &'static str,
        missing: &'static str,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("failed to apply the database schema: {source}"))]
    Setup {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("failed to query the database: {source}"))]
    DatabaseQuery {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("failed to deserialize the database response: {source}"))]
    DatabaseDeserialize {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("failed to parse the database response, response is empty"))]
    EmptyQuery {
        #[snafu(implicit)]
        location: Location,
    },
}

/// A record type that lives in its own table.
pub trait Table {
    /// Returns the name of the table associated with the record.
    fn table() -> &'static str;
}

/// Represents a type that can be used to establish a connection to a database.
pub trait Connection {
    /// The type of the connected database.
    type Database;

    /// Establishes a connection to the database.
    fn connect(&self) -> impl Future<Output = Result<Self::Database>> + Send;
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(rename = "surreal_url", default = "default_endpoint")]
    pub endpoint: String,
    #[serde(rename = "surreal_namespace", default = "default_namespace")]
    pub namespace: String,
    #[serde(rename = "surreal_database", default = "default_database")]
    pub database: String,
    #[serde(rename = "surreal_username", default)]
    pub username: Option<String>,
    #[serde(rename = "surreal_password", default)]
    pub password: Option<String>,
}

fn default_endpoint() -> String {
    "mem://".to_string()
}

fn default_namespace() -> String {
    "leetcode".to_string()
}

fn default_database() -> String {
    "leetcode-cards".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            namespace: default_namespace(),
            database: default_database(),
            username: None,
            password: None,
        }
    }
}

impl DatabaseConfig {
    /// Database-level sign-in credentials, if any.
    ///
    /// Username and password come as a pair: setting only one of them is an error rather than an anonymous connection.
    pub fn credentials(&self) -> Result<Option<auth::Database<'_>>> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Ok(Some(auth::Database {
                namespace: &self.namespace,
                database: &self.database,
                username,
                password,
            })),
            (None, None) => Ok(None),
            (Some(_), None) => IncompleteCredentialsSnafu {
                present: "SURREAL_USERNAME",
                missing: "SURREAL_PASSWORD",
            }
            .fail(),
            (None, Some(_)) => IncompleteCredentialsSnafu {
                present: "SURREAL_PASSWORD",
                missing: "SURREAL_USERNAME",
            }
            .fail(),
        }
    }
}

impl Connection for DatabaseConfig {
    type Database = Surreal<Any>;

    /// Connects to the configured endpoint, signs in when credentials are present, and applies the schema.
    async fn connect(&self) -> Result<Self::Database> {
        let credentials = self.credentials()?;

        tracing::info!(
            endpoint = %self.endpoint,
            namespace = %self.namespace,
            database = %self.database,
            "connecting to the database"
        );

        let db = surrealdb::engine::any::connect(self.endpoint.as_str())
            .await
            .context(DatabaseConnectionSnafu {
                endpoint: &self.endpoint,
            })?;

        if let Some(credentials) = credentials {
            let username = credentials.username;
            db.signin(credentials).await.context(SignInSnafu {
                endpoint: &self.endpoint,
                username,
            })?;
        }

        db.use_ns(&self.namespace)
            .use_db(&self.database)
            .await
            .context(SelectDatabaseSnafu {
                namespace: &self.namespace,
                database: &self.database,
            })?;

        db.query(SETUP)
            .await
            .and_then(|response| response.check())
            .context(SetupSnafu)?;

        Ok(db)
    }
}

/// A shared handle to the document store.
///
/// The connection is established on the first [Database::acquire] and reused by every clone of the handle afterwards.
/// A failed attempt leaves the handle unconnected so the next caller tries again.
#[derive(Debug, Clone)]
pub struct Database {
    config: Arc<DatabaseConfig>,
    connection: Arc<OnceCell<Surreal<Any>>>,
}

impl Database {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config: Arc::new(config),
            connection: Arc::new(OnceCell::new()),
        }
    }

    /// A fresh in-memory store.
    pub fn memory() -> Self {
        Self::new(DatabaseConfig::default())
    }

    pub fn is_connected(&self) -> bool {
        self.connection.initialized()
    }

    pub async fn acquire(&self) -> Result<&Surreal<Any>> {
        self.connection
            .get_or_try_init(|| self.config.connect())
            .await
    }

    /// Insert a new record into the table of `T` and return what the database stored.
    pub async fn insert<T>(&self, record: &T) -> Result<T>
    where
        T: Table + Serialize + DeserializeOwned,
    {
        let mut created: Vec<T> = self
            .acquire()
            .await?
            .create(T::table())
            .content(record)
            .await
            .context(DatabaseQuerySnafu)?;

        created.pop().context(EmptyQuerySnafu)
    }
}
