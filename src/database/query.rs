use serde::de::DeserializeOwned;
use snafu::ResultExt as _;
use surrealdb::engine::any::Any;
use surrealdb::opt::QueryResult;
use surrealdb::Surreal;

use super::{DatabaseDeserializeSnafu, DatabaseError, DatabaseQuerySnafu};

/// An extension trait that allows you to execute raw SQL queries. Parameters can be bound using the [Bindings::bind] method which takes any serializable data structure.
///
/// # Example
/// ```ignore
/// let card: Option<StatRecord> = database.acquire().await?
///     .sql("SELECT * FROM cards WHERE username = $username LIMIT 1")
///     .bind(("username", "neal_wu"))
///     .fetch_first()
///     .await?;
/// ```
pub trait Sql {
    fn sql(&self, query: &str) -> Bindings<'_>;
}

impl Sql for Surreal<Any> {
    fn sql(&self, query: &str) -> Bindings<'_> {
        Bindings {
            query: self.query(query),
        }
    }
}

#[derive(Debug)]
pub struct Bindings<'a> {
    query: surrealdb::method::Query<'a, Any>,
}

impl Bindings<'_> {
    pub fn bind(mut self, params: impl serde::Serialize) -> Self {
        self.query = self.query.bind(params);
        self
    }

    /// Execute the query and return a [surrealdb::Response] which is SurrealDB's way to represent a list of statements returned from the database.
    pub async fn execute(self) -> Result<surrealdb::Response, DatabaseError> {
        let response = self.query.await.context(DatabaseQuerySnafu)?;
        tracing::trace!(?response, "executed query");
        Ok(response)
    }

    /// Execute the query and return the first result as a deserialized value.
    pub async fn fetch_first<T: DeserializeOwned>(self) -> Result<T, DatabaseError>
    where
        usize: QueryResult<T>,
    {
        let mut statements = self.execute().await?;
        statements.take::<T>(0).context(DatabaseDeserializeSnafu)
    }
}
