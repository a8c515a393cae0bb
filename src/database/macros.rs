/// Binds a record type to its table.
///
/// ```ignore
/// define_table!("cards" : StatRecord);
/// ```
#[macro_export]
macro_rules! define_table {
    ($table:literal : $model:ty) => {
        impl $crate::database::Table for $model {
            fn table() -> &'static str {
                $table
            }
        }
    };
}

/// Defines a method to query the database using SQL.
///
/// # Syntax
/// ```ignore
/// [Base Type] > method_name(...arguments) > [Output Type] where "sql query"
/// ```
/// Every argument is bound to the query under its own name. The generated method takes the [Database](crate::database::Database) as its last argument.
///
/// # Example
///
/// ```ignore
/// define_relation! {
///     StatRecord > by_username(username: &str) > Option<StatRecord>
///         where "SELECT * FROM cards WHERE username = $username LIMIT 1"
/// }
///
/// let card = StatRecord::by_username("neal_wu", &db).await?;
/// ```
#[macro_export]
macro_rules! define_relation {
    ($model:ty > $relation:ident ($($binding:ident : $binding_type:ty),*) > $export:ty where $query:literal) => {
        impl $model {
            #[::tracing::instrument(skip(db))]
            pub async fn $relation($($binding : $binding_type ,)* db: &$crate::database::Database) -> $crate::database::Result<$export> {
                use $crate::database::Sql as _;
                db.acquire()
                    .await?
                    .sql($query)
                    $(.bind((stringify!($binding), $binding)))*
                    .fetch_first()
                    .await
            }
        }
    };
}
