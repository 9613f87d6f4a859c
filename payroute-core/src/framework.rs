use sqlx::PgPool;

/// Runs database queries against the shared connection pool.
///
/// Queries are modelled as input structs with a `kanau` `Processor`
/// implementation on this type.
#[derive(Debug, Clone)]
pub struct DatabaseProcessor {
    pub pool: PgPool,
}
