/// Database layer
///
/// - `pool`: PostgreSQL connection pool with health check
/// - `migrations`: Embedded schema migrations
///
/// The PostgreSQL store adapters live in `store::postgres`.

pub mod migrations;
pub mod pool;
